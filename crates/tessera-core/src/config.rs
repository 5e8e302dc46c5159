//! Registry configuration
//!
//! Loaded from TOML, optionally overridden by `TESSERA_*` environment
//! variables, then validated before a registry is constructed from it.

use crate::identifiers::{Amount, IdentifierParseError, Principal};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TESSERA_";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be rendered to TOML
    #[error("failed to render TOML: {0}")]
    Render(#[from] toml::ser::Error),

    /// A single setting holds an unusable value
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Setting name
        key: String,
        /// What is wrong with it
        message: String,
    },

    /// Settings are individually valid but inconsistent together
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<(String, IdentifierParseError)> for ConfigError {
    fn from((key, err): (String, IdentifierParseError)) -> Self {
        Self::InvalidValue {
            key,
            message: err.to_string(),
        }
    }
}

/// Registry construction parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// The registry's own address; a direct caller equal to it marks a
    /// forwarded self-call
    pub registry_address: Principal,

    /// Initial superuser
    pub superuser: Principal,

    /// `open` must carry strictly more than this amount
    #[serde(default = "default_open_fee_threshold")]
    pub open_fee_threshold: Amount,
}

fn default_open_fee_threshold() -> Amount {
    Amount::UNIT
}

impl RegistryConfig {
    /// Create a configuration with the default fee threshold
    pub fn new(registry_address: Principal, superuser: Principal) -> Self {
        Self {
            registry_address,
            superuser,
            open_fee_threshold: default_open_fee_threshold(),
        }
    }

    /// Override the fee threshold
    pub fn with_open_fee_threshold(mut self, threshold: Amount) -> Self {
        self.open_fee_threshold = threshold;
        self
    }

    /// Parse from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Render as a TOML document
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded registry config");
        Ok(config)
    }

    /// Apply `TESSERA_REGISTRY_ADDRESS`, `TESSERA_SUPERUSER`, and
    /// `TESSERA_OPEN_FEE_THRESHOLD` overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply overrides from an explicit variable set
    pub fn merge_with_vars(
        &mut self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), ConfigError> {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "REGISTRY_ADDRESS" => {
                    self.registry_address = value.parse().map_err(|e| (key.clone(), e))?;
                }
                "SUPERUSER" => {
                    self.superuser = value.parse().map_err(|e| (key.clone(), e))?;
                }
                "OPEN_FEE_THRESHOLD" => {
                    self.open_fee_threshold =
                        value.parse().map_err(|e: std::num::ParseIntError| {
                            ConfigError::InvalidValue {
                                key: key.clone(),
                                message: e.to_string(),
                            }
                        })?;
                }
                _ => continue,
            }
            tracing::debug!(%key, "applied environment override");
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry_address.is_null() {
            return Err(ConfigError::Invalid(
                "registry_address must not be the null principal".to_string(),
            ));
        }
        if self.superuser.is_null() {
            return Err(ConfigError::Invalid(
                "superuser must not be the null principal".to_string(),
            ));
        }
        if self.superuser == self.registry_address {
            return Err(ConfigError::Invalid(
                "superuser must differ from registry_address".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RegistryConfig {
        RegistryConfig::new(
            Principal::from_label("registry"),
            Principal::from_label("superuser"),
        )
    }

    #[test]
    fn test_toml_roundtrip_preserves_threshold() {
        let config = sample().with_open_fee_threshold(Amount(42));
        let rendered = config.to_toml_string().unwrap();
        let parsed = RegistryConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_threshold_defaults_to_one_unit() {
        let doc = format!(
            "registry_address = \"{}\"\nsuperuser = \"{}\"\n",
            Principal::from_label("registry"),
            Principal::from_label("superuser")
        );
        let config = RegistryConfig::from_toml_str(&doc).unwrap();
        assert_eq!(config.open_fee_threshold, Amount::UNIT);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let doc = format!(
            "registry_address = \"{}\"\nsuperuser = \"{}\"\nextra = 1\n",
            Principal::from_label("registry"),
            Principal::from_label("superuser")
        );
        assert!(matches!(
            RegistryConfig::from_toml_str(&doc),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_rejects_null_and_aliased_addresses() {
        assert!(sample().validate().is_ok());

        let mut config = sample();
        config.superuser = Principal::NULL;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.registry_address = Principal::NULL;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.superuser = config.registry_address;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = sample();
        let other = Principal::from_label("other");
        config
            .merge_with_vars([
                ("TESSERA_SUPERUSER".to_string(), other.to_string()),
                ("TESSERA_OPEN_FEE_THRESHOLD".to_string(), "5".to_string()),
                ("UNRELATED".to_string(), "x".to_string()),
            ])
            .unwrap();
        assert_eq!(config.superuser, other);
        assert_eq!(config.open_fee_threshold, Amount(5));
    }

    #[test]
    fn test_env_override_rejects_bad_principal() {
        let mut config = sample();
        let err = config
            .merge_with_vars([("TESSERA_SUPERUSER".to_string(), "0x12".to_string())])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.toml");
        std::fs::write(&path, sample().to_toml_string().unwrap()).unwrap();
        assert_eq!(RegistryConfig::load_from_file(&path).unwrap(), sample());
    }
}
