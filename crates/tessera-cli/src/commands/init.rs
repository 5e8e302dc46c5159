// Configuration bootstrap

use anyhow::{bail, Context, Result};
use std::path::Path;
use tessera_core::{Amount, Principal, RegistryConfig};
use tracing::info;

pub fn run(path: &Path, registry: &str, superuser: &str, threshold: Option<&str>) -> Result<()> {
    if path.exists() {
        bail!("refusing to overwrite existing config {}", path.display());
    }

    let registry: Principal = registry.parse().context("invalid --registry")?;
    let superuser: Principal = superuser.parse().context("invalid --superuser")?;
    let mut config = RegistryConfig::new(registry, superuser);
    if let Some(threshold) = threshold {
        let threshold: Amount = threshold.parse().context("invalid --threshold")?;
        config = config.with_open_fee_threshold(threshold);
    }
    config.validate()?;

    std::fs::write(path, config.to_toml_string()?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote registry config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tessera.toml");
        let registry = Principal::from_label("registry");
        let superuser = Principal::from_label("root");

        run(
            &path,
            &registry.to_string(),
            &superuser.to_string(),
            Some("2000000000000000000"),
        )
        .unwrap();

        let config = RegistryConfig::load_from_file(&path).unwrap();
        assert_eq!(config.registry_address, registry);
        assert_eq!(config.open_fee_threshold, Amount::units(2));
        assert!(run(&path, &registry.to_string(), &superuser.to_string(), None).is_err());
    }
}
