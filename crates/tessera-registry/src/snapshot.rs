//! JSON snapshots of registry state and audit log

use crate::events::EventLog;
use crate::registry::{Registry, RegistryState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tessera_core::{ConfigError, RegistryConfig};

/// Snapshot errors
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Reading or writing the snapshot file failed
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot contents are not valid JSON for this schema
    #[error("snapshot JSON invalid: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration supplied for restore is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Persisted registry contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Registry state
    pub state: RegistryState,
    /// Committed events
    #[serde(default)]
    pub events: EventLog,
}

impl RegistrySnapshot {
    /// Capture a registry
    pub fn capture(registry: &Registry) -> Self {
        Self {
            state: registry.state().clone(),
            events: registry.events().clone(),
        }
    }

    /// Rebuild a registry from this snapshot
    pub fn restore(self, config: RegistryConfig) -> Result<Registry, SnapshotError> {
        Ok(Registry::with_state(config, self.state, self.events)?)
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Write to `path`
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        std::fs::write(path, self.to_json()?)?;
        tracing::debug!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    /// Read from `path`
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
