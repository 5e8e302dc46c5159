//! CLI command handlers

pub mod init;
pub mod query;
pub mod run;

use anyhow::{Context, Result};
use std::path::Path;
use tessera_core::RegistryConfig;
use tessera_registry::{Registry, RegistrySnapshot};

/// Load, env-merge, and validate the registry configuration
pub fn load_config(path: &Path) -> Result<RegistryConfig> {
    let mut config = RegistryConfig::load_from_file(path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    config.merge_with_env()?;
    config.validate()?;
    Ok(config)
}

/// Open the registry from `state`, or a fresh one if no snapshot exists yet
pub fn open_registry(config: RegistryConfig, state: &Path) -> Result<Registry> {
    if state.exists() {
        let snapshot = RegistrySnapshot::load(state)
            .with_context(|| format!("failed to load snapshot {}", state.display()))?;
        tracing::debug!(path = %state.display(), "restoring registry snapshot");
        Ok(snapshot.restore(config)?)
    } else {
        tracing::info!(path = %state.display(), "no snapshot found, starting empty registry");
        Ok(Registry::new(config)?)
    }
}
