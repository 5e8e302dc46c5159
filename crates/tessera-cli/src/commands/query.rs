// Read-only queries against a persisted registry

use super::{load_config, open_registry};
use anyhow::{Context, Result};
use std::path::Path;
use tessera_core::{Principal, Selector, ZoneId};
use tessera_registry::RegistrySnapshot;

pub fn get(config: &Path, state: &Path, zone: &str, location: &str, selector: &str) -> Result<()> {
    let zone: ZoneId = zone.parse().context("invalid --zone")?;
    let location: Principal = location.parse().context("invalid --location")?;
    let selector: Selector = selector.parse().context("invalid --selector")?;

    let registry = open_registry(load_config(config)?, state)?;
    println!("{}", registry.get(&zone, &location, &selector));
    Ok(())
}

pub fn show(state: &Path) -> Result<()> {
    let snapshot = RegistrySnapshot::load(state)
        .with_context(|| format!("failed to load snapshot {}", state.display()))?;
    println!("{}", snapshot.to_json()?);
    Ok(())
}
