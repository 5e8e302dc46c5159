// Script execution against a persisted registry

use super::{load_config, open_registry};
use crate::script::{Script, ScriptTx};
use anyhow::{bail, Result};
use std::path::Path;
use tessera_core::CallContext;
use tessera_registry::{CallOutcome, Forwarder, Registry, RegistrySnapshot, TrustedForwarder};
use tracing::{info, warn};

/// Outcome counts for one script run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub committed: usize,
    pub rejected: usize,
}

pub fn run(config: &Path, state: &Path, script: &Path, fail_fast: bool) -> Result<()> {
    let config = load_config(config)?;
    let mut registry = open_registry(config, state)?;
    let script = Script::load(script)?;

    let summary = execute_script(&mut registry, &script, fail_fast)?;
    RegistrySnapshot::capture(&registry).save(state)?;
    info!(
        committed = summary.committed,
        rejected = summary.rejected,
        path = %state.display(),
        "script finished"
    );
    Ok(())
}

fn context_for(registry: &Registry, tx: &ScriptTx) -> Result<CallContext> {
    let context = if tx.forwarded {
        TrustedForwarder::new(registry.address()).forward(tx.caller, &tx.call)?
    } else {
        CallContext::new(tx.caller, tx.call.encode()?)
    };
    Ok(context.with_value(tx.value))
}

/// Execute every transaction in order, printing one line per outcome
pub fn execute_script(
    registry: &mut Registry,
    script: &Script,
    fail_fast: bool,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    for (index, tx) in script.tx.iter().enumerate() {
        let context = context_for(registry, tx)?;
        match registry.execute(&context) {
            Ok(outcome) => {
                summary.committed += 1;
                match outcome {
                    CallOutcome::Unit => println!("[{index}] {} ok", tx.call.name()),
                    CallOutcome::Locator(locator) => {
                        println!("[{index}] {} -> {:?}", tx.call.name(), locator.as_str())
                    }
                    CallOutcome::Collected(amount) => {
                        println!("[{index}] {} collected {amount}", tx.call.name())
                    }
                }
            }
            Err(error) => {
                summary.rejected += 1;
                println!("[{index}] {} rejected: {} ({error})", tx.call.name(), error.kind());
                if fail_fast {
                    warn!(index, "stopping at first rejected transaction");
                    bail!("transaction {index} rejected: {error}");
                }
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{Principal, RegistryConfig, Selector, ZoneId};

    fn registry_address() -> Principal {
        Principal::from_label("registry")
    }

    fn scenario(
        zone: ZoneId,
        a1: Principal,
        a2: Principal,
        p1: Principal,
        p2: Principal,
    ) -> String {
        format!(
            r#"
[[tx]]
caller = "{a1}"
value = "1500000000000000000"
call = {{ Open = {{ zone = "{zone}", authority = "{a1}" }} }}

[[tx]]
caller = "{a2}"
value = "1500000000000000000"
call = {{ Open = {{ zone = "{zone}", authority = "{a2}" }} }}

[[tx]]
caller = "{a1}"
call = {{ Authorize = {{ zone = "{zone}", principal = "{p1}", enabled = true }} }}

[[tx]]
caller = "{p1}"
forwarded = true
call = {{ Set = {{ zone = "{zone}", location = "{a1}", selector = "0xdeadbeef", locator = "ipfs://x" }} }}

[[tx]]
caller = "{p2}"
forwarded = true
call = {{ Set = {{ zone = "{zone}", location = "{a1}", selector = "0xdeadbeef", locator = "ipfs://y" }} }}
"#
        )
    }

    #[test]
    fn test_script_scenario() {
        let mut registry = Registry::new(RegistryConfig::new(
            registry_address(),
            Principal::from_label("root"),
        ))
        .unwrap();
        let zone = ZoneId::hash_of(b"Z1");
        let a1 = Principal::from_label("A1");
        let doc = scenario(
            zone,
            a1,
            Principal::from_label("A2"),
            Principal::from_label("P1"),
            Principal::from_label("P2"),
        );
        let script = Script::from_toml_str(&doc).unwrap();

        let summary = execute_script(&mut registry, &script, false).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                committed: 3,
                rejected: 2
            }
        );
        assert_eq!(
            registry
                .get(&zone, &a1, &Selector::from(0xdead_beef_u32))
                .as_str(),
            "ipfs://x"
        );

        let mut fresh = Registry::new(RegistryConfig::new(
            registry_address(),
            Principal::from_label("root"),
        ))
        .unwrap();
        assert!(execute_script(&mut fresh, &script, true).is_err());
        assert_eq!(fresh.authority_of(&zone), Some(a1));
    }
}
