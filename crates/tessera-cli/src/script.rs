//! Transaction scripts
//!
//! A script is a TOML document with one `[[tx]]` table per transaction:
//!
//! ```toml
//! [[tx]]
//! caller = "0x…"
//! value = "1500000000000000000"
//! call = { Open = { zone = "0x…", authority = "0x…" } }
//!
//! [[tx]]
//! caller = "0x…"
//! forwarded = true
//! call = { Set = { zone = "0x…", location = "0x…", selector = "0xdeadbeef", locator = "ipfs://x" } }
//! ```
//!
//! With `forwarded = true` the transaction is relayed through the delegation
//! forwarder and `caller` is the signer appended to the payload.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tessera_core::{Amount, Principal};
use tessera_registry::Call;

/// One scripted transaction
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptTx {
    /// Direct caller, or the signer when forwarded
    pub caller: Principal,
    /// Relay through the delegation forwarder
    #[serde(default)]
    pub forwarded: bool,
    /// Attached payment
    #[serde(default)]
    pub value: Amount,
    /// Entry point and arguments
    pub call: Call,
}

/// A parsed script
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Transactions in submission order
    #[serde(default)]
    pub tx: Vec<ScriptTx>,
}

impl Script {
    /// Parse a TOML script
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid transaction script")
    }

    /// Read a TOML script from `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{Selector, ZoneId};

    #[test]
    fn test_parse_script() {
        let zone = ZoneId::hash_of(b"Z1");
        let a1 = Principal::from_label("A1");
        let doc = format!(
            r#"
[[tx]]
caller = "{a1}"
value = "1500000000000000000"
call = {{ Open = {{ zone = "{zone}", authority = "{a1}" }} }}

[[tx]]
caller = "{a1}"
forwarded = true
call = {{ Set = {{ zone = "{zone}", location = "{a1}", selector = "0xdeadbeef", locator = "ipfs://x" }} }}

[[tx]]
caller = "{a1}"
call = "Collect"
"#
        );

        let script = Script::from_toml_str(&doc).unwrap();
        assert_eq!(script.tx.len(), 3);
        assert_eq!(script.tx[0].value, Amount(1_500_000_000_000_000_000));
        assert!(script.tx[1].forwarded);
        match &script.tx[1].call {
            Call::Set { selector, .. } => assert_eq!(*selector, Selector::from(0xdead_beef_u32)),
            other => panic!("unexpected call {other:?}"),
        }
        assert_eq!(script.tx[2].call, Call::Collect);
    }
}
