//! Call encoding
//!
//! Entry points are addressed by a postcard-encoded [`Call`]. Decoding reads
//! the call prefix and ignores whatever follows it, which is where the
//! forwarder appends the original signer.

use serde::{Deserialize, Serialize};
use tessera_core::{Amount, Locator, Principal, RegistryError, Result, Selector, ZoneId};

/// A registry entry point with its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Call {
    /// Open a zone for `authority`; requires payment above the fee threshold
    Open {
        /// Zone to bind
        zone: ZoneId,
        /// Authority that will administer the zone
        authority: Principal,
    },

    /// Enable or disable a publisher certificate within a zone
    Authorize {
        /// Zone being administered
        zone: ZoneId,
        /// Certificate holder
        principal: Principal,
        /// New certificate state
        enabled: bool,
    },

    /// Publish a metadata entry as a certificate holder
    Set {
        /// Zone to publish into
        zone: ZoneId,
        /// Location the action targets
        location: Principal,
        /// Action selector
        selector: Selector,
        /// Locator to store
        locator: Locator,
    },

    /// Read a metadata entry
    Get {
        /// Zone to read from
        zone: ZoneId,
        /// Location the action targets
        location: Principal,
        /// Action selector
        selector: Selector,
    },

    /// Overwrite a metadata entry as the superuser
    Update {
        /// Zone to write into
        zone: ZoneId,
        /// Location the action targets
        location: Principal,
        /// Action selector
        selector: Selector,
        /// Locator to store
        locator: Locator,
    },

    /// Withdraw the collected balance to the superuser
    Collect,

    /// Nominate a new superuser
    TransferSuperuser {
        /// Nominee
        new_superuser: Principal,
    },

    /// Accept a pending superuser nomination
    AcceptSuperuser,
}

impl Call {
    /// Encode to a raw call payload
    pub fn encode(&self) -> Result<Vec<u8>> {
        postcard::to_stdvec(self).map_err(|e| RegistryError::encode(e.to_string()))
    }

    /// Decode the call at the start of `payload`, ignoring trailing bytes
    pub fn decode(payload: &[u8]) -> Result<Self> {
        postcard::take_from_bytes::<Call>(payload)
            .map(|(call, _rest)| call)
            .map_err(|e| RegistryError::decode(e.to_string()))
    }

    /// Entry point name, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Call::Open { .. } => "open",
            Call::Authorize { .. } => "authorize",
            Call::Set { .. } => "set",
            Call::Get { .. } => "get",
            Call::Update { .. } => "update",
            Call::Collect => "collect",
            Call::TransferSuperuser { .. } => "transfer_superuser",
            Call::AcceptSuperuser => "accept_superuser",
        }
    }

    /// Whether the entry point accepts attached payment
    pub fn is_payable(&self) -> bool {
        matches!(self, Call::Open { .. })
    }
}

/// Result of a successful call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutcome {
    /// The call returns nothing
    Unit,
    /// Locator read by `get`
    Locator(Locator),
    /// Amount paid out by `collect`
    Collected(Amount),
}

impl CallOutcome {
    /// The locator, if this outcome carries one
    pub fn locator(&self) -> Option<&Locator> {
        match self {
            CallOutcome::Locator(locator) => Some(locator),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_call() -> Call {
        Call::Set {
            zone: ZoneId::hash_of(b"z1"),
            location: Principal::from_label("l1"),
            selector: Selector::from(0xdead_beef_u32),
            locator: Locator::new("ipfs://x"),
        }
    }

    #[test]
    fn test_decode_ignores_appended_signer() {
        let call = set_call();
        let mut payload = call.encode().unwrap();
        payload.extend_from_slice(Principal::from_label("signer").as_bytes());
        assert_eq!(Call::decode(&payload).unwrap(), call);
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        let payload = set_call().encode().unwrap();
        let err = Call::decode(&payload[..payload.len() / 2]).unwrap_err();
        assert!(matches!(err, RegistryError::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_unknown_entry_point() {
        assert!(Call::decode(&[0x7f]).is_err());
        assert!(Call::decode(&[]).is_err());
    }

    #[test]
    fn test_only_open_is_payable() {
        assert!(Call::Open {
            zone: ZoneId::default(),
            authority: Principal::from_label("a"),
        }
        .is_payable());
        assert!(!set_call().is_payable());
        assert!(!Call::Collect.is_payable());
    }
}
