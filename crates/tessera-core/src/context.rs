//! Raw call context as delivered by the host

use crate::identifiers::{Amount, Principal};

/// One incoming call: who invoked the registry directly, the raw payload, and
/// the native currency attached.
///
/// For calls relayed by the delegation forwarder, `caller` is the registry's
/// own address and `payload` ends with the original signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Direct caller
    pub caller: Principal,
    /// Raw call payload
    pub payload: Vec<u8>,
    /// Native currency attached to the call
    pub value: Amount,
}

impl CallContext {
    /// Create a context with no payment attached
    pub fn new(caller: Principal, payload: Vec<u8>) -> Self {
        Self {
            caller,
            payload,
            value: Amount::ZERO,
        }
    }

    /// Attach a payment
    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}
