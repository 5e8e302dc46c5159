//! Delegation forwarding boundary
//!
//! The delegation verifier lives outside the registry. Once it has accepted a
//! signed request it re-enters the registry through a self-call whose payload
//! is the encoded call followed by the signer. [`Forwarder`] is that
//! boundary; [`TrustedForwarder`] builds the self-call for a signer the
//! verifier has already accepted.

use crate::calls::Call;
use tessera_core::{CallContext, Principal, Result};

/// Builds self-calls on behalf of verified signers
pub trait Forwarder {
    /// Build the self-call context relaying `call` for `signer`
    fn forward(&self, signer: Principal, call: &Call) -> Result<CallContext>;
}

/// Relay that appends an already verified signer to the call payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustedForwarder {
    registry_address: Principal,
}

impl TrustedForwarder {
    /// Create a relay targeting the registry at `registry_address`
    pub fn new(registry_address: Principal) -> Self {
        Self { registry_address }
    }
}

impl Forwarder for TrustedForwarder {
    fn forward(&self, signer: Principal, call: &Call) -> Result<CallContext> {
        let mut payload = call.encode()?;
        payload.extend_from_slice(signer.as_bytes());
        tracing::debug!(%signer, call = call.name(), "forwarding call");
        Ok(CallContext::new(self.registry_address, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityResolver;
    use tessera_core::{Locator, Selector, ZoneId};

    #[test]
    fn test_forwarded_call_resolves_to_signer_and_decodes() {
        let registry = Principal::from_label("registry");
        let signer = Principal::from_label("signer");
        let call = Call::Set {
            zone: ZoneId::hash_of(b"z"),
            location: Principal::from_label("l"),
            selector: Selector::from(1),
            locator: Locator::new("ipfs://x"),
        };

        let context = TrustedForwarder::new(registry).forward(signer, &call).unwrap();
        assert_eq!(context.caller, registry);

        let resolved = IdentityResolver::new(registry).resolve(&context).unwrap();
        assert_eq!(resolved.principal, signer);
        assert_eq!(Call::decode(&context.payload).unwrap(), call);
    }
}
