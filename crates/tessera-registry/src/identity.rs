//! Effective principal resolution
//!
//! A call reaches the registry either directly, or as a self-call relayed by
//! the delegation forwarder. The forwarder appends the verified signer after
//! the encoded call, so for self-calls the effective principal is the low 20
//! bytes of the payload's last 32-byte word. Every entry point that acts on
//! behalf of a resolved principal goes through [`IdentityResolver`].

use tessera_core::{CallContext, Principal, RegistryError, Result, PRINCIPAL_LEN};

/// Width of the trailing word the forwarded principal is read from
pub const WORD_LEN: usize = 32;

/// Shortest self-call payload the resolver accepts
pub const FORWARDED_MIN_PAYLOAD_LEN: usize = WORD_LEN;

/// How a principal was established
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPath {
    /// The principal is the direct caller
    Direct,
    /// The principal was carried by a forwarded self-call
    Forwarded,
}

/// A principal tagged with the path it was resolved through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPrincipal {
    /// Effective principal
    pub principal: Principal,
    /// Resolution path
    pub path: CallPath,
}

impl ResolvedPrincipal {
    /// A directly calling principal
    pub fn direct(principal: Principal) -> Self {
        Self {
            principal,
            path: CallPath::Direct,
        }
    }

    /// A principal carried by a forwarded self-call
    pub fn forwarded(principal: Principal) -> Self {
        Self {
            principal,
            path: CallPath::Forwarded,
        }
    }

    /// Whether the principal arrived through the forwarder
    pub fn is_forwarded(&self) -> bool {
        self.path == CallPath::Forwarded
    }
}

/// Resolves the effective principal of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityResolver {
    registry_address: Principal,
}

impl IdentityResolver {
    /// Create a resolver for a registry deployed at `registry_address`
    pub fn new(registry_address: Principal) -> Self {
        Self { registry_address }
    }

    /// The registry's own address
    pub fn registry_address(&self) -> Principal {
        self.registry_address
    }

    /// Whether the call is a self-call through the forwarding path
    pub fn is_forwarded(&self, context: &CallContext) -> bool {
        context.caller == self.registry_address
    }

    /// Resolve the effective principal of `context`
    pub fn resolve(&self, context: &CallContext) -> Result<ResolvedPrincipal> {
        if !self.is_forwarded(context) {
            return Ok(ResolvedPrincipal::direct(context.caller));
        }

        let principal = trailing_principal(&context.payload)?;
        tracing::debug!(%principal, "resolved forwarded principal");
        Ok(ResolvedPrincipal::forwarded(principal))
    }
}

/// Read the principal from the low 20 bytes of the payload's last word
pub fn trailing_principal(payload: &[u8]) -> Result<Principal> {
    let len = payload.len();
    if len < FORWARDED_MIN_PAYLOAD_LEN {
        return Err(RegistryError::MalformedForwardedCall {
            len,
            min: FORWARDED_MIN_PAYLOAD_LEN,
        });
    }

    let word = &payload[len - WORD_LEN..];
    let mut bytes = [0u8; PRINCIPAL_LEN];
    bytes.copy_from_slice(&word[WORD_LEN - PRINCIPAL_LEN..]);
    Ok(Principal::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Principal {
        Principal::from_label("registry")
    }

    #[test]
    fn test_direct_caller_resolves_to_itself() {
        let resolver = IdentityResolver::new(registry());
        let caller = Principal::from_label("alice");
        let mut payload = vec![0u8; 40];
        payload.extend_from_slice(Principal::from_label("mallory").as_bytes());

        let resolved = resolver
            .resolve(&CallContext::new(caller, payload))
            .unwrap();
        assert_eq!(resolved, ResolvedPrincipal::direct(caller));
    }

    #[test]
    fn test_self_call_resolves_trailing_principal() {
        let resolver = IdentityResolver::new(registry());
        let signer = Principal::from_label("signer");
        let mut payload = vec![0xaa; 17];
        payload.extend_from_slice(signer.as_bytes());

        let resolved = resolver
            .resolve(&CallContext::new(registry(), payload))
            .unwrap();
        assert_eq!(resolved.principal, signer);
        assert!(resolved.is_forwarded());
    }

    #[test]
    fn test_only_low_twenty_bytes_of_last_word_are_used() {
        let mut payload = vec![0xff; WORD_LEN];
        payload[WORD_LEN - PRINCIPAL_LEN..].copy_from_slice(&[7u8; PRINCIPAL_LEN]);
        assert_eq!(
            trailing_principal(&payload).unwrap(),
            Principal::from_bytes([7u8; PRINCIPAL_LEN])
        );
    }

    #[test]
    fn test_short_forwarded_payload_rejected() {
        let resolver = IdentityResolver::new(registry());
        let err = resolver
            .resolve(&CallContext::new(registry(), vec![1u8; WORD_LEN - 1]))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::MalformedForwardedCall {
                len: WORD_LEN - 1,
                min: FORWARDED_MIN_PAYLOAD_LEN,
            }
        );
    }

    #[test]
    fn test_short_direct_payload_is_not_inspected() {
        let resolver = IdentityResolver::new(registry());
        let caller = Principal::from_label("bob");
        assert!(resolver
            .resolve(&CallContext::new(caller, Vec::new()))
            .is_ok());
    }
}
