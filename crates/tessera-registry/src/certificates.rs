//! Certificate registry: per-zone publish rights
//!
//! A certificate is a flag keyed by (zone, principal). Revocation writes
//! `false`; entries are never removed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_core::{Principal, RegistryError, Result, ZoneId};

/// Certificate flags grouped by zone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateRegistry {
    certificates: BTreeMap<ZoneId, BTreeMap<Principal, bool>>,
}

impl CertificateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `principal` holds an enabled certificate for `zone`
    pub fn is_enabled(&self, zone: &ZoneId, principal: &Principal) -> bool {
        self.certificates
            .get(zone)
            .and_then(|holders| holders.get(principal))
            .copied()
            .unwrap_or(false)
    }

    /// Require an enabled certificate
    pub fn ensure_enabled(&self, zone: &ZoneId, principal: &Principal) -> Result<()> {
        if self.is_enabled(zone, principal) {
            Ok(())
        } else {
            Err(RegistryError::NotAuthorized {
                zone: *zone,
                principal: *principal,
            })
        }
    }

    /// Write a certificate flag, returning the previous flag if one was set
    pub(crate) fn set(
        &mut self,
        zone: ZoneId,
        principal: Principal,
        enabled: bool,
    ) -> Option<bool> {
        self.certificates
            .entry(zone)
            .or_default()
            .insert(principal, enabled)
    }

    /// Every certificate ever written for `zone`, enabled or not
    pub fn holders(&self, zone: &ZoneId) -> impl Iterator<Item = (&Principal, bool)> {
        self.certificates
            .get(zone)
            .into_iter()
            .flat_map(|holders| holders.iter().map(|(p, enabled)| (p, *enabled)))
    }

    /// Principals currently enabled for `zone`
    pub fn enabled(&self, zone: &ZoneId) -> impl Iterator<Item = &Principal> {
        self.holders(zone)
            .filter_map(|(principal, enabled)| enabled.then_some(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_certificate_is_disabled() {
        let certificates = CertificateRegistry::new();
        let zone = ZoneId::hash_of(b"z");
        let principal = Principal::from_label("p");
        assert!(!certificates.is_enabled(&zone, &principal));
        assert!(matches!(
            certificates.ensure_enabled(&zone, &principal),
            Err(RegistryError::NotAuthorized { .. })
        ));
    }

    #[test]
    fn test_revocation_keeps_entry() {
        let mut certificates = CertificateRegistry::new();
        let zone = ZoneId::hash_of(b"z");
        let principal = Principal::from_label("p");

        assert_eq!(certificates.set(zone, principal, true), None);
        assert_eq!(certificates.set(zone, principal, false), Some(true));
        assert!(!certificates.is_enabled(&zone, &principal));
        assert_eq!(certificates.holders(&zone).count(), 1);
        assert_eq!(certificates.enabled(&zone).count(), 0);
    }

    #[test]
    fn test_certificates_are_zone_scoped() {
        let mut certificates = CertificateRegistry::new();
        let principal = Principal::from_label("p");
        certificates.set(ZoneId::hash_of(b"a"), principal, true);
        assert!(!certificates.is_enabled(&ZoneId::hash_of(b"b"), &principal));
    }
}
