//! Zone registry: zone identifier → authority
//!
//! Zones are opened once, by a funded call, and never rebound or closed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_core::{Amount, Principal, RegistryError, Result, ZoneId};

/// Bindings of zones to their authorities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneRegistry {
    zones: BTreeMap<ZoneId, Principal>,
}

impl ZoneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Authority bound to `zone`, if opened
    pub fn authority(&self, zone: &ZoneId) -> Option<Principal> {
        self.zones.get(zone).copied()
    }

    /// Whether `zone` is opened
    pub fn is_open(&self, zone: &ZoneId) -> bool {
        self.zones.contains_key(zone)
    }

    /// Check the preconditions of `open` without mutating anything
    ///
    /// `registry_address` is the caller every forwarded self-call presents,
    /// so it can never be bound as an authority.
    pub fn check_open(
        &self,
        zone: &ZoneId,
        authority: &Principal,
        paid: Amount,
        threshold: Amount,
        registry_address: &Principal,
    ) -> Result<()> {
        if paid <= threshold {
            return Err(RegistryError::PaymentRequired { paid, threshold });
        }
        if self.is_open(zone) {
            return Err(RegistryError::AlreadyExists { zone: *zone });
        }
        if authority.is_null() {
            return Err(RegistryError::NullAuthority);
        }
        if authority == registry_address {
            return Err(RegistryError::ReservedAuthority {
                principal: *authority,
            });
        }
        Ok(())
    }

    /// Bind `zone` to `authority`; callers run [`Self::check_open`] first
    pub(crate) fn bind(&mut self, zone: ZoneId, authority: Principal) {
        debug_assert!(!self.is_open(&zone));
        self.zones.entry(zone).or_insert(authority);
    }

    /// Require `caller` to be the authority of an opened `zone`
    pub fn ensure_authority(&self, zone: &ZoneId, caller: &Principal) -> Result<()> {
        match self.zones.get(zone) {
            Some(authority) if authority == caller => Ok(()),
            _ => Err(RegistryError::NotZoneOwner {
                zone: *zone,
                caller: *caller,
            }),
        }
    }

    /// Opened zones with their authorities
    pub fn iter(&self) -> impl Iterator<Item = (&ZoneId, &Principal)> {
        self.zones.iter()
    }

    /// Number of opened zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether no zone is opened
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
