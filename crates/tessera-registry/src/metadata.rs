//! Metadata store: (zone, location, selector) → locator

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_core::{Locator, Principal, Selector, ZoneId};

type Entries = BTreeMap<Principal, BTreeMap<Selector, Locator>>;

/// Three-level metadata mapping
///
/// Entries are overwritten, never removed. Reads of absent entries return the
/// empty locator, so absence and an empty locator are indistinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataStore {
    entries: BTreeMap<ZoneId, Entries>,
}

impl MetadataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an entry
    pub fn get(&self, zone: &ZoneId, location: &Principal, selector: &Selector) -> Locator {
        self.entries
            .get(zone)
            .and_then(|locations| locations.get(location))
            .and_then(|selectors| selectors.get(selector))
            .cloned()
            .unwrap_or_default()
    }

    /// Overwrite an entry, returning the previous locator if one was stored
    pub(crate) fn put(
        &mut self,
        zone: ZoneId,
        location: Principal,
        selector: Selector,
        locator: Locator,
    ) -> Option<Locator> {
        self.entries
            .entry(zone)
            .or_default()
            .entry(location)
            .or_default()
            .insert(selector, locator)
    }

    /// All entries stored under `zone`
    pub fn zone_entries(
        &self,
        zone: &ZoneId,
    ) -> impl Iterator<Item = (&Principal, &Selector, &Locator)> {
        self.entries.get(zone).into_iter().flat_map(|locations| {
            locations.iter().flat_map(|(location, selectors)| {
                selectors
                    .iter()
                    .map(move |(selector, locator)| (location, selector, locator))
            })
        })
    }

    /// Total number of stored entries
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(|locations| locations.values())
            .map(BTreeMap::len)
            .sum()
    }

    /// Whether no entry is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
