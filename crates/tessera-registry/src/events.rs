//! Audit events
//!
//! Events are staged while a call runs and appended to the [`EventLog`] only
//! when the call commits. A failed call leaves no trace in the log.

use serde::{Deserialize, Serialize};
use tessera_core::{EventNonce, Locator, Principal, Selector, ZoneId};

/// Registry audit events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum RegistryEvent {
    /// Zone bound to an authority
    ZoneOpened {
        /// Zone opened
        zone: ZoneId,
        /// Authority bound to the zone
        authority: Principal,
    },

    /// Certificate flag written, whether or not it changed
    CertificateSet {
        /// Zone the certificate belongs to
        zone: ZoneId,
        /// Certificate holder
        principal: Principal,
        /// New flag
        enabled: bool,
    },

    /// Metadata entry written by a certificate holder or the superuser
    MetadataSet {
        /// Zone written
        zone: ZoneId,
        /// Location the action targets
        location: Principal,
        /// Action selector
        selector: Selector,
        /// Locator stored
        locator: Locator,
    },

    /// Superuser nominated a successor
    SuperuserTransferStarted {
        /// Current superuser
        previous: Principal,
        /// Nominee
        pending: Principal,
    },

    /// Nominee accepted the superuser role
    SuperuserTransferred {
        /// Former superuser
        previous: Principal,
        /// New superuser
        current: Principal,
    },
}

impl RegistryEvent {
    /// Event name, for logs and filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            RegistryEvent::ZoneOpened { .. } => "zone_opened",
            RegistryEvent::CertificateSet { .. } => "certificate_set",
            RegistryEvent::MetadataSet { .. } => "metadata_set",
            RegistryEvent::SuperuserTransferStarted { .. } => "superuser_transfer_started",
            RegistryEvent::SuperuserTransferred { .. } => "superuser_transferred",
        }
    }

    /// Zone the event concerns, if any
    pub fn zone(&self) -> Option<ZoneId> {
        match self {
            RegistryEvent::ZoneOpened { zone, .. }
            | RegistryEvent::CertificateSet { zone, .. }
            | RegistryEvent::MetadataSet { zone, .. } => Some(*zone),
            RegistryEvent::SuperuserTransferStarted { .. }
            | RegistryEvent::SuperuserTransferred { .. } => None,
        }
    }
}

/// A committed event with its sequence number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log
    pub nonce: EventNonce,
    /// The event
    pub event: RegistryEvent,
}

/// Append-only log of committed events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
    next: EventNonce,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of events in order, returning the assigned nonces
    pub fn append(&mut self, events: impl IntoIterator<Item = RegistryEvent>) -> Vec<EventNonce> {
        let mut nonces = Vec::new();
        for event in events {
            let nonce = self.next;
            self.next = nonce.next();
            tracing::debug!(%nonce, event_type = event.event_type(), "event committed");
            self.records.push(EventRecord { nonce, event });
            nonces.push(nonce);
        }
        nonces
    }

    /// All committed records
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records with nonce at or after `from`
    pub fn since(&self, from: EventNonce) -> impl Iterator<Item = &EventRecord> {
        self.records.iter().filter(move |r| r.nonce >= from)
    }

    /// Records concerning `zone`
    pub fn for_zone(&self, zone: ZoneId) -> impl Iterator<Item = &EventRecord> {
        self.records
            .iter()
            .filter(move |r| r.event.zone() == Some(zone))
    }

    /// Number of committed events
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Nonce the next committed event will receive
    pub fn next_nonce(&self) -> EventNonce {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened(label: &[u8]) -> RegistryEvent {
        RegistryEvent::ZoneOpened {
            zone: ZoneId::hash_of(label),
            authority: Principal::from_label("authority"),
        }
    }

    #[test]
    fn test_append_assigns_sequential_nonces() {
        let mut log = EventLog::new();
        let first = log.append([opened(b"a"), opened(b"b")]);
        let second = log.append([opened(b"c")]);

        assert_eq!(first, vec![EventNonce::new(0), EventNonce::new(1)]);
        assert_eq!(second, vec![EventNonce::new(2)]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.since(EventNonce::new(1)).count(), 2);
    }

    #[test]
    fn test_for_zone_filters() {
        let mut log = EventLog::new();
        log.append([opened(b"a"), opened(b"b"), opened(b"a")]);
        assert_eq!(log.for_zone(ZoneId::hash_of(b"a")).count(), 2);
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(opened(b"a")).unwrap();
        assert!(json.get("ZoneOpened").is_some());
    }
}
