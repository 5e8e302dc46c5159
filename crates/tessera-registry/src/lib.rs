//! # Tessera Registry - hierarchical trust registry
//!
//! Zones are opened by a funded call and bound to an authority. The authority
//! grants publish certificates within its zone. Certificate holders publish
//! metadata locators keyed by (zone, location, selector). A single superuser
//! can overwrite any entry and withdraw the fees collected from zone openings.
//!
//! Writers are identified by [`identity::IdentityResolver`]: a direct caller
//! is its own principal, while a self-call relayed by the delegation
//! forwarder carries the original signer in the trailing payload bytes.
//! Zone administration and superuser actions always use the direct caller.

#![forbid(unsafe_code)]

pub mod calls;
pub mod certificates;
pub mod events;
pub mod forwarding;
pub mod host;
pub mod identity;
pub mod metadata;
pub mod registry;
pub mod snapshot;
pub mod superuser;
pub mod zones;

pub use calls::{Call, CallOutcome};
pub use certificates::CertificateRegistry;
pub use events::{EventLog, EventRecord, RegistryEvent};
pub use forwarding::{Forwarder, TrustedForwarder};
pub use host::SharedRegistry;
pub use identity::{CallPath, IdentityResolver, ResolvedPrincipal, FORWARDED_MIN_PAYLOAD_LEN};
pub use metadata::MetadataStore;
pub use registry::{Registry, RegistryState};
pub use snapshot::{RegistrySnapshot, SnapshotError};
pub use superuser::{LedgerPayout, PayoutRejected, PayoutSink, SuperuserOverride};
pub use zones::ZoneRegistry;

pub use tessera_core::{
    Amount, CallContext, Locator, Principal, RegistryConfig, RegistryError, Result, Selector,
    ZoneId,
};
