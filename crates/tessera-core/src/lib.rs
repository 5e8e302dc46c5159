//! Tessera Core - shared types for the trust registry
//!
//! Identifiers (principals, zones, selectors, locators, amounts), the raw
//! call context delivered by the host, the registry error taxonomy, and the
//! registry configuration.

#![forbid(unsafe_code)]

/// Principal, zone, selector, locator, and amount types
pub mod identifiers;

/// Raw call context
pub mod context;

/// Registry error taxonomy
pub mod errors;

/// Registry configuration
pub mod config;

pub use config::{ConfigError, RegistryConfig};
pub use context::CallContext;
pub use errors::{RegistryError, Result};
pub use identifiers::{
    Amount, EventNonce, IdentifierParseError, Locator, Principal, Selector, ZoneId,
    PRINCIPAL_LEN, SELECTOR_LEN, ZONE_ID_LEN,
};
