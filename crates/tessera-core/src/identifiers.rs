//! Identifier types for the registry
//!
//! Principals, zones, selectors, locators, and native-currency amounts. Fixed
//! size identifiers render as `0x`-prefixed hex in human readable formats
//! (TOML, JSON) and as raw bytes in binary formats (postcard).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of a principal identifier in bytes
pub const PRINCIPAL_LEN: usize = 20;

/// Length of a zone identifier in bytes
pub const ZONE_ID_LEN: usize = 32;

/// Length of an action selector in bytes
pub const SELECTOR_LEN: usize = 4;

/// Error parsing a hex identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierParseError {
    /// Input is not hex
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Hex decodes to the wrong number of bytes
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Identifier width
        expected: usize,
        /// Decoded width
        actual: usize,
    },
}

fn parse_fixed<const N: usize>(s: &str) -> Result<[u8; N], IdentifierParseError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes =
        hex::decode(digits).map_err(|e| IdentifierParseError::InvalidHex(e.to_string()))?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| IdentifierParseError::InvalidLength {
            expected: N,
            actual,
        })
}

fn serialize_fixed<S: Serializer, const N: usize>(
    bytes: &[u8; N],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    [u8; N]: Serialize,
{
    if serializer.is_human_readable() {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    } else {
        bytes.serialize(serializer)
    }
}

fn deserialize_fixed<'de, D: Deserializer<'de>, const N: usize>(
    deserializer: D,
) -> Result<[u8; N], D::Error>
where
    [u8; N]: Deserialize<'de>,
{
    if deserializer.is_human_readable() {
        let s = String::deserialize(deserializer)?;
        parse_fixed::<N>(&s).map_err(D::Error::custom)
    } else {
        <[u8; N]>::deserialize(deserializer)
    }
}

macro_rules! fixed_identifier {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Create from raw bytes
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Get the raw bytes
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_fixed::<$len>(s).map(Self)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serialize_fixed(&self.0, serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_fixed::<D, $len>(deserializer).map(Self)
            }
        }
    };
}

fixed_identifier!(
    /// A caller, signer, authority, or metadata location
    ///
    /// The all-zero value is the null principal. No caller can present it, so
    /// it never satisfies an ownership check.
    Principal,
    PRINCIPAL_LEN
);

fixed_identifier!(
    /// Opaque 32-byte zone key chosen by the zone creator
    ZoneId,
    ZONE_ID_LEN
);

fixed_identifier!(
    /// 4-byte action selector identifying the action a metadata entry describes
    Selector,
    SELECTOR_LEN
);

impl Principal {
    /// The null principal
    pub const NULL: Principal = Principal([0u8; PRINCIPAL_LEN]);

    /// Whether this is the null principal
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// Deterministic principal for a label, for fixtures and tooling
    pub fn from_label(label: &str) -> Self {
        let digest = blake3::hash(label.as_bytes());
        let mut bytes = [0u8; PRINCIPAL_LEN];
        bytes.copy_from_slice(&digest.as_bytes()[..PRINCIPAL_LEN]);
        Self(bytes)
    }
}

impl ZoneId {
    /// Derive a zone identifier by hashing arbitrary creator-chosen bytes
    pub fn hash_of(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }
}

impl From<u32> for Selector {
    fn from(value: u32) -> Self {
        Self(value.to_be_bytes())
    }
}

impl From<Selector> for u32 {
    fn from(selector: Selector) -> Self {
        u32::from_be_bytes(selector.0)
    }
}

/// Opaque reference to off-system content describing an action
///
/// The registry never inspects locators. The empty locator is what an absent
/// entry reads as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Wrap a locator string
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The empty locator
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether the locator is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the locator string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Locator {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Native currency amount in base units
///
/// Human readable formats carry the base-unit count as a decimal string since
/// TOML integers stop at `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Amount(pub u128);

impl Amount {
    /// Base units in one whole native currency unit
    pub const UNIT: Amount = Amount(1_000_000_000_000_000_000);

    /// Zero
    pub const ZERO: Amount = Amount(0);

    /// Whole units expressed in base units, saturating on overflow
    pub const fn units(whole: u128) -> Self {
        Self(whole.saturating_mul(Self::UNIT.0))
    }

    /// Base units
    pub fn base_units(&self) -> u128 {
        self.0
    }

    /// Whether the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::UNIT.0;
        let frac = self.0 % Self::UNIT.0;
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let frac = format!("{frac:018}");
            write!(f, "{whole}.{}", frac.trim_end_matches('0'))
        }
    }
}

impl FromStr for Amount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().replace('_', "").parse::<u128>().map(Amount)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.0.to_string())
        } else {
            serializer.serialize_u128(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl serde::de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a base-unit amount as an unsigned integer or decimal string")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Amount, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount(u128::from(v)))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Amount, E> {
                u128::try_from(v)
                    .map(Amount)
                    .map_err(|_| E::custom("amount must not be negative"))
            }

            fn visit_u128<E: serde::de::Error>(self, v: u128) -> Result<Amount, E> {
                Ok(Amount(v))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_any(AmountVisitor)
        } else {
            deserializer.deserialize_u128(AmountVisitor)
        }
    }
}

/// Monotonic sequence number assigned to committed audit events
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct EventNonce(pub u64);

impl EventNonce {
    /// Create a new event nonce
    pub fn new(nonce: u64) -> Self {
        Self(nonce)
    }

    /// Get the inner nonce value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Get the next nonce in sequence
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for EventNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
