//! Registry error taxonomy
//!
//! Every variant is a precondition violation detected before any state is
//! touched. A failed call commits nothing, so callers branch on the variant
//! and resubmit with corrected inputs.

use crate::identifiers::{Amount, Principal, ZoneId};
use serde::{Deserialize, Serialize};

/// Error returned by a registry call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RegistryError {
    /// Payment attached to `open` does not exceed the fee threshold
    #[error("payment required: {paid} does not exceed threshold {threshold}")]
    PaymentRequired {
        /// Amount attached to the call
        paid: Amount,
        /// Configured threshold
        threshold: Amount,
    },

    /// Zone is already bound to an authority
    #[error("zone {zone} already exists")]
    AlreadyExists {
        /// Zone that was already opened
        zone: ZoneId,
    },

    /// Zone authority or superuser candidate is the null principal
    #[error("null principal cannot hold authority")]
    NullAuthority,

    /// Zone authority or superuser candidate is the registry's own address,
    /// which every forwarded self-call presents as its direct caller
    #[error("{principal} is the registry address and cannot hold authority")]
    ReservedAuthority {
        /// Rejected principal
        principal: Principal,
    },

    /// Direct caller is not the zone's authority, or the zone was never opened
    #[error("{caller} is not the authority of zone {zone}")]
    NotZoneOwner {
        /// Zone being administered
        zone: ZoneId,
        /// Direct caller
        caller: Principal,
    },

    /// Resolved principal holds no enabled certificate for the zone
    #[error("{principal} holds no enabled certificate for zone {zone}")]
    NotAuthorized {
        /// Zone being written
        zone: ZoneId,
        /// Resolved principal
        principal: Principal,
    },

    /// Direct caller is not the superuser
    #[error("{caller} is not the superuser")]
    NotSuperuser {
        /// Direct caller
        caller: Principal,
    },

    /// Direct caller is not the pending superuser
    #[error("{caller} is not the pending superuser")]
    NotPendingSuperuser {
        /// Direct caller
        caller: Principal,
    },

    /// Payout recipient rejected the transfer
    #[error("transfer of {amount} to {recipient} failed: {reason}")]
    TransferFailed {
        /// Intended recipient
        recipient: Principal,
        /// Amount that was not transferred
        amount: Amount,
        /// Reason reported by the payout boundary
        reason: String,
    },

    /// Self-call payload too short to carry a forwarded principal
    #[error("forwarded call payload of {len} bytes is malformed (minimum {min})")]
    MalformedForwardedCall {
        /// Payload length
        len: usize,
        /// Minimum accepted length
        min: usize,
    },

    /// Call payload does not decode to a registry call
    #[error("undecodable call payload: {message}")]
    Decode {
        /// Decoder message
        message: String,
    },

    /// Call could not be encoded into a payload
    #[error("call encoding failed: {message}")]
    Encode {
        /// Encoder message
        message: String,
    },

    /// Payment attached to a call that does not accept one
    #[error("call does not accept payment ({paid} attached)")]
    UnexpectedPayment {
        /// Amount attached to the call
        paid: Amount,
    },

    /// Collected balance would overflow
    #[error("collected balance overflow")]
    BalanceOverflow,
}

impl RegistryError {
    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an encode error
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Stable short name of the error condition, for logs and tooling
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PaymentRequired { .. } => "payment_required",
            Self::AlreadyExists { .. } => "already_exists",
            Self::NullAuthority => "null_authority",
            Self::ReservedAuthority { .. } => "reserved_authority",
            Self::NotZoneOwner { .. } => "not_zone_owner",
            Self::NotAuthorized { .. } => "not_authorized",
            Self::NotSuperuser { .. } => "not_superuser",
            Self::NotPendingSuperuser { .. } => "not_pending_superuser",
            Self::TransferFailed { .. } => "transfer_failed",
            Self::MalformedForwardedCall { .. } => "malformed_forwarded_call",
            Self::Decode { .. } => "decode",
            Self::Encode { .. } => "encode",
            Self::UnexpectedPayment { .. } => "unexpected_payment",
            Self::BalanceOverflow => "balance_overflow",
        }
    }
}

/// Standard Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
