//! Superuser override and fee custody
//!
//! The superuser is registry state read at check time. It can overwrite any
//! metadata entry, withdraw collected fees, and hand the role over with a
//! two-step transfer. All superuser checks use the direct caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_core::{Amount, Principal, RegistryError, Result};

/// Rejection reported by a payout recipient
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PayoutRejected(pub String);

/// Boundary through which collected fees leave the registry
pub trait PayoutSink: Send {
    /// Deliver `amount` to `recipient`; an error leaves the registry balance
    /// untouched
    fn pay(
        &mut self,
        recipient: Principal,
        amount: Amount,
    ) -> std::result::Result<(), PayoutRejected>;
}

/// In-memory payout ledger that accepts every transfer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerPayout {
    paid: BTreeMap<Principal, Amount>,
}

impl LedgerPayout {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Total paid out to `recipient`
    pub fn paid_to(&self, recipient: &Principal) -> Amount {
        self.paid.get(recipient).copied().unwrap_or_default()
    }
}

impl PayoutSink for LedgerPayout {
    fn pay(
        &mut self,
        recipient: Principal,
        amount: Amount,
    ) -> std::result::Result<(), PayoutRejected> {
        let total = self.paid.entry(recipient).or_default();
        *total = total
            .checked_add(amount)
            .ok_or_else(|| PayoutRejected("recipient balance overflow".to_string()))?;
        Ok(())
    }
}

/// Superuser identity, pending nomination, and collected balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperuserOverride {
    superuser: Principal,
    #[serde(default)]
    pending: Option<Principal>,
    #[serde(default)]
    balance: Amount,
}

impl SuperuserOverride {
    /// Create with an initial superuser and no collected balance
    pub fn new(superuser: Principal) -> Self {
        Self {
            superuser,
            pending: None,
            balance: Amount::ZERO,
        }
    }

    /// Current superuser
    pub fn superuser(&self) -> Principal {
        self.superuser
    }

    /// Pending nominee, if a transfer is in progress
    pub fn pending(&self) -> Option<Principal> {
        self.pending
    }

    /// Collected balance
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Require `caller` to be the superuser
    pub fn ensure_superuser(&self, caller: &Principal) -> Result<()> {
        if *caller == self.superuser {
            Ok(())
        } else {
            Err(RegistryError::NotSuperuser { caller: *caller })
        }
    }

    /// Balance after crediting `amount`, without applying it
    pub fn check_credit(&self, amount: Amount) -> Result<Amount> {
        self.balance
            .checked_add(amount)
            .ok_or(RegistryError::BalanceOverflow)
    }

    pub(crate) fn set_balance(&mut self, balance: Amount) {
        self.balance = balance;
    }

    /// Pay the whole balance to the superuser through `sink`
    ///
    /// The balance is cleared only after the sink accepts the transfer.
    pub(crate) fn collect(
        &mut self,
        caller: &Principal,
        sink: &mut dyn PayoutSink,
    ) -> Result<Amount> {
        self.ensure_superuser(caller)?;
        let amount = self.balance;
        sink.pay(*caller, amount)
            .map_err(|e| RegistryError::TransferFailed {
                recipient: *caller,
                amount,
                reason: e.0,
            })?;
        self.balance = Amount::ZERO;
        Ok(amount)
    }

    /// Check a nomination without applying it
    ///
    /// The registry's own address is refused: acceptance compares against
    /// the direct caller, which every forwarded self-call presents.
    pub fn check_transfer(
        &self,
        caller: &Principal,
        nominee: &Principal,
        registry_address: &Principal,
    ) -> Result<()> {
        self.ensure_superuser(caller)?;
        if nominee.is_null() {
            return Err(RegistryError::NullAuthority);
        }
        if nominee == registry_address {
            return Err(RegistryError::ReservedAuthority {
                principal: *nominee,
            });
        }
        Ok(())
    }

    pub(crate) fn nominate(&mut self, nominee: Principal) {
        self.pending = Some(nominee);
    }

    /// Check an acceptance without applying it
    pub fn check_accept(&self, caller: &Principal) -> Result<()> {
        match self.pending {
            Some(pending) if pending == *caller => Ok(()),
            _ => Err(RegistryError::NotPendingSuperuser { caller: *caller }),
        }
    }

    /// Complete the transfer, returning the former superuser
    pub(crate) fn accept(&mut self, caller: Principal) -> Principal {
        let previous = self.superuser;
        self.superuser = caller;
        self.pending = None;
        previous
    }
}
