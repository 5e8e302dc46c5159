//! Serialized host for concurrent submitters
//!
//! Transactions from any number of threads are applied one at a time under a
//! single lock, giving the total order the registry's atomicity relies on.
//! Uses `parking_lot::Mutex` because no call holds the lock across a
//! suspension point and the registry never re-enters itself through the host.

use crate::calls::{Call, CallOutcome};
use crate::forwarding::{Forwarder, TrustedForwarder};
use crate::registry::Registry;
use crate::snapshot::RegistrySnapshot;
use parking_lot::Mutex;
use std::sync::Arc;
use tessera_core::{Amount, CallContext, Principal, Result};

/// Shared handle to a registry that serializes all calls
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    /// Wrap a registry
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Submit a raw call
    pub fn submit(&self, context: &CallContext) -> Result<CallOutcome> {
        self.inner.lock().execute(context)
    }

    /// Submit `call` as a direct call from `caller`
    pub fn call(&self, caller: Principal, call: &Call) -> Result<CallOutcome> {
        self.inner.lock().call(caller, call)
    }

    /// Submit `call` as a direct call carrying `value`
    pub fn call_with_value(
        &self,
        caller: Principal,
        call: &Call,
        value: Amount,
    ) -> Result<CallOutcome> {
        self.inner.lock().call_with_value(caller, call, value)
    }

    /// Relay `call` for an already verified `signer` through the forwarding path
    pub fn forward(&self, signer: Principal, call: &Call) -> Result<CallOutcome> {
        let mut registry = self.inner.lock();
        let context = TrustedForwarder::new(registry.address()).forward(signer, call)?;
        registry.execute(&context)
    }

    /// Run a read-only closure against the registry
    pub fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Capture a consistent snapshot
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.read(RegistrySnapshot::capture)
    }
}
