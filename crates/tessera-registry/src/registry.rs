//! The registry: call dispatch and transactional commit
//!
//! [`Registry::execute`] decodes a raw call, checks every precondition, then
//! applies the mutation and commits staged events. Checks always precede the
//! first write, so a rejected call leaves state, balance, and the event log
//! exactly as they were.

use crate::calls::{Call, CallOutcome};
use crate::certificates::CertificateRegistry;
use crate::events::{EventLog, RegistryEvent};
use crate::identity::IdentityResolver;
use crate::metadata::MetadataStore;
use crate::superuser::{LedgerPayout, PayoutSink, SuperuserOverride};
use crate::zones::ZoneRegistry;
use serde::{Deserialize, Serialize};
use tessera_core::{
    Amount, CallContext, ConfigError, Locator, Principal, RegistryConfig, RegistryError, Result,
    Selector, ZoneId,
};

/// Persisted registry state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    /// Zone → authority
    pub zones: ZoneRegistry,
    /// (zone, principal) → enabled
    pub certificates: CertificateRegistry,
    /// (zone, location, selector) → locator
    pub metadata: MetadataStore,
    /// Superuser, pending nominee, and collected balance
    pub superuser: SuperuserOverride,
}

impl RegistryState {
    /// Fresh state with an initial superuser
    pub fn new(superuser: Principal) -> Self {
        Self {
            zones: ZoneRegistry::new(),
            certificates: CertificateRegistry::new(),
            metadata: MetadataStore::new(),
            superuser: SuperuserOverride::new(superuser),
        }
    }

    /// Reject state in which the registry's own address holds a role
    ///
    /// Forwarded self-calls present that address as their direct caller, so
    /// a zone authority or superuser equal to it would act for any signer.
    pub fn validate(
        &self,
        registry_address: &Principal,
    ) -> std::result::Result<(), ConfigError> {
        let reserved = |key: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("registry address {registry_address} cannot hold authority"),
        };
        if self.superuser.superuser() == *registry_address {
            return Err(reserved("superuser"));
        }
        if self.superuser.pending() == Some(*registry_address) {
            return Err(reserved("pending_superuser"));
        }
        if let Some((zone, _)) = self
            .zones
            .iter()
            .find(|(_, authority)| *authority == registry_address)
        {
            return Err(reserved(&format!("zones.{zone}")));
        }
        Ok(())
    }
}

/// Events staged by the call in progress
#[derive(Debug, Default)]
struct Transaction {
    events: Vec<RegistryEvent>,
}

impl Transaction {
    fn emit(&mut self, event: RegistryEvent) {
        self.events.push(event);
    }
}

/// Hierarchical trust registry
pub struct Registry {
    resolver: IdentityResolver,
    open_fee_threshold: Amount,
    state: RegistryState,
    events: EventLog,
    payout: Box<dyn PayoutSink>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("address", &self.resolver.registry_address())
            .field("open_fee_threshold", &self.open_fee_threshold)
            .field("state", &self.state)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Create an empty registry from a validated configuration
    pub fn new(config: RegistryConfig) -> std::result::Result<Self, ConfigError> {
        let state = RegistryState::new(config.superuser);
        Self::with_state(config, state, EventLog::new())
    }

    /// Restore a registry from persisted state and event log
    ///
    /// The configured superuser only seeds fresh registries; a restored
    /// registry keeps the superuser recorded in its state.
    pub fn with_state(
        config: RegistryConfig,
        state: RegistryState,
        events: EventLog,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        state.validate(&config.registry_address)?;
        Ok(Self {
            resolver: IdentityResolver::new(config.registry_address),
            open_fee_threshold: config.open_fee_threshold,
            state,
            events,
            payout: Box::new(LedgerPayout::new()),
        })
    }

    /// Replace the payout boundary used by `collect`
    pub fn with_payout(mut self, payout: impl PayoutSink + 'static) -> Self {
        self.payout = Box::new(payout);
        self
    }

    /// The registry's own address
    pub fn address(&self) -> Principal {
        self.resolver.registry_address()
    }

    /// Fee threshold for `open`
    pub fn open_fee_threshold(&self) -> Amount {
        self.open_fee_threshold
    }

    /// Read-only view of the state
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// Committed audit events
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Read a metadata entry
    pub fn get(&self, zone: &ZoneId, location: &Principal, selector: &Selector) -> Locator {
        self.state.metadata.get(zone, location, selector)
    }

    /// Authority of `zone`, if opened
    pub fn authority_of(&self, zone: &ZoneId) -> Option<Principal> {
        self.state.zones.authority(zone)
    }

    /// Whether `principal` holds an enabled certificate for `zone`
    pub fn is_certified(&self, zone: &ZoneId, principal: &Principal) -> bool {
        self.state.certificates.is_enabled(zone, principal)
    }

    /// Current superuser
    pub fn superuser(&self) -> Principal {
        self.state.superuser.superuser()
    }

    /// Pending superuser nominee
    pub fn pending_superuser(&self) -> Option<Principal> {
        self.state.superuser.pending()
    }

    /// Collected, not yet withdrawn, fees
    pub fn balance(&self) -> Amount {
        self.state.superuser.balance()
    }

    /// Encode `call` and execute it as a direct call from `caller`
    pub fn call(&mut self, caller: Principal, call: &Call) -> Result<CallOutcome> {
        self.call_with_value(caller, call, Amount::ZERO)
    }

    /// Encode `call` and execute it as a direct call carrying `value`
    pub fn call_with_value(
        &mut self,
        caller: Principal,
        call: &Call,
        value: Amount,
    ) -> Result<CallOutcome> {
        let context = CallContext::new(caller, call.encode()?).with_value(value);
        self.execute(&context)
    }

    /// Execute one raw call as an atomic transaction
    pub fn execute(&mut self, context: &CallContext) -> Result<CallOutcome> {
        let call = Call::decode(&context.payload).map_err(|e| {
            tracing::warn!(caller = %context.caller, error = %e, "rejected undecodable call");
            e
        })?;
        let name = call.name();
        tracing::debug!(
            caller = %context.caller,
            call = name,
            value = %context.value,
            "dispatching"
        );

        let mut tx = Transaction::default();
        match self.apply(call, context, &mut tx) {
            Ok(outcome) => {
                if !tx.events.is_empty() {
                    self.events.append(tx.events);
                    tracing::info!(caller = %context.caller, call = name, "call committed");
                }
                Ok(outcome)
            }
            Err(error) => {
                tracing::warn!(
                    caller = %context.caller,
                    call = name,
                    kind = error.kind(),
                    %error,
                    "call rejected"
                );
                Err(error)
            }
        }
    }

    fn apply(
        &mut self,
        call: Call,
        context: &CallContext,
        tx: &mut Transaction,
    ) -> Result<CallOutcome> {
        if !context.value.is_zero() && !call.is_payable() {
            return Err(RegistryError::UnexpectedPayment {
                paid: context.value,
            });
        }

        let caller = context.caller;
        match call {
            Call::Open { zone, authority } => {
                self.state.zones.check_open(
                    &zone,
                    &authority,
                    context.value,
                    self.open_fee_threshold,
                    &self.address(),
                )?;
                let balance = self.state.superuser.check_credit(context.value)?;

                self.state.zones.bind(zone, authority);
                self.state.superuser.set_balance(balance);
                tx.emit(RegistryEvent::ZoneOpened { zone, authority });
                Ok(CallOutcome::Unit)
            }

            Call::Authorize {
                zone,
                principal,
                enabled,
            } => {
                // Zone administration never goes through the forwarder
                self.state.zones.ensure_authority(&zone, &caller)?;

                self.state.certificates.set(zone, principal, enabled);
                tx.emit(RegistryEvent::CertificateSet {
                    zone,
                    principal,
                    enabled,
                });
                Ok(CallOutcome::Unit)
            }

            Call::Set {
                zone,
                location,
                selector,
                locator,
            } => {
                let resolved = self.resolver.resolve(context)?;
                self.state
                    .certificates
                    .ensure_enabled(&zone, &resolved.principal)?;

                self.write_metadata(tx, zone, location, selector, locator);
                Ok(CallOutcome::Unit)
            }

            Call::Get {
                zone,
                location,
                selector,
            } => Ok(CallOutcome::Locator(self.get(&zone, &location, &selector))),

            Call::Update {
                zone,
                location,
                selector,
                locator,
            } => {
                self.state.superuser.ensure_superuser(&caller)?;

                self.write_metadata(tx, zone, location, selector, locator);
                Ok(CallOutcome::Unit)
            }

            Call::Collect => {
                let amount = self
                    .state
                    .superuser
                    .collect(&caller, self.payout.as_mut())?;
                tracing::info!(recipient = %caller, %amount, "fees collected");
                Ok(CallOutcome::Collected(amount))
            }

            Call::TransferSuperuser { new_superuser } => {
                self.state.superuser.check_transfer(
                    &caller,
                    &new_superuser,
                    &self.address(),
                )?;

                self.state.superuser.nominate(new_superuser);
                tx.emit(RegistryEvent::SuperuserTransferStarted {
                    previous: caller,
                    pending: new_superuser,
                });
                Ok(CallOutcome::Unit)
            }

            Call::AcceptSuperuser => {
                self.state.superuser.check_accept(&caller)?;

                let previous = self.state.superuser.accept(caller);
                tx.emit(RegistryEvent::SuperuserTransferred {
                    previous,
                    current: caller,
                });
                Ok(CallOutcome::Unit)
            }
        }
    }

    fn write_metadata(
        &mut self,
        tx: &mut Transaction,
        zone: ZoneId,
        location: Principal,
        selector: Selector,
        locator: Locator,
    ) {
        self.state
            .metadata
            .put(zone, location, selector, locator.clone());
        tx.emit(RegistryEvent::MetadataSet {
            zone,
            location,
            selector,
            locator,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RegistryConfig {
        RegistryConfig::new(
            Principal::from_label("registry"),
            Principal::from_label("root"),
        )
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut bad = config();
        bad.superuser = Principal::NULL;
        assert!(Registry::new(bad).is_err());
    }

    #[test]
    fn test_restore_rejects_registry_address_in_a_role() {
        let registry_address = config().registry_address;

        let mut state = RegistryState::new(Principal::from_label("root"));
        state.superuser = SuperuserOverride::new(registry_address);
        let err = Registry::with_state(config(), state, EventLog::new()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "superuser"
        ));

        let mut state = RegistryState::new(Principal::from_label("root"));
        state.zones.bind(ZoneId::hash_of(b"z"), registry_address);
        let err = Registry::with_state(config(), state, EventLog::new()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key.starts_with("zones.")
        ));

        let mut state = RegistryState::new(Principal::from_label("root"));
        state.superuser.nominate(registry_address);
        assert!(Registry::with_state(config(), state, EventLog::new()).is_err());
    }

    #[test]
    fn test_payment_on_non_payable_call_rejected() {
        let mut registry = Registry::new(config()).unwrap();
        let err = registry
            .call_with_value(Principal::from_label("root"), &Call::Collect, Amount(1))
            .unwrap_err();
        assert_eq!(err, RegistryError::UnexpectedPayment { paid: Amount(1) });
    }

    #[test]
    fn test_open_credits_balance() {
        let mut registry = Registry::new(config()).unwrap();
        let paid = Amount::units(2);
        registry
            .call_with_value(
                Principal::from_label("a"),
                &Call::Open {
                    zone: ZoneId::hash_of(b"z"),
                    authority: Principal::from_label("a"),
                },
                paid,
            )
            .unwrap();
        assert_eq!(registry.balance(), paid);
        assert_eq!(registry.events().len(), 1);
    }

    #[test]
    fn test_get_emits_nothing() {
        let mut registry = Registry::new(config()).unwrap();
        let outcome = registry
            .call(
                Principal::from_label("anyone"),
                &Call::Get {
                    zone: ZoneId::hash_of(b"z"),
                    location: Principal::from_label("l"),
                    selector: Selector::from(1),
                },
            )
            .unwrap();
        assert_eq!(outcome, CallOutcome::Locator(Locator::empty()));
        assert!(registry.events().is_empty());
    }

    #[test]
    fn test_undecodable_payload_rejected() {
        let mut registry = Registry::new(config()).unwrap();
        let err = registry
            .execute(&CallContext::new(Principal::from_label("a"), vec![0xff, 0xff]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Decode { .. }));
    }
}
