//! Checkout State
//!
//! The key-value channel that threads identity, plan selection and
//! transaction outcome across screen transitions. One store instance per
//! flow session; never shared across sessions.
//!
//! Reading an absent key yields `None`, and the typed views turn absence
//! into a `MissingState` error naming the key. Callers must treat absence
//! as a validation failure; nothing here coerces a default.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use uuid::Uuid;

use crate::error::{RechargeError, Result};
use crate::identity::{MobileNumber, SessionIdentity, SessionToken};
use crate::plan::PlanSelection;

/// Keys of the checkout channel.
///
/// Names on the wire-side (`as_str`) keep the original storage-key spelling
/// so logs line up with the backend's field names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKey {
    MobileNumber,
    SessionToken,
    ContactEmail,
    PlanId,
    PlanName,
    Price,
    DataAllowance,
    Validity,
    Calls,
    Sms,
    Benefits,
    TransactionId,
    TransactionDate,
    PaymentMethod,
    LastTransactionId,
    LastRechargeAt,
}

impl StateKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StateKey::MobileNumber => "mobileNumber",
            StateKey::SessionToken => "sessionToken",
            StateKey::ContactEmail => "contactEmail",
            StateKey::PlanId => "planId",
            StateKey::PlanName => "planName",
            StateKey::Price => "price",
            StateKey::DataAllowance => "data",
            StateKey::Validity => "validity",
            StateKey::Calls => "calls",
            StateKey::Sms => "sms",
            StateKey::Benefits => "benefits",
            StateKey::TransactionId => "transactionId",
            StateKey::TransactionDate => "transactionDate",
            StateKey::PaymentMethod => "paymentMethod",
            StateKey::LastTransactionId => "lastTransactionId",
            StateKey::LastRechargeAt => "lastRechargeAt",
        }
    }

    /// Keys removed by `clear_transient`; identity and last-recharge
    /// bookkeeping survive a reset.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            StateKey::PlanId
                | StateKey::PlanName
                | StateKey::Price
                | StateKey::DataAllowance
                | StateKey::Validity
                | StateKey::Calls
                | StateKey::Sms
                | StateKey::Benefits
                | StateKey::TransactionId
                | StateKey::TransactionDate
                | StateKey::PaymentMethod
        )
    }

    pub const ALL: [StateKey; 16] = [
        StateKey::MobileNumber,
        StateKey::SessionToken,
        StateKey::ContactEmail,
        StateKey::PlanId,
        StateKey::PlanName,
        StateKey::Price,
        StateKey::DataAllowance,
        StateKey::Validity,
        StateKey::Calls,
        StateKey::Sms,
        StateKey::Benefits,
        StateKey::TransactionId,
        StateKey::TransactionDate,
        StateKey::PaymentMethod,
        StateKey::LastTransactionId,
        StateKey::LastRechargeAt,
    ];
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage trait for the checkout channel.
///
/// No operation fails for a missing key; `read` of an absent key is `None`.
pub trait CheckoutStore: Send + Sync {
    /// Write a value under a key, replacing any previous value
    fn write(&self, key: StateKey, value: Value);

    /// Read a value; absent keys yield `None`
    fn read(&self, key: StateKey) -> Option<Value>;

    /// Remove a key; removing an absent key is a no-op
    fn remove(&self, key: StateKey);

    /// Scope identifier, for log correlation
    fn scope(&self) -> Uuid;
}

/// In-memory store; one instance per flow session
pub struct MemoryCheckoutStore {
    scope: Uuid,
    values: RwLock<HashMap<StateKey, Value>>,
}

impl Default for MemoryCheckoutStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCheckoutStore {
    pub fn new() -> Self {
        Self {
            scope: Uuid::new_v4(),
            values: RwLock::new(HashMap::new()),
        }
    }
}

impl CheckoutStore for MemoryCheckoutStore {
    fn write(&self, key: StateKey, value: Value) {
        let mut values = self.values.write().unwrap();
        tracing::debug!(scope = %self.scope, key = %key, "checkout state write");
        values.insert(key, value);
    }

    fn read(&self, key: StateKey) -> Option<Value> {
        let values = self.values.read().unwrap();
        values.get(&key).cloned()
    }

    fn remove(&self, key: StateKey) {
        let mut values = self.values.write().unwrap();
        values.remove(&key);
    }

    fn scope(&self) -> Uuid {
        self.scope
    }
}

/// Handle over a checkout store with the typed views the screens use
#[derive(Clone)]
pub struct CheckoutState {
    store: Arc<dyn CheckoutStore>,
}

impl Default for CheckoutState {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutState {
    /// Create a fresh session-scoped state
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryCheckoutStore::new()),
        }
    }

    /// Wrap an existing store
    pub fn with_store(store: Arc<dyn CheckoutStore>) -> Self {
        Self { store }
    }

    pub fn scope(&self) -> Uuid {
        self.store.scope()
    }

    pub fn write(&self, key: StateKey, value: Value) {
        self.store.write(key, value);
    }

    pub fn write_str(&self, key: StateKey, value: &str) {
        self.store.write(key, Value::from(value));
    }

    pub fn read(&self, key: StateKey) -> Option<Value> {
        self.store.read(key)
    }

    /// Read a string value; a present-but-non-string value reads as `None`
    pub fn read_string(&self, key: StateKey) -> Option<String> {
        self.store
            .read(key)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn remove(&self, key: StateKey) {
        self.store.remove(key);
    }

    /// Remove plan and transaction fields, keeping identity and
    /// last-recharge bookkeeping
    pub fn clear_transient(&self) {
        tracing::debug!(scope = %self.scope(), "clearing transient checkout state");
        for key in StateKey::ALL {
            if key.is_transient() {
                self.store.remove(key);
            }
        }
    }

    /// Remove everything, identity included
    pub fn clear_all(&self) {
        tracing::debug!(scope = %self.scope(), "clearing all checkout state");
        for key in StateKey::ALL {
            self.store.remove(key);
        }
    }

    // ---- typed views -----------------------------------------------------

    /// Store a validated identity (gate success)
    pub fn write_identity(&self, identity: &SessionIdentity) {
        self.write_str(StateKey::MobileNumber, identity.mobile.as_str());
        self.write_str(StateKey::SessionToken, identity.token.as_str());
        if let Some(email) = &identity.contact_email {
            self.write_str(StateKey::ContactEmail, email);
        }
    }

    /// Read the identity back, failing closed on absence or corruption
    pub fn identity(&self) -> Result<SessionIdentity> {
        let mobile = self
            .read_string(StateKey::MobileNumber)
            .ok_or(RechargeError::MissingState { key: StateKey::MobileNumber })?;
        let token = self
            .read_string(StateKey::SessionToken)
            .ok_or(RechargeError::MissingState { key: StateKey::SessionToken })?;
        Ok(SessionIdentity {
            mobile: MobileNumber::parse(&mobile)?,
            token: SessionToken::from_string(token),
            contact_email: self.read_string(StateKey::ContactEmail),
        })
    }

    /// Store an immutable plan selection (catalog success)
    pub fn write_selection(&self, selection: &PlanSelection) {
        self.write(StateKey::PlanId, Value::from(selection.plan_id));
        self.write_str(StateKey::PlanName, &selection.plan_name);
        self.write_str(StateKey::Price, &selection.price);
        self.write_str(StateKey::DataAllowance, &selection.data);
        self.write_str(StateKey::Validity, &selection.validity);
        self.write_str(StateKey::Calls, &selection.calls);
        self.write_str(StateKey::Sms, &selection.sms);
        self.write_str(StateKey::Benefits, &selection.benefits);
    }

    /// Read the plan selection back, failing closed on absence
    pub fn selection(&self) -> Result<PlanSelection> {
        let plan_id = self
            .read(StateKey::PlanId)
            .ok_or(RechargeError::MissingState { key: StateKey::PlanId })?;
        let plan_id = plan_id.as_i64().ok_or_else(|| {
            RechargeError::Validation(format!("Plan id is not numeric: {plan_id}"))
        })?;
        let price = self
            .read_string(StateKey::Price)
            .ok_or(RechargeError::MissingState { key: StateKey::Price })?;
        Ok(PlanSelection {
            plan_id,
            price,
            plan_name: self
                .read_string(StateKey::PlanName)
                .unwrap_or_else(|| "Data Plan".into()),
            data: self.read_string(StateKey::DataAllowance).unwrap_or_default(),
            validity: self.read_string(StateKey::Validity).unwrap_or_default(),
            calls: self.read_string(StateKey::Calls).unwrap_or_default(),
            sms: self.read_string(StateKey::Sms).unwrap_or_default(),
            benefits: self.read_string(StateKey::Benefits).unwrap_or_default(),
        })
    }

    /// Store the outcome of a successful payment submission
    pub fn write_transaction(&self, transaction_id: &str, display_date: &str, method_label: &str) {
        self.write_str(StateKey::TransactionId, transaction_id);
        self.write_str(StateKey::TransactionDate, display_date);
        self.write_str(StateKey::PaymentMethod, method_label);
    }

    /// Read the transaction fields back for the receipt
    pub fn transaction(&self) -> Result<TransactionFields> {
        let read = |key: StateKey| {
            self.read_string(key)
                .ok_or(RechargeError::MissingState { key })
        };
        Ok(TransactionFields {
            transaction_id: read(StateKey::TransactionId)?,
            display_date: read(StateKey::TransactionDate)?,
            method_label: read(StateKey::PaymentMethod)?,
        })
    }

    pub fn contact_email(&self) -> Option<String> {
        self.read_string(StateKey::ContactEmail)
    }

    pub fn set_contact_email(&self, email: &str) {
        self.write_str(StateKey::ContactEmail, email);
    }
}

/// Transaction fields the receipt screen renders
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionFields {
    pub transaction_id: String,
    pub display_date: String,
    pub method_label: String,
}
