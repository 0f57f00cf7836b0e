//! Transaction Records
//!
//! Client-side assembly of the recharge transaction. The id generated
//! here is advisory only; the backend is the source of truth for
//! uniqueness and settlement.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mobicomm_core::{MobileNumber, RechargeRequest};

use crate::method::PaymentMethod;

/// Validity granted by a recharge, in days
pub const PLAN_VALIDITY_DAYS: i64 = 30;

/// Client-generated transaction id: `MBC` + 10 zero-padded digits
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a fresh id from UUIDv4 entropy
    pub fn generate() -> Self {
        let entropy = Uuid::new_v4().as_u128() % 10_000_000_000;
        Self(format!("MBC{entropy:010}"))
    }

    /// Parse from string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recharge transaction assembled for submission
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Advisory client id
    pub id: TransactionId,

    /// Subscriber being recharged
    pub mobile: MobileNumber,

    /// Selected catalog plan
    pub plan_id: i64,

    /// Amount parsed from the stored price
    pub amount: Decimal,

    /// Method label as shown to the user
    pub method_label: String,

    /// Submission timestamp
    pub transaction_date: DateTime<Utc>,

    /// Exactly 30 days after the transaction timestamp
    pub expiry_date: DateTime<Utc>,
}

impl TransactionRecord {
    /// Assemble a record at the given instant
    pub fn assemble(
        mobile: MobileNumber,
        plan_id: i64,
        amount: Decimal,
        method: &PaymentMethod,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            mobile,
            plan_id,
            amount,
            method_label: method.label(),
            transaction_date: now,
            expiry_date: now + Duration::days(PLAN_VALIDITY_DAYS),
        }
    }

    /// Locale display string, e.g. `05 Aug 2025, 03:12 PM`
    pub fn display_date(&self) -> String {
        self.transaction_date.format("%d %b %Y, %I:%M %p").to_string()
    }

    /// Method field as submitted on the wire, id suffixed
    pub fn wire_method(&self) -> String {
        format!("{} | TxnID: {}", self.method_label, self.id)
    }

    /// The atomic create request for the backend
    pub fn to_request(&self) -> RechargeRequest {
        RechargeRequest {
            mobile_number: self.mobile.as_str().to_string(),
            plan_id: self.plan_id,
            amount: self.amount,
            payment_method: self.wire_method(),
            payment_status: "Completed".into(),
            transaction_date: self.transaction_date,
            expiry_date: self.expiry_date,
        }
    }
}
