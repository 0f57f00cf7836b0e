//! Backend Contract
//!
//! Strategy trait over the recharge REST backend. The flow works
//! exclusively through this interface; the HTTP implementation lives in
//! `mobicomm-backend`, and `MockBackend` here serves tests and demos.

mod mock;

pub use mock::MockBackend;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::identity::{MobileNumber, SessionToken};
use crate::plan::{Category, Plan};

/// Response of the validate-mobile call.
///
/// Presence of a token is what marks a recognized subscriber; an OK
/// response without one is still a rejection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MobileValidation {
    #[serde(default)]
    pub token: Option<String>,
}

impl MobileValidation {
    pub fn is_subscriber(&self) -> bool {
        self.token.is_some()
    }
}

/// Body of `POST /api/transactions/recharge`; one atomic create request
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeRequest {
    pub mobile_number: String,

    pub plan_id: i64,

    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Method label plus the advisory transaction id, e.g.
    /// `UPI | TxnID: MBC0000012345`
    pub payment_method: String,

    pub payment_status: String,

    pub transaction_date: DateTime<Utc>,

    pub expiry_date: DateTime<Utc>,
}

/// Body of `POST /api/email/send-invoice`; best-effort side channel
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub email: String,
    pub mobile_number: String,
    pub plan_name: String,
    pub amount: String,
    pub transaction_id: String,
    pub payment_method: String,
    pub transaction_date: String,
}

/// The recharge REST backend as the flow consumes it.
///
/// Catalog reads are idempotent and safe to repeat; the recharge
/// submission is the one privileged call and carries the session token.
#[async_trait]
pub trait RechargeBackend: Send + Sync {
    /// Confirm a number belongs to a subscriber; a token in the response
    /// admits the caller into the purchase flow
    async fn validate_mobile(&self, mobile: &MobileNumber) -> Result<MobileValidation>;

    /// Ordered category list; read-only
    async fn categories(&self) -> Result<Vec<Category>>;

    /// Plans for one category; read-only, fetched per category
    async fn plans(&self, category_id: i64) -> Result<Vec<Plan>>;

    /// Create the transaction record. The backend owns settlement; the
    /// returned value is its authoritative copy.
    async fn submit_recharge(
        &self,
        token: &SessionToken,
        request: &RechargeRequest,
    ) -> Result<Value>;

    /// Send the invoice email. Callers treat failures as log-only.
    async fn send_invoice(&self, request: &InvoiceRequest) -> Result<()>;

    /// Backend name, for logs
    fn name(&self) -> &str;
}
