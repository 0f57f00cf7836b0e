//! Payment Execution
//!
//! Drives a recharge submission end to end: fail-closed precondition
//! checks against the checkout state, record assembly, one network call,
//! and the state write that makes the receipt renderable. The invoice
//! email is a detached task whose failure never reaches the caller.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::task::JoinHandle;

use mobicomm_core::{CheckoutState, InvoiceRequest, MobileNumber, RechargeBackend};

use crate::error::{PaymentError, Result};
use crate::method::PaymentMethod;
use crate::transaction::TransactionRecord;

/// Outcome of a successful submission, ready for the receipt screen
#[derive(Clone, Debug)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    pub amount: Decimal,
    pub method_label: String,
    pub display_date: String,
    pub mobile: MobileNumber,
    pub plan_name: String,

    /// The backend's authoritative copy of the record
    pub confirmation: Value,
}

/// Executes recharge payments against a backend
pub struct PaymentExecutor {
    backend: Arc<dyn RechargeBackend>,
}

impl PaymentExecutor {
    pub fn new(backend: Arc<dyn RechargeBackend>) -> Self {
        Self { backend }
    }

    /// Submit a payment with the chosen method.
    ///
    /// Preconditions are checked before any network call: identity and
    /// selection must be present and well-formed, and the stored price
    /// must parse as a non-negative decimal. Every attempt generates a
    /// fresh transaction id; a failed attempt leaves the checkout state
    /// untouched so the user can simply press submit again.
    pub async fn submit(
        &self,
        state: &CheckoutState,
        method: &PaymentMethod,
    ) -> Result<PaymentReceipt> {
        let identity = state.identity()?;
        let selection = state.selection()?;
        let amount = selection.amount()?;

        let record = TransactionRecord::assemble(
            identity.mobile.clone(),
            selection.plan_id,
            amount,
            method,
            Utc::now(),
        );

        tracing::info!(
            txn = %record.id,
            plan_id = record.plan_id,
            amount = %record.amount,
            "submitting recharge"
        );

        let confirmation = self
            .backend
            .submit_recharge(&identity.token, &record.to_request())
            .await?;

        state.write_transaction(record.id.as_str(), &record.display_date(), &record.method_label);
        tracing::info!(txn = %record.id, "recharge completed");

        Ok(PaymentReceipt {
            transaction_id: record.id.as_str().to_string(),
            amount: record.amount,
            display_date: record.display_date(),
            method_label: record.method_label,
            mobile: identity.mobile,
            plan_name: selection.plan_name,
            confirmation,
        })
    }

    /// Build the invoice request for a completed payment.
    ///
    /// The email address gets the same minimal check the original applied
    /// before offering to send an invoice.
    pub fn invoice_request(receipt: &PaymentReceipt, email: &str) -> Result<InvoiceRequest> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(PaymentError::Validation(
                "Invalid email address. Invoice will not be sent.".into(),
            ));
        }
        Ok(InvoiceRequest {
            email: email.to_string(),
            mobile_number: receipt.mobile.as_str().to_string(),
            plan_name: receipt.plan_name.clone(),
            amount: receipt.amount.to_string(),
            transaction_id: receipt.transaction_id.clone(),
            payment_method: receipt.method_label.clone(),
            transaction_date: receipt.display_date.clone(),
        })
    }

    /// Fire-and-forget invoice email. The task owns its data; a failure
    /// is logged and never propagated.
    pub fn send_invoice_detached(&self, request: InvoiceRequest) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            match backend.send_invoice(&request).await {
                Ok(()) => tracing::info!(email = %request.email, "invoice email sent"),
                Err(err) => {
                    tracing::warn!(email = %request.email, error = %err, "invoice email failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobicomm_core::{
        Category, MockBackend, Plan, PlanSelection, SessionIdentity, SessionToken, StateKey,
    };
    use rust_decimal_macros::dec;

    fn seeded_state() -> CheckoutState {
        let state = CheckoutState::new();
        state.write_identity(&SessionIdentity {
            mobile: MobileNumber::parse("9876543210").unwrap(),
            token: SessionToken::from_string("tok-1"),
            contact_email: None,
        });
        state
    }

    fn select_sample_plan(state: &CheckoutState) {
        let category = Category { category_id: 1, category_name: "Data Packs".into() };
        let plan = Plan {
            plan_id: 3,
            price: dec!(299),
            data: Some("2GB/day".into()),
            validity: Some("28 days".into()),
            calls: Some("Unlimited".into()),
            benefits: None,
        };
        state.write_selection(&PlanSelection::from_plan(&plan, &category));
    }

    #[tokio::test]
    async fn test_missing_selection_blocks_without_network() {
        let backend = Arc::new(MockBackend::new());
        let executor = PaymentExecutor::new(backend.clone());
        let state = seeded_state();

        let err = executor
            .submit(&state, &PaymentMethod::Upi { app: None })
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::MissingState { key: StateKey::PlanId }));
        assert_eq!(backend.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_identity_blocks_without_network() {
        let backend = Arc::new(MockBackend::new());
        let executor = PaymentExecutor::new(backend.clone());
        let state = CheckoutState::new();
        select_sample_plan(&state);

        let err = executor.submit(&state, &PaymentMethod::Card).await.unwrap_err();
        assert!(matches!(err, PaymentError::MissingState { key: StateKey::MobileNumber }));
        assert_eq!(backend.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_unparsable_price_blocks_without_network() {
        let backend = Arc::new(MockBackend::new());
        let executor = PaymentExecutor::new(backend.clone());
        let state = seeded_state();
        select_sample_plan(&state);
        state.write_str(StateKey::Price, "free!!");

        let err = executor.submit(&state, &PaymentMethod::Card).await.unwrap_err();
        assert!(matches!(err, PaymentError::Validation(_)));
        assert_eq!(backend.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_submission_writes_transaction_state() {
        let backend = Arc::new(MockBackend::new());
        let executor = PaymentExecutor::new(backend.clone());
        let state = seeded_state();
        select_sample_plan(&state);

        let receipt = executor
            .submit(&state, &PaymentMethod::Upi { app: Some("GPay".into()) })
            .await
            .unwrap();

        assert_eq!(receipt.amount, dec!(299));
        assert_eq!(receipt.method_label, "UPI (GPay)");
        assert!(receipt.transaction_id.starts_with("MBC"));

        // state now carries the transaction fields
        let txn = state.transaction().unwrap();
        assert_eq!(txn.transaction_id, receipt.transaction_id);
        assert_eq!(txn.method_label, "UPI (GPay)");

        // wire payload shape
        let recharges = backend.recharges();
        assert_eq!(recharges.len(), 1);
        assert_eq!(recharges[0].mobile_number, "9876543210");
        assert_eq!(recharges[0].plan_id, 3);
        assert_eq!(recharges[0].amount, dec!(299));
        assert_eq!(recharges[0].payment_status, "Completed");
        assert!(
            recharges[0]
                .payment_method
                .starts_with("UPI (GPay) | TxnID: MBC")
        );
    }

    #[tokio::test]
    async fn test_failed_submission_leaves_state_for_retry() {
        let backend = Arc::new(MockBackend::new().with_submission_failure());
        let executor = PaymentExecutor::new(backend.clone());
        let state = seeded_state();
        select_sample_plan(&state);

        let err = executor.submit(&state, &PaymentMethod::Card).await.unwrap_err();
        assert!(matches!(err, PaymentError::SubmissionFailed(_)));
        assert!(err.is_retryable());

        // plan and identity survive; no transaction fields were written
        assert!(state.identity().is_ok());
        assert!(state.selection().is_ok());
        assert!(state.transaction().is_err());
    }

    #[tokio::test]
    async fn test_retry_regenerates_the_transaction_id() {
        let backend = Arc::new(MockBackend::new());
        let executor = PaymentExecutor::new(backend.clone());
        let state = seeded_state();
        select_sample_plan(&state);

        let first = executor.submit(&state, &PaymentMethod::Card).await.unwrap();
        let second = executor.submit(&state, &PaymentMethod::Card).await.unwrap();
        assert_ne!(first.transaction_id, second.transaction_id);

        let recharges = backend.recharges();
        assert_eq!(recharges.len(), 2);
        assert_ne!(recharges[0].payment_method, recharges[1].payment_method);
    }

    #[tokio::test]
    async fn test_invoice_failure_is_swallowed() {
        let backend = Arc::new(MockBackend::new().with_invoice_failure());
        let executor = PaymentExecutor::new(backend.clone());
        let state = seeded_state();
        select_sample_plan(&state);

        let receipt = executor.submit(&state, &PaymentMethod::Card).await.unwrap();
        let request = PaymentExecutor::invoice_request(&receipt, "user@example.com").unwrap();

        // the detached task completes without surfacing the failure
        executor.send_invoice_detached(request).await.unwrap();
        assert_eq!(backend.invoice_calls(), 1);

        // the receipt state is untouched
        assert!(state.transaction().is_ok());
    }

    #[tokio::test]
    async fn test_invoice_request_rejects_bad_email() {
        let backend = Arc::new(MockBackend::new());
        let executor = PaymentExecutor::new(backend.clone());
        let state = seeded_state();
        select_sample_plan(&state);

        let receipt = executor.submit(&state, &PaymentMethod::Card).await.unwrap();
        assert!(PaymentExecutor::invoice_request(&receipt, "not-an-email").is_err());
    }
}
