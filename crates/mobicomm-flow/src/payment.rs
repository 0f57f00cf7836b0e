//! Payment Screen
//!
//! Thin screen wrapper over the payment executor: surfaces the order
//! summary, runs the submission, and maps failures to screen
//! transitions. A missing prerequisite sends the user back to the screen
//! that produces it; a failed submission keeps them here for a retry.

use std::sync::Arc;

use rust_decimal::Decimal;

use mobicomm_core::{CheckoutState, PlanSelection, RechargeBackend, Result};
use mobicomm_payments::{PaymentError, PaymentExecutor, PaymentMethod, PaymentReceipt};

use crate::screen::{ProgressStep, Screen};

/// The order summary shown above the method tabs
#[derive(Clone, Debug)]
pub struct OrderSummary {
    pub mobile_display: String,
    pub selection: PlanSelection,
    pub total: Decimal,
    pub step: ProgressStep,
}

/// Outcome of pressing pay
#[derive(Debug)]
pub enum PaymentOutcome {
    /// Paid; move to the receipt
    Success(Box<PaymentReceipt>),

    /// A prerequisite is missing; go back to the screen that produces it
    Blocked { redirect: Screen, message: String },

    /// Submission failed; stay here, retry is user-initiated
    Failed { message: String },
}

/// The payment screen
pub struct PaymentScreen {
    executor: PaymentExecutor,
}

impl PaymentScreen {
    pub fn new(backend: Arc<dyn RechargeBackend>) -> Self {
        Self { executor: PaymentExecutor::new(backend) }
    }

    /// Build the order summary; fails closed if identity or selection is
    /// missing so the caller can redirect
    pub fn order_summary(&self, state: &CheckoutState) -> Result<OrderSummary> {
        let identity = state.identity()?;
        let selection = state.selection()?;
        let total = selection.amount()?;
        Ok(OrderSummary {
            mobile_display: identity.mobile.display(),
            selection,
            total,
            step: ProgressStep::Pay,
        })
    }

    /// Submit the payment with the chosen method
    pub async fn pay(&self, state: &CheckoutState, method: &PaymentMethod) -> PaymentOutcome {
        match self.executor.submit(state, method).await {
            Ok(receipt) => PaymentOutcome::Success(Box::new(receipt)),
            Err(err @ PaymentError::MissingState { key }) => PaymentOutcome::Blocked {
                redirect: Screen::producer_of(key),
                message: err.user_message(),
            },
            Err(err @ PaymentError::Auth(_)) => PaymentOutcome::Blocked {
                redirect: Screen::IdentityGate,
                message: err.user_message(),
            },
            Err(err) => PaymentOutcome::Failed { message: err.user_message() },
        }
    }

    /// Ask for an invoice email; validates the address, remembers it for
    /// the next visit, and fires the send as a detached task
    pub fn request_invoice(
        &self,
        state: &CheckoutState,
        receipt: &PaymentReceipt,
        email: &str,
    ) -> std::result::Result<tokio::task::JoinHandle<()>, PaymentError> {
        let request = PaymentExecutor::invoice_request(receipt, email)?;
        state.set_contact_email(&request.email);
        Ok(self.executor.send_invoice_detached(request))
    }
}
