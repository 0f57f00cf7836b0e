//! Receipt Screen
//!
//! Renders the confirmation after a completed payment and resets the
//! checkout channel down to what the next visit needs: the identity and
//! a little last-recharge bookkeeping.

use chrono::Utc;

use mobicomm_core::{CheckoutState, Result, StateKey};

use crate::screen::{ProgressStep, Screen, Transition};

/// Everything the confirmation renders
#[derive(Clone, Debug)]
pub struct ReceiptView {
    pub transaction_id: String,
    pub display_date: String,
    pub method_label: String,
    pub price_label: String,
    pub plan_name: String,
    pub mobile_display: String,
    pub step: ProgressStep,
}

/// The receipt screen
pub struct ReceiptScreen;

impl ReceiptScreen {
    /// Build the confirmation view; fails closed if the transaction
    /// fields are absent so the caller can redirect
    pub fn view(state: &CheckoutState) -> Result<ReceiptView> {
        let identity = state.identity()?;
        let selection = state.selection()?;
        let transaction = state.transaction()?;

        Ok(ReceiptView {
            transaction_id: transaction.transaction_id,
            display_date: transaction.display_date,
            method_label: transaction.method_label,
            price_label: selection.price_label(),
            plan_name: selection.plan_name,
            mobile_display: identity.mobile.display(),
            step: ProgressStep::Done,
        })
    }

    /// Acknowledge the receipt: clear transient state, record the
    /// last-recharge bookkeeping, and go back to the catalog entry point
    pub fn acknowledge_and_reset(state: &CheckoutState) -> Transition {
        let last_transaction = state.read_string(StateKey::TransactionId);

        state.clear_transient();

        if let Some(id) = last_transaction {
            state.write_str(StateKey::LastTransactionId, &id);
        }
        state.write_str(StateKey::LastRechargeAt, &Utc::now().to_rfc3339());

        tracing::info!(scope = %state.scope(), "checkout reset after receipt");
        Transition::Forward(Screen::Catalog)
    }
}
