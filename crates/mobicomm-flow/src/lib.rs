//! # mobicomm-flow
//!
//! The MobiComm purchase flow as an explicit state machine.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │ Identity │──▶│ Catalog  │──▶│ Payment  │──▶│ Receipt  │
//! │   Gate   │   │ + Filter │   │          │   │ + Reset  │
//! └──────────┘   └──────────┘   └──────────┘   └────┬─────┘
//!      ▲              ▲                             │
//!      │              └─────────── reset ───────────┘
//!      └── auth / missing-state redirects
//! ```
//!
//! Each screen is a pure-ish async step over (checkout state, user
//! input, backend response); preconditions are checked against the
//! checkout channel and a missing prerequisite redirects to the screen
//! that produces it instead of proceeding with a fabricated default.

pub mod catalog;
pub mod filter;
pub mod identity_gate;
pub mod payment;
pub mod receipt;
pub mod screen;

pub use catalog::{Catalog, CatalogScreen, CategoryPane, PaneState};
pub use filter::PlanFilter;
pub use identity_gate::{GateOutcome, IdentityGate};
pub use payment::{OrderSummary, PaymentOutcome, PaymentScreen};
pub use receipt::{ReceiptScreen, ReceiptView};
pub use screen::{ProgressStep, Screen, Transition};

// Re-export what a front-end needs to drive the flow
pub use mobicomm_core::{CheckoutState, RechargeBackend};
pub use mobicomm_payments::PaymentMethod;

#[cfg(test)]
mod tests {
    //! End-to-end walk of the whole flow against the mock backend

    use std::sync::Arc;

    use rust_decimal_macros::dec;

    use mobicomm_core::{MockBackend, StateKey};

    use super::*;

    #[tokio::test]
    async fn test_full_recharge_scenario() {
        let backend = Arc::new(MockBackend::new());
        let state = CheckoutState::new();

        // identity gate admits a recognized subscriber
        let gate = IdentityGate::new(backend.clone());
        assert_eq!(gate.submit(&state, "9876543210").await, GateOutcome::Accepted);

        // catalog loads and the user picks plan 3
        let catalog_screen = CatalogScreen::new(backend.clone());
        let mut catalog = Catalog::empty();
        let epoch = catalog.begin_refresh();
        assert!(catalog.apply(epoch, catalog_screen.load().await.unwrap()));

        let (category, plan) = catalog
            .find_plan(3)
            .map(|(c, p)| (c.clone(), p.clone()))
            .expect("seeded plan");
        assert_eq!(plan.price, dec!(299));

        let transition = catalog_screen
            .select_plan(&state, "9876543210", &category, &plan)
            .unwrap();
        assert_eq!(transition, Transition::Forward(Screen::Payment));

        // checkout state now holds both identity and selection
        assert!(state.identity().is_ok());
        assert_eq!(state.selection().unwrap().plan_id, 3);

        // pay with UPI
        let payment_screen = PaymentScreen::new(backend.clone());
        let receipt = match payment_screen.pay(&state, &PaymentMethod::Upi { app: None }).await {
            PaymentOutcome::Success(receipt) => receipt,
            other => panic!("expected Success, got {other:?}"),
        };

        // the backend saw one well-formed create request
        let recharges = backend.recharges();
        assert_eq!(recharges.len(), 1);
        assert_eq!(recharges[0].mobile_number, "9876543210");
        assert_eq!(recharges[0].plan_id, 3);
        assert_eq!(recharges[0].amount, dec!(299));
        assert_eq!(recharges[0].payment_status, "Completed");
        assert!(recharges[0].payment_method.starts_with("UPI | TxnID: MBC"));

        // the receipt renders the same transaction
        let view = ReceiptScreen::view(&state).unwrap();
        assert_eq!(view.transaction_id, receipt.transaction_id);
        assert_eq!(view.price_label, "₹299");

        // after reset only identity and bookkeeping remain
        ReceiptScreen::acknowledge_and_reset(&state);
        assert_eq!(
            state.read_string(StateKey::MobileNumber).as_deref(),
            Some("9876543210")
        );
        assert_eq!(state.read(StateKey::PlanId), None);
        assert_eq!(state.read(StateKey::TransactionId), None);
        assert_eq!(
            state.read_string(StateKey::LastTransactionId).as_deref(),
            Some(receipt.transaction_id.as_str())
        );
    }

    #[tokio::test]
    async fn test_skipping_the_gate_bounces_payment_back() {
        let backend = Arc::new(MockBackend::new());
        let state = CheckoutState::new();

        // user lands straight on payment with nothing in the channel
        let payment_screen = PaymentScreen::new(backend.clone());
        match payment_screen.pay(&state, &PaymentMethod::Card).await {
            PaymentOutcome::Blocked { redirect, .. } => {
                assert_eq!(redirect, Screen::IdentityGate);
            }
            other => panic!("expected Blocked, got {other:?}"),
        }
        assert_eq!(backend.submit_calls(), 0);
    }
}
