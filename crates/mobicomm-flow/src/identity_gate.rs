//! Identity Gate Screen
//!
//! Confirms a number belongs to a subscriber before the flow proceeds.
//! The format pre-filter runs first so malformed input never costs a
//! round-trip; only a backend response carrying a token admits the user.

use std::sync::Arc;

use mobicomm_core::{
    CheckoutState, MobileNumber, RechargeBackend, RechargeError, SessionIdentity, SessionToken,
    StateKey,
};

/// Outcome of a gate submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// Recognized subscriber; identity written, proceed to the catalog
    Accepted,

    /// Rejected input or unrecognized number; stay with an inline message
    Rejected { message: String },

    /// Backend unreachable; stay, user may resubmit
    Unavailable { message: String },
}

/// The identity gate screen
pub struct IdentityGate {
    backend: Arc<dyn RechargeBackend>,
}

impl IdentityGate {
    pub fn new(backend: Arc<dyn RechargeBackend>) -> Self {
        Self { backend }
    }

    /// Validate a raw number and, on success, write the session identity.
    ///
    /// No automatic retry on any failure path; the user resubmits.
    pub async fn submit(&self, state: &CheckoutState, raw: &str) -> GateOutcome {
        let mobile = match MobileNumber::parse(raw) {
            Ok(mobile) => mobile,
            Err(err) => return GateOutcome::Rejected { message: err.user_message() },
        };

        match self.backend.validate_mobile(&mobile).await {
            Ok(validation) => match validation.token {
                Some(token) => {
                    tracing::info!(mobile = %mobile, "subscriber validated");
                    state.write_identity(&SessionIdentity {
                        mobile,
                        token: SessionToken::from_string(token),
                        contact_email: state.contact_email(),
                    });
                    GateOutcome::Accepted
                }
                None => GateOutcome::Rejected {
                    message: "Enter a valid MobiComm number.".into(),
                },
            },
            Err(err @ RechargeError::Network(_)) => {
                tracing::warn!(error = %err, "mobile validation unreachable");
                GateOutcome::Unavailable { message: err.user_message() }
            }
            Err(err) => GateOutcome::Rejected { message: err.user_message() },
        }
    }

    /// Number remembered from a previous session, for prefilling the field
    pub fn stored_number(state: &CheckoutState) -> Option<String> {
        state.read_string(StateKey::MobileNumber)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobicomm_core::MockBackend;

    #[tokio::test]
    async fn test_malformed_number_is_rejected_without_network() {
        let backend = Arc::new(MockBackend::new());
        let gate = IdentityGate::new(backend.clone());
        let state = CheckoutState::new();

        let outcome = gate.submit(&state, "12345").await;
        assert!(matches!(outcome, GateOutcome::Rejected { .. }));
        assert_eq!(backend.validate_calls(), 0);
        assert_eq!(state.read(StateKey::MobileNumber), None);
    }

    #[tokio::test]
    async fn test_recognized_subscriber_writes_identity() {
        let backend = Arc::new(MockBackend::new());
        let gate = IdentityGate::new(backend.clone());
        let state = CheckoutState::new();

        let outcome = gate.submit(&state, "9876543210").await;
        assert_eq!(outcome, GateOutcome::Accepted);

        let identity = state.identity().unwrap();
        assert_eq!(identity.mobile.as_str(), "9876543210");
        assert!(!identity.token.as_str().is_empty());
    }

    #[tokio::test]
    async fn test_token_absent_means_rejection() {
        let backend = Arc::new(MockBackend::new());
        let gate = IdentityGate::new(backend.clone());
        let state = CheckoutState::new();

        // well-formed but not a subscriber
        let outcome = gate.submit(&state, "7000000000").await;
        assert!(matches!(outcome, GateOutcome::Rejected { .. }));
        assert_eq!(backend.validate_calls(), 1);
        assert!(state.identity().is_err());
    }

    #[tokio::test]
    async fn test_outage_keeps_the_user_on_the_gate() {
        let backend = Arc::new(MockBackend::new().with_validation_outage());
        let gate = IdentityGate::new(backend.clone());
        let state = CheckoutState::new();

        let outcome = gate.submit(&state, "9876543210").await;
        assert!(matches!(outcome, GateOutcome::Unavailable { .. }));
        assert!(state.identity().is_err());
    }
}
