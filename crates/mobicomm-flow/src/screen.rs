//! Screen State Machine
//!
//! The purchase flow is a sequence of screens with implicit
//! preconditions; this module makes the transitions and the
//! missing-prerequisite redirects explicit.

use mobicomm_core::{RechargeError, StateKey};

/// The screens of the purchase flow
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    IdentityGate,
    Catalog,
    Payment,
    Receipt,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::IdentityGate => "Verify Number",
            Screen::Catalog => "Choose a Plan",
            Screen::Payment => "Payment",
            Screen::Receipt => "Recharge Successful",
        }
    }

    /// The screen that writes a given checkout key; a missing key
    /// redirects here
    pub fn producer_of(key: StateKey) -> Screen {
        match key {
            StateKey::MobileNumber | StateKey::SessionToken => Screen::IdentityGate,
            StateKey::PlanId
            | StateKey::PlanName
            | StateKey::Price
            | StateKey::DataAllowance
            | StateKey::Validity
            | StateKey::Calls
            | StateKey::Sms
            | StateKey::Benefits => Screen::Catalog,
            StateKey::TransactionId | StateKey::TransactionDate | StateKey::PaymentMethod => {
                Screen::Payment
            }
            StateKey::ContactEmail
            | StateKey::LastTransactionId
            | StateKey::LastRechargeAt => Screen::Receipt,
        }
    }

    /// Where an error should send the user, if anywhere
    pub fn redirect_for(err: &RechargeError) -> Option<Screen> {
        match err {
            RechargeError::MissingState { key } => Some(Self::producer_of(*key)),
            RechargeError::Auth(_) => Some(Screen::IdentityGate),
            _ => None,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Progress indicator above the payment and receipt screens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressStep {
    Plan,
    Pay,
    Done,
}

/// Result of a screen action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Remain on the current screen (e.g. inline validation error)
    Stay,

    /// Move forward in the flow
    Forward(Screen),

    /// Sent back to the screen that produces a missing prerequisite
    Redirect(Screen),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_redirect_to_their_producer() {
        assert_eq!(Screen::producer_of(StateKey::MobileNumber), Screen::IdentityGate);
        assert_eq!(Screen::producer_of(StateKey::PlanId), Screen::Catalog);
        assert_eq!(Screen::producer_of(StateKey::TransactionId), Screen::Payment);
    }

    #[test]
    fn test_auth_errors_redirect_to_the_gate() {
        let err = RechargeError::Auth("token expired".into());
        assert_eq!(Screen::redirect_for(&err), Some(Screen::IdentityGate));

        let err = RechargeError::Network("refused".into());
        assert_eq!(Screen::redirect_for(&err), None);
    }
}
