//! Payment Error Types

use thiserror::Error;

use mobicomm_core::{RechargeError, StateKey};

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Required checkout state absent; submission is blocked before any
    /// network call is made
    #[error("Missing checkout state: {key}")]
    MissingState { key: StateKey },

    /// Malformed input (corrupted state, unparsable amount, bad email)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session token missing or rejected by the backend
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The recharge submission itself failed; state is left untouched so
    /// the user can retry
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),
}

impl PaymentError {
    /// Check if pressing submit again could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::SubmissionFailed(_))
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            PaymentError::MissingState { key } => {
                format!("Your session is missing {key}. Please go back and try again.")
            }
            PaymentError::Validation(msg) => msg.clone(),
            PaymentError::Auth(_) => "Your session has expired. Please verify your number again.".into(),
            PaymentError::SubmissionFailed(_) => {
                "An error occurred while processing your payment. Please try again.".into()
            }
        }
    }
}

impl From<RechargeError> for PaymentError {
    fn from(err: RechargeError) -> Self {
        match err {
            RechargeError::MissingState { key } => PaymentError::MissingState { key },
            RechargeError::Validation(msg) => PaymentError::Validation(msg),
            RechargeError::Auth(msg) => PaymentError::Auth(msg),
            other => PaymentError::SubmissionFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_errors_map_through() {
        let err = PaymentError::from(RechargeError::MissingState { key: StateKey::PlanId });
        assert!(matches!(err, PaymentError::MissingState { key: StateKey::PlanId }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_backend_errors_are_retryable_submissions() {
        let err = PaymentError::from(RechargeError::Backend {
            status: 502,
            message: "bad gateway".into(),
        });
        assert!(matches!(err, PaymentError::SubmissionFailed(_)));
        assert!(err.is_retryable());
    }
}
