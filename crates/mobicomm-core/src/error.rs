//! Error Types

use thiserror::Error;

use crate::checkout::StateKey;

/// Result type alias for recharge-flow operations
pub type Result<T> = std::result::Result<T, RechargeError>;

/// Recharge flow error types
#[derive(Error, Debug)]
pub enum RechargeError {
    /// Malformed user input (mobile number, email, amount)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Subscriber not recognized, or privileged-call token rejected
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Required checkout state absent when a downstream screen needs it
    #[error("Missing checkout state: {key}")]
    MissingState { key: StateKey },

    /// Backend responded with a non-success status
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// Transport-level failure (connection refused, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl RechargeError {
    /// Check if a user-initiated retry could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RechargeError::Network(_) | RechargeError::Backend { status: 500..=599, .. }
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            RechargeError::Validation(msg) => msg.clone(),
            RechargeError::Auth(_) => "Enter a valid MobiComm number.".into(),
            RechargeError::MissingState { key } => {
                format!("Your session is missing {key}. Please start again.")
            }
            RechargeError::Network(_) => "Server busy. Please try again.".into(),
            RechargeError::Backend { status, .. } => {
                format!("The service returned an error ({status}). Please try again.")
            }
            RechargeError::Config(_) => "Service configuration error.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for RechargeError {
    fn from(err: anyhow::Error) -> Self {
        RechargeError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(RechargeError::Network("refused".into()).is_retryable());
        assert!(
            RechargeError::Backend { status: 502, message: "bad gateway".into() }.is_retryable()
        );
        assert!(!RechargeError::Validation("bad number".into()).is_retryable());
        assert!(
            !RechargeError::Backend { status: 404, message: "not found".into() }.is_retryable()
        );
    }

    #[test]
    fn test_missing_state_names_the_key() {
        let err = RechargeError::MissingState { key: StateKey::PlanId };
        assert!(err.to_string().contains("planId"));
    }
}
