//! Session Identity
//!
//! The validated subscriber identity that gatekeeps entry into the
//! purchase flow.

use serde::{Deserialize, Serialize};

use crate::error::{RechargeError, Result};

/// A validated subscriber mobile number.
///
/// Ten digits, first digit 6-9. Parsing is the only way to construct one,
/// so a `MobileNumber` in hand is always well-formed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Parse and validate a raw input string
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if Self::is_valid_format(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(RechargeError::Validation(
                "Please enter a valid mobile number".into(),
            ))
        }
    }

    /// Format pre-filter applied before any network call
    pub fn is_valid_format(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 10
            && (b'6'..=b'9').contains(&bytes[0])
            && bytes.iter().all(u8::is_ascii_digit)
    }

    /// Get the number as a plain digit string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format for display: `+91 98765 43210`
    pub fn display(&self) -> String {
        format!("+91 {} {}", &self.0[..5], &self.0[5..])
    }
}

impl std::fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque token issued by the backend on successful mobile validation.
///
/// Required for the privileged recharge-submission call. Lives as long as
/// the checkout scope; cleared only by an explicit full reset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity carried unchanged through the rest of the flow
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Validated subscriber number
    pub mobile: MobileNumber,

    /// Token from the validate-mobile call
    pub token: SessionToken,

    /// Contact email for invoices, if the user supplied one
    pub contact_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_numbers() {
        assert!(MobileNumber::parse("9876543210").is_ok());
        assert!(MobileNumber::parse("6000000000").is_ok());
        assert!(MobileNumber::parse(" 7123456789 ").is_ok());
    }

    #[test]
    fn test_invalid_numbers() {
        // wrong leading digit
        assert!(MobileNumber::parse("1234567890").is_err());
        assert!(MobileNumber::parse("5876543210").is_err());
        // wrong length
        assert!(MobileNumber::parse("98765432").is_err());
        assert!(MobileNumber::parse("98765432100").is_err());
        // non-digits
        assert!(MobileNumber::parse("98765abc10").is_err());
        assert!(MobileNumber::parse("").is_err());
    }

    #[test]
    fn test_display_format() {
        let mobile = MobileNumber::parse("9876543210").unwrap();
        assert_eq!(mobile.display(), "+91 98765 43210");
        assert_eq!(mobile.as_str(), "9876543210");
    }
}
