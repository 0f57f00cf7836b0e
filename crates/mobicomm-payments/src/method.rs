//! Payment Methods
//!
//! The method tabs of the payment screen: card, UPI (with an app
//! sub-selection) and net banking (with a bank sub-selection).

use serde::{Deserialize, Serialize};

/// A chosen payment method
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi { app: Option<String> },
    NetBanking { bank: Option<String> },
}

impl PaymentMethod {
    /// Human-readable label, e.g. `UPI (GPay)` or `Net Banking (HDFC Bank)`
    pub fn label(&self) -> String {
        match self {
            PaymentMethod::Card => "Credit Card".into(),
            PaymentMethod::Upi { app: None } => "UPI".into(),
            PaymentMethod::Upi { app: Some(app) } => format!("UPI ({app})"),
            PaymentMethod::NetBanking { bank: None } => "Net Banking".into(),
            PaymentMethod::NetBanking { bank: Some(bank) } => format!("Net Banking ({bank})"),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
