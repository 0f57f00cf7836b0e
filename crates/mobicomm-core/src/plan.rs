//! Plan Catalog Models
//!
//! Categories and plans as the backend serves them, plus the immutable
//! selection snapshot the checkout channel carries across screens.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{RechargeError, Result};

/// A plan category; one catalog tab per category
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}

impl Category {
    /// Top-up categories render talktime only, no data/validity line
    pub fn is_top_up(&self) -> bool {
        self.category_name.to_lowercase().contains("top-up")
    }

    /// OTT categories surface a benefits line on their cards
    pub fn is_ott(&self) -> bool {
        self.category_name.to_lowercase().contains("ott")
    }
}

/// A catalog offer as served by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub plan_id: i64,

    pub price: Decimal,

    #[serde(default)]
    pub data: Option<String>,

    #[serde(default)]
    pub validity: Option<String>,

    #[serde(default)]
    pub calls: Option<String>,

    #[serde(default)]
    pub benefits: Option<String>,
}

impl Plan {
    /// The text a rendered card carries; the free-text filter matches
    /// against this, the same way the original matched card inner text.
    pub fn rendered_text(&self, category: &Category) -> String {
        let mut text = format!("₹{} {}", self.price, category.category_name);
        if category.is_top_up() {
            text.push_str(&format!(" Talktime: {}", self.calls.as_deref().unwrap_or("N/A")));
        } else {
            text.push_str(&format!(
                " Data: {} Validity: {} Calls: {} SMS: 100/day",
                self.data.as_deref().unwrap_or("N/A"),
                self.validity.as_deref().unwrap_or("N/A"),
                self.calls.as_deref().unwrap_or("Unlimited"),
            ));
            if category.is_ott() {
                if let Some(benefits) = &self.benefits {
                    text.push_str(&format!(" Benefits: {benefits}"));
                }
            }
        }
        text
    }
}

/// Immutable snapshot of a chosen offer, captured at selection time.
///
/// Payment execution reads this but never mutates it mid-transaction. The
/// price is carried as the display string the card showed and is parsed
/// back to a decimal only when the payment is assembled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSelection {
    pub plan_id: i64,
    pub price: String,
    pub plan_name: String,
    pub data: String,
    pub validity: String,
    pub calls: String,
    pub sms: String,
    pub benefits: String,
}

impl PlanSelection {
    /// Snapshot a plan with the placeholders its category's cards used
    pub fn from_plan(plan: &Plan, category: &Category) -> Self {
        if category.is_top_up() {
            Self {
                plan_id: plan.plan_id,
                price: plan.price.to_string(),
                plan_name: "Talktime Top-up".into(),
                data: String::new(),
                validity: String::new(),
                calls: plan.calls.clone().unwrap_or_else(|| "N/A".into()),
                sms: String::new(),
                benefits: String::new(),
            }
        } else {
            Self {
                plan_id: plan.plan_id,
                price: plan.price.to_string(),
                plan_name: plan
                    .data
                    .as_ref()
                    .map_or_else(|| "Data Plan".into(), |d| format!("{d} Plan")),
                data: plan.data.clone().unwrap_or_default(),
                validity: plan.validity.clone().unwrap_or_default(),
                calls: plan.calls.clone().unwrap_or_default(),
                sms: "100/day".into(),
                benefits: plan.benefits.clone().unwrap_or_else(|| "N/A".into()),
            }
        }
    }

    /// Parse the stored price back to a decimal amount.
    ///
    /// Fails closed: a price that does not parse, or a negative one, is a
    /// validation error rather than a silently-submitted zero.
    pub fn amount(&self) -> Result<Decimal> {
        let amount = self
            .price
            .trim()
            .parse::<Decimal>()
            .map_err(|_| RechargeError::Validation(format!("Invalid plan price: {}", self.price)))?;
        if amount.is_sign_negative() {
            return Err(RechargeError::Validation(format!(
                "Negative plan price: {amount}"
            )));
        }
        Ok(amount)
    }

    /// Price formatted the way the cards showed it
    pub fn price_label(&self) -> String {
        format!("₹{}", self.price)
    }
}
