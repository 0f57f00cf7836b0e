//! Plan Filtering
//!
//! Client-side filter over the already-loaded plan set. Pure and
//! synchronous; re-runs on every keystroke with no network calls.

use mobicomm_core::{Category, Plan};

use crate::catalog::CategoryPane;

/// Free-text search plus optional structured filters
#[derive(Clone, Debug, Default)]
pub struct PlanFilter {
    /// Free text matched against the card's rendered text; an exact
    /// price also matches
    pub query: String,

    /// Substring filter on the data allowance
    pub data: Option<String>,

    /// Substring filter on the validity
    pub validity: Option<String>,
}

impl PlanFilter {
    /// Whether the filter collapses the tabs into one global result list
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Does a single plan match?
    pub fn matches(&self, category: &Category, plan: &Plan) -> bool {
        let query = self.query.trim().to_lowercase();
        let text = plan.rendered_text(category).to_lowercase();

        let matches_query =
            query.is_empty() || text.contains(&query) || plan.price.to_string() == query;

        let matches_data = self.data.as_ref().is_none_or(|wanted| {
            plan.data
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&wanted.to_lowercase())
        });

        let matches_validity = self.validity.as_ref().is_none_or(|wanted| {
            plan.validity
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&wanted.to_lowercase())
        });

        matches_query && matches_data && matches_validity
    }

    /// Apply over the loaded panes; failed and loading panes contribute
    /// nothing
    pub fn apply<'a>(&self, panes: &'a [CategoryPane]) -> Vec<(&'a Category, &'a Plan)> {
        panes
            .iter()
            .flat_map(|pane| {
                pane.plans()
                    .iter()
                    .filter(|plan| self.matches(&pane.category, plan))
                    .map(move |plan| (&pane.category, plan))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PaneState;
    use rust_decimal_macros::dec;

    fn sample_panes() -> Vec<CategoryPane> {
        vec![
            CategoryPane {
                category: Category { category_id: 1, category_name: "Data Packs".into() },
                state: PaneState::Loaded(vec![
                    Plan {
                        plan_id: 1,
                        price: dec!(199),
                        data: Some("1GB/day".into()),
                        validity: Some("24 days".into()),
                        calls: Some("Unlimited".into()),
                        benefits: None,
                    },
                    Plan {
                        plan_id: 3,
                        price: dec!(299),
                        data: Some("2GB/day".into()),
                        validity: Some("28 days".into()),
                        calls: Some("Unlimited".into()),
                        benefits: None,
                    },
                ]),
            },
            CategoryPane {
                category: Category { category_id: 2, category_name: "Top-up Vouchers".into() },
                state: PaneState::Failed("Failed to load plans".into()),
            },
        ]
    }

    #[test]
    fn test_free_text_matches_rendered_fields() {
        let filter = PlanFilter { query: "2gb".into(), ..Default::default() };
        let panes = sample_panes();
        let matched = filter.apply(&panes);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].1.plan_id, 3);
    }

    #[test]
    fn test_exact_price_matches() {
        let filter = PlanFilter { query: "199".into(), ..Default::default() };
        let panes = sample_panes();
        let matched = filter.apply(&panes);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].1.plan_id, 1);
    }

    #[test]
    fn test_structured_filters_compose() {
        let filter = PlanFilter {
            query: "day".into(),
            data: Some("2GB".into()),
            validity: Some("28".into()),
        };
        let panes = sample_panes();
        let matched = filter.apply(&panes);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].1.plan_id, 3);

        let none = PlanFilter {
            query: "day".into(),
            data: Some("2GB".into()),
            validity: Some("56".into()),
        };
        let panes = sample_panes();
        assert!(none.apply(&panes).is_empty());
    }

    #[test]
    fn test_empty_query_is_inactive() {
        let filter = PlanFilter::default();
        assert!(!filter.is_active());
        // with no query, everything loaded matches
        assert_eq!(filter.apply(&sample_panes()).len(), 2);
    }

    #[test]
    fn test_failed_panes_contribute_nothing() {
        let filter = PlanFilter { query: "top-up".into(), ..Default::default() };
        assert!(filter.apply(&sample_panes()).is_empty());
    }
}
