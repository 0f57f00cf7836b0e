//! Plan Catalog Screen
//!
//! Loads categories and their plans, renders one pane per category, and
//! captures a selection. Per-category loads run concurrently and fail
//! independently: a broken category shows an inline error in its own
//! pane while the others render normally.

use std::sync::Arc;

use futures::future;

use mobicomm_core::{
    Category, CheckoutState, MobileNumber, Plan, PlanSelection, RechargeBackend, Result, StateKey,
};

use crate::screen::{Screen, Transition};

/// Load state of one category pane. The loading marker is replaced
/// atomically by either the plan list or an error, never both.
#[derive(Clone, Debug, PartialEq)]
pub enum PaneState {
    Loading,
    Loaded(Vec<Plan>),
    Failed(String),
}

/// One category tab and its pane
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryPane {
    pub category: Category,
    pub state: PaneState,
}

impl CategoryPane {
    pub fn plans(&self) -> &[Plan] {
        match &self.state {
            PaneState::Loaded(plans) => plans,
            _ => &[],
        }
    }
}

/// The loaded catalog. Refreshes are epoch-guarded: a result tagged with
/// a stale epoch is discarded instead of overwriting newer panes, the
/// analogue of not writing into a DOM the user has navigated away from.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    panes: Vec<CategoryPane>,
    epoch: u64,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn panes(&self) -> &[CategoryPane] {
        &self.panes
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Start a refresh; returns the epoch the eventual result must carry
    pub fn begin_refresh(&mut self) -> u64 {
        self.epoch += 1;
        for pane in &mut self.panes {
            pane.state = PaneState::Loading;
        }
        self.epoch
    }

    /// Apply a finished load; stale epochs are discarded
    pub fn apply(&mut self, epoch: u64, panes: Vec<CategoryPane>) -> bool {
        if epoch != self.epoch {
            tracing::debug!(stale = epoch, current = self.epoch, "discarding stale catalog load");
            return false;
        }
        self.panes = panes;
        true
    }

    /// Look a plan up by id across loaded panes
    pub fn find_plan(&self, plan_id: i64) -> Option<(&Category, &Plan)> {
        self.panes.iter().find_map(|pane| {
            pane.plans()
                .iter()
                .find(|plan| plan.plan_id == plan_id)
                .map(|plan| (&pane.category, plan))
        })
    }
}

/// The plan catalog screen
pub struct CatalogScreen {
    backend: Arc<dyn RechargeBackend>,
}

impl CatalogScreen {
    pub fn new(backend: Arc<dyn RechargeBackend>) -> Self {
        Self { backend }
    }

    /// Fetch categories, then every category's plans concurrently.
    ///
    /// Read-only and idempotent; safe to call again on a manual refresh.
    /// A category whose plans fail to load resolves to a `Failed` pane
    /// and does not block the others.
    pub async fn load(&self) -> Result<Vec<CategoryPane>> {
        let categories = self.backend.categories().await?;
        tracing::info!(count = categories.len(), "loaded plan categories");

        let fetches = categories.into_iter().map(|category| {
            let backend = Arc::clone(&self.backend);
            async move {
                let state = match backend.plans(category.category_id).await {
                    Ok(plans) => PaneState::Loaded(plans),
                    Err(err) => {
                        tracing::warn!(
                            category = category.category_id,
                            error = %err,
                            "plans failed to load"
                        );
                        PaneState::Failed(format!("Failed to load plans: {}", err.user_message()))
                    }
                };
                CategoryPane { category, state }
            }
        });

        Ok(future::join_all(fetches).await)
    }

    /// Select a plan for purchase.
    ///
    /// The current mobile field is format-checked synchronously first; on
    /// failure the navigation is cancelled and the checkout state is left
    /// unmodified. On success, writes the number and the immutable plan
    /// snapshot, then moves the flow to the payment screen.
    pub fn select_plan(
        &self,
        state: &CheckoutState,
        raw_mobile: &str,
        category: &Category,
        plan: &Plan,
    ) -> Result<Transition> {
        let mobile = MobileNumber::parse(raw_mobile)?;

        state.write_str(StateKey::MobileNumber, mobile.as_str());
        state.write_selection(&PlanSelection::from_plan(plan, category));
        tracing::info!(plan_id = plan.plan_id, "plan selected");

        Ok(Transition::Forward(Screen::Payment))
    }

    /// Explicit change-number action; re-validates the format, then
    /// stores the new number
    pub fn update_number(&self, state: &CheckoutState, raw: &str) -> Result<()> {
        let mobile = MobileNumber::parse(raw)?;
        state.write_str(StateKey::MobileNumber, mobile.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobicomm_core::{MockBackend, RechargeError};

    #[tokio::test]
    async fn test_load_renders_every_category() {
        let backend = Arc::new(MockBackend::new());
        let screen = CatalogScreen::new(backend.clone());

        let panes = screen.load().await.unwrap();
        assert_eq!(panes.len(), 3);
        assert!(panes.iter().all(|p| matches!(p.state, PaneState::Loaded(_))));
        // one plans fetch per category
        assert_eq!(backend.plan_calls(), 3);
    }

    #[tokio::test]
    async fn test_one_failing_category_does_not_blank_the_rest() {
        let backend = Arc::new(MockBackend::new().with_failing_category(2));
        let screen = CatalogScreen::new(backend);

        let panes = screen.load().await.unwrap();
        let pane = |id: i64| panes.iter().find(|p| p.category.category_id == id).unwrap();

        assert!(matches!(pane(1).state, PaneState::Loaded(_)));
        assert!(!pane(1).plans().is_empty());
        assert!(matches!(pane(2).state, PaneState::Failed(_)));
        assert!(matches!(pane(3).state, PaneState::Loaded(_)));
    }

    #[tokio::test]
    async fn test_selection_writes_snapshot_and_moves_forward() {
        let backend = Arc::new(MockBackend::new());
        let screen = CatalogScreen::new(backend);
        let state = CheckoutState::new();

        let mut catalog = Catalog::empty();
        let epoch = catalog.begin_refresh();
        assert!(catalog.apply(epoch, screen.load().await.unwrap()));

        let (category, plan) = catalog.find_plan(3).map(|(c, p)| (c.clone(), p.clone())).unwrap();
        let transition = screen.select_plan(&state, "9876543210", &category, &plan).unwrap();

        assert_eq!(transition, Transition::Forward(Screen::Payment));
        let selection = state.selection().unwrap();
        assert_eq!(selection.plan_id, 3);
        assert_eq!(selection.price, "299");
    }

    #[test]
    fn test_bad_number_cancels_selection_and_leaves_state_alone() {
        let backend = Arc::new(MockBackend::new());
        let screen = CatalogScreen::new(backend);
        let state = CheckoutState::new();

        let category = Category { category_id: 1, category_name: "Data Packs".into() };
        let plan = Plan {
            plan_id: 3,
            price: rust_decimal_macros::dec!(299),
            data: None,
            validity: None,
            calls: None,
            benefits: None,
        };

        let err = screen.select_plan(&state, "1234567890", &category, &plan).unwrap_err();
        assert!(matches!(err, RechargeError::Validation(_)));
        assert_eq!(state.read(StateKey::PlanId), None);
        assert_eq!(state.read(StateKey::MobileNumber), None);
    }

    #[test]
    fn test_stale_refresh_is_discarded() {
        let mut catalog = Catalog::empty();
        let first = catalog.begin_refresh();
        let second = catalog.begin_refresh();

        let pane = CategoryPane {
            category: Category { category_id: 1, category_name: "Data Packs".into() },
            state: PaneState::Loaded(Vec::new()),
        };

        // the slow first load arrives after a newer refresh started
        assert!(!catalog.apply(first, vec![pane.clone()]));
        assert!(catalog.panes().is_empty());

        assert!(catalog.apply(second, vec![pane]));
        assert_eq!(catalog.panes().len(), 1);
    }

    #[test]
    fn test_update_number_revalidates_format() {
        let backend = Arc::new(MockBackend::new());
        let screen = CatalogScreen::new(backend);
        let state = CheckoutState::new();

        assert!(screen.update_number(&state, "98765").is_err());
        assert_eq!(state.read(StateKey::MobileNumber), None);

        screen.update_number(&state, "9123456789").unwrap();
        assert_eq!(state.read_string(StateKey::MobileNumber).as_deref(), Some("9123456789"));
    }
}
