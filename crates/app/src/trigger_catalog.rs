//! Trigger catalog: the live set of triggers for the active page.

use autopopup_domain::dashboard::{CardSettings, Dashboard};
use autopopup_domain::id::{CardId, PageId};
use autopopup_domain::trigger::Trigger;

use crate::ports::{CardSettingsResolver, ConditionEvaluator};

/// Dashboard layout plus card settings, as last configured.
///
/// Only cards on the active page produce triggers. Inactive pages are not
/// evaluated at all.
pub struct TriggerCatalog {
    dashboard: Dashboard,
    active_page: Option<PageId>,
    resolver: Box<dyn CardSettingsResolver + Send + Sync>,
}

impl Default for TriggerCatalog {
    fn default() -> Self {
        Self {
            dashboard: Dashboard::default(),
            active_page: None,
            resolver: Box::new(NoSettings),
        }
    }
}

impl TriggerCatalog {
    /// Create a catalog for a dashboard.
    pub fn new(
        dashboard: Dashboard,
        active_page: Option<PageId>,
        resolver: impl CardSettingsResolver + Send + Sync + 'static,
    ) -> Self {
        Self {
            dashboard,
            active_page,
            resolver: Box::new(resolver),
        }
    }

    #[must_use]
    pub fn active_page(&self) -> Option<&PageId> {
        self.active_page.as_ref()
    }

    pub fn set_active_page(&mut self, page: Option<PageId>) {
        self.active_page = page;
    }

    /// Build the triggers of the active page, in card order.
    ///
    /// Cards without settings, with auto-popup disabled, or whose
    /// condition holds no actionable rule are left out.
    pub fn live_triggers<E: ConditionEvaluator + ?Sized>(&self, evaluator: &E) -> Vec<Trigger> {
        let Some(page_id) = &self.active_page else {
            return Vec::new();
        };
        let Some(page) = self.dashboard.page(page_id) else {
            tracing::debug!(page_id = %page_id, "active page is not part of the dashboard");
            return Vec::new();
        };

        page.cards
            .iter()
            .filter_map(|card_id| {
                let settings = self.resolver.card_settings(page_id, card_id)?;
                Some(Trigger::from_card(page_id, card_id, settings))
            })
            .filter(|trigger| {
                trigger.enabled
                    && !trigger.condition.is_blank()
                    && evaluator.is_configured(&trigger.condition)
            })
            .collect()
    }
}

struct NoSettings;

impl CardSettingsResolver for NoSettings {
    fn card_settings(&self, _page: &PageId, _card: &CardId) -> Option<CardSettings> {
        None
    }
}
