//! Dashboard: pages, the cards placed on them, and per-card settings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::condition::ConditionDescriptor;
use crate::error::{AutoPopupError, ValidationError};
use crate::id::{CardId, PageId};

/// The full page layout of a dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Dashboard {
    /// Create a dashboard from its pages.
    #[must_use]
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Look up a page by id.
    #[must_use]
    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|page| &page.id == id)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AutoPopupError::Validation`] when:
    /// - a page fails [`Page::validate`]
    /// - two pages share an id ([`ValidationError::DuplicatePage`])
    /// - `active_page` is given but not declared
    ///   ([`ValidationError::UnknownActivePage`])
    pub fn validate(&self, active_page: Option<&PageId>) -> Result<(), AutoPopupError> {
        let mut seen = HashSet::new();
        for page in &self.pages {
            page.validate()?;
            if !seen.insert(&page.id) {
                return Err(ValidationError::DuplicatePage(page.id.to_string()).into());
            }
        }
        if let Some(active) = active_page
            && self.page(active).is_none()
        {
            return Err(ValidationError::UnknownActivePage(active.to_string()).into());
        }
        Ok(())
    }
}

/// A dashboard page and its cards, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    #[serde(default)]
    pub cards: Vec<CardId>,
}

impl Page {
    /// Create a builder for constructing a [`Page`].
    #[must_use]
    pub fn builder() -> PageBuilder {
        PageBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AutoPopupError::Validation`] when the page id or a card id
    /// is empty, or a card is placed twice.
    pub fn validate(&self) -> Result<(), AutoPopupError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        let mut seen = HashSet::new();
        for card in &self.cards {
            if card.is_empty() {
                return Err(ValidationError::EmptyId.into());
            }
            if !seen.insert(card) {
                return Err(ValidationError::DuplicateCard {
                    page: self.id.to_string(),
                    card: card.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Page`].
#[derive(Debug, Default)]
pub struct PageBuilder {
    id: Option<PageId>,
    cards: Vec<CardId>,
}

impl PageBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<PageId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn card(mut self, card: impl Into<CardId>) -> Self {
        self.cards.push(card.into());
        self
    }

    /// Consume the builder, validate, and return a [`Page`].
    ///
    /// # Errors
    ///
    /// Returns [`AutoPopupError::Validation`] if the id is missing or a card
    /// is invalid.
    pub fn build(self) -> Result<Page, AutoPopupError> {
        let page = Page {
            id: self.id.unwrap_or_else(|| PageId::new("")),
            cards: self.cards,
        };
        page.validate()?;
        Ok(page)
    }
}

/// Per-card configuration relevant to popups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSettings {
    /// Entity the card controls, when it is not implied by the card id.
    pub entity_id: Option<String>,
    /// Climate entity linked to a `climate-` card.
    pub climate_entity: Option<String>,
    pub auto_popup: AutoPopupSettings,
}

/// Raw auto-popup configuration, exactly as the user entered it.
///
/// Cooldown and auto-close values are normalized when a
/// [`Trigger`](crate::trigger::Trigger) is derived from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoPopupSettings {
    pub enabled: bool,
    pub condition: ConditionDescriptor,
    pub cooldown_seconds: Option<f64>,
    pub auto_close_seconds: Option<f64>,
}
