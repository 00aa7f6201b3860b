//! Card settings port: per-card configuration lookup.

use std::collections::HashMap;
use std::sync::Arc;

use autopopup_domain::dashboard::CardSettings;
use autopopup_domain::id::{CardId, PageId};

/// Resolves the settings of a card placed on a page.
///
/// Returning `None` means the card has no popup configuration; its
/// trigger is inert.
pub trait CardSettingsResolver {
    fn card_settings(&self, page: &PageId, card: &CardId) -> Option<CardSettings>;
}

/// Settings keyed by card only; the same card shares them on every page.
impl CardSettingsResolver for HashMap<CardId, CardSettings> {
    fn card_settings(&self, _page: &PageId, card: &CardId) -> Option<CardSettings> {
        self.get(card).cloned()
    }
}

/// Settings keyed by `(page, card)`.
impl CardSettingsResolver for HashMap<(PageId, CardId), CardSettings> {
    fn card_settings(&self, page: &PageId, card: &CardId) -> Option<CardSettings> {
        self.get(&(page.clone(), card.clone())).cloned()
    }
}

impl<T: CardSettingsResolver + ?Sized> CardSettingsResolver for Arc<T> {
    fn card_settings(&self, page: &PageId, card: &CardId) -> Option<CardSettings> {
        (**self).card_settings(page, card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_share_card_keyed_settings_across_pages() {
        let mut map = HashMap::new();
        map.insert(CardId::new("room-kitchen"), CardSettings::default());
        let card = CardId::new("room-kitchen");
        assert!(map.card_settings(&PageId::new("home"), &card).is_some());
        assert!(map.card_settings(&PageId::new("upstairs"), &card).is_some());
    }

    #[test]
    fn should_scope_page_keyed_settings_to_their_page() {
        let mut map = HashMap::new();
        map.insert(
            (PageId::new("home"), CardId::new("room-kitchen")),
            CardSettings::default(),
        );
        let card = CardId::new("room-kitchen");
        assert!(map.card_settings(&PageId::new("home"), &card).is_some());
        assert!(map.card_settings(&PageId::new("upstairs"), &card).is_none());
    }
}
