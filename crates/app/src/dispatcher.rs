//! Popup dispatcher: routes a winning card to the popup it should open.
//!
//! Routes are tried in order and the first whose predicate accepts the card
//! id decides: either it resolves a [`PopupTarget`] or the open fails. A card
//! id that is itself an entity id (`light.kitchen`) falls back to the
//! generic detail popup.

use std::sync::Arc;

use autopopup_domain::dashboard::CardSettings;
use autopopup_domain::id::CardId;
use autopopup_domain::popup::PopupTarget;

use crate::ports::PopupPresenter;

/// One entry of the routing table.
pub struct Route {
    pub name: &'static str,
    pub matches: fn(&CardId) -> bool,
    pub resolve: fn(&CardId, &CardSettings) -> Option<PopupTarget>,
}

/// Opens popups for winning triggers through a [`PopupPresenter`].
pub struct PopupDispatcher<P> {
    presenter: Arc<P>,
    routes: Vec<Route>,
}

impl<P: PopupPresenter> PopupDispatcher<P> {
    /// Create a dispatcher with the standard card routes.
    pub fn new(presenter: Arc<P>) -> Self {
        Self::with_routes(presenter, default_routes())
    }

    /// Create a dispatcher with a custom routing table.
    pub fn with_routes(presenter: Arc<P>, routes: Vec<Route>) -> Self {
        Self { presenter, routes }
    }

    /// Close whatever popup is open, then open the one for `card_id`.
    ///
    /// Returns `true` only if a popup was actually shown.
    pub fn dispatch(&self, card_id: &CardId, settings: &CardSettings) -> bool {
        self.presenter.close_all();

        let Some(route) = self.routes.iter().find(|route| (route.matches)(card_id)) else {
            tracing::warn!(card_id = %card_id, "no popup route for card");
            return false;
        };
        let Some(target) = (route.resolve)(card_id, settings) else {
            tracing::warn!(
                card_id = %card_id,
                route = route.name,
                "card does not resolve to a popup target"
            );
            return false;
        };

        tracing::debug!(card_id = %card_id, route = route.name, target = %target, "opening popup");
        self.presenter.open(&target)
    }
}

/// Standard routes, in priority order.
#[must_use]
pub fn default_routes() -> Vec<Route> {
    vec![
        Route {
            name: "room",
            matches: |card| card.as_str().starts_with("room-"),
            resolve: |card, _| {
                Some(PopupTarget::Room {
                    card_id: card.clone(),
                })
            },
        },
        Route {
            name: "cover",
            matches: |card| card.as_str().starts_with("cover-"),
            resolve: |_, settings| {
                let entity_id = settings.entity_id.clone()?;
                Some(PopupTarget::Cover { entity_id })
            },
        },
        Route {
            name: "climate",
            matches: |card| card.as_str().starts_with("climate-"),
            resolve: |_, settings| {
                let entity_id = settings.climate_entity.clone()?;
                Some(PopupTarget::Climate { entity_id })
            },
        },
        Route {
            name: "toggle",
            matches: |card| card.as_str().starts_with("toggle-"),
            resolve: |_, settings| {
                let entity_id = settings.entity_id.clone()?;
                Some(PopupTarget::Toggle { entity_id })
            },
        },
        Route {
            name: "entity",
            matches: CardId::is_entity_id,
            resolve: |card, _| {
                Some(PopupTarget::EntityDetail {
                    entity_id: card.to_string(),
                })
            },
        },
    ]
}
