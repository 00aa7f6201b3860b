//! Popup targets: what a card opens when its trigger wins a pass.

use serde::{Deserialize, Serialize};

use crate::id::CardId;

/// A resolved popup, ready for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PopupTarget {
    /// Room overview for a `room-` card.
    Room { card_id: CardId },
    /// Cover controls (blinds, garage doors, …).
    Cover { entity_id: String },
    /// Thermostat controls for the climate entity linked to the card.
    Climate { entity_id: String },
    /// Controls for the effective entity of a toggle card.
    Toggle { entity_id: String },
    /// Generic detail popup, used when the card id is a bare entity id.
    EntityDetail { entity_id: String },
}

impl std::fmt::Display for PopupTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Room { card_id } => write!(f, "room({card_id})"),
            Self::Cover { entity_id } => write!(f, "cover({entity_id})"),
            Self::Climate { entity_id } => write!(f, "climate({entity_id})"),
            Self::Toggle { entity_id } => write!(f, "toggle({entity_id})"),
            Self::EntityDetail { entity_id } => write!(f, "detail({entity_id})"),
        }
    }
}
