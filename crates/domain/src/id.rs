//! Typed identifier newtypes backed by configuration strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Access the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is the empty string.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() {
                    return Err(ValidationError::EmptyId);
                }
                Ok(Self(s.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

define_id!(
    /// Identifier of a dashboard [`Page`](crate::dashboard::Page).
    PageId
);

define_id!(
    /// Identifier of a card. Its prefix (`room-`, `cover-`, …) or a bare
    /// entity id (`light.kitchen`) determines which popup it opens.
    CardId
);

define_id!(
    /// Key of a [`Trigger`](crate::trigger::Trigger), derived from
    /// `(page, card)`.
    TriggerId
);

impl TriggerId {
    /// Build the key for a card on a given page.
    #[must_use]
    pub fn for_card(page: &PageId, card: &CardId) -> Self {
        Self(format!("{page}|{card}"))
    }
}

impl CardId {
    /// Whether the card id is itself an entity id (`domain.object_id`).
    #[must_use]
    pub fn is_entity_id(&self) -> bool {
        self.0
            .split_once('.')
            .is_some_and(|(domain, object)| !domain.is_empty() && !object.is_empty())
    }
}
