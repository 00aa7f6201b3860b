//! Device snapshot: every entity state the dashboard currently knows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::EntityState;

/// Mapping of entity id to state, plus whether the backend has delivered
/// its initial state dump yet.
///
/// An unloaded snapshot gates all trigger evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    #[serde(default)]
    pub loaded: bool,
    #[serde(default)]
    pub entities: HashMap<String, EntityState>,
}

impl DeviceSnapshot {
    /// A loaded snapshot holding the given entities.
    #[must_use]
    pub fn loaded(entities: impl IntoIterator<Item = (String, EntityState)>) -> Self {
        Self {
            loaded: true,
            entities: entities.into_iter().collect(),
        }
    }

    /// Look up an entity by id.
    #[must_use]
    pub fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.entities.get(entity_id)
    }

    /// Replace (or insert) one entity's state.
    pub fn set(&mut self, entity_id: impl Into<String>, state: EntityState) {
        self.entities.insert(entity_id.into(), state);
    }
}
