//! Entity state: the current value and attributes of one entity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::AttributeValue;
use crate::time::Timestamp;

/// State value reported for entities the backend cannot reach.
pub const UNAVAILABLE: &str = "unavailable";

/// Current state of a single entity, e.g. `binary_sensor.front_door`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityState {
    /// Raw state value, e.g. `"on"`, `"open"`, `"21.5"`.
    pub state: String,
    #[serde(default)]
    pub attributes: HashMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_changed: Option<Timestamp>,
}

impl EntityState {
    /// Create a state with no attributes.
    #[must_use]
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: HashMap::new(),
            last_changed: None,
        }
    }

    /// Attach an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Whether the entity is reachable (anything but `unavailable`).
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state != UNAVAILABLE
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_available_when_state_is_on() {
        assert!(EntityState::new("on").is_available());
    }

    #[test]
    fn should_report_unavailable_when_state_is_unavailable() {
        assert!(!EntityState::new(UNAVAILABLE).is_available());
    }

    #[test]
    fn should_display_raw_state() {
        assert_eq!(EntityState::new("open").to_string(), "open");
    }

    #[test]
    fn should_deserialize_without_attributes() {
        let state: EntityState = serde_json::from_str(r#"{"state":"off"}"#).unwrap();
        assert_eq!(state.state, "off");
        assert!(state.attributes.is_empty());
        assert!(state.last_changed.is_none());
    }
}
