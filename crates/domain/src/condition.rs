//! Condition descriptor: the auto-popup rule attached to a card.
//!
//! The engine treats the descriptor as opaque: only a
//! `ConditionEvaluator` port implementation knows how to read it.

use serde::{Deserialize, Serialize};

/// Opaque, serialized condition as stored in the card configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionDescriptor(serde_json::Value);

impl ConditionDescriptor {
    /// Wrap a raw descriptor.
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Access the raw descriptor.
    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Whether nothing at all was configured (`null`, `{}` or `[]`).
    ///
    /// This is a cheap pre-filter; evaluators still decide whether a
    /// non-blank descriptor holds an actionable rule.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match &self.0 {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for ConditionDescriptor {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_blank() {
        assert!(ConditionDescriptor::default().is_blank());
    }

    #[test]
    fn should_treat_empty_object_as_blank() {
        assert!(ConditionDescriptor::new(serde_json::json!({})).is_blank());
    }

    #[test]
    fn should_not_treat_rule_object_as_blank() {
        let c = ConditionDescriptor::new(serde_json::json!({"rules": []}));
        assert!(!c.is_blank());
    }

    #[test]
    fn should_deserialize_transparently() {
        let c: ConditionDescriptor =
            serde_json::from_str(r#"{"rules":[{"entity":"lock.front","state":"unlocked"}]}"#)
                .unwrap();
        assert_eq!(c.as_value()["rules"][0]["state"], "unlocked");
    }
}
