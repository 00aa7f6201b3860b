//! State-equality condition evaluator.
//!
//! Conditions have the shape
//!
//! ```json
//! { "rules": [
//!     { "entity": "binary_sensor.door", "state": "on" },
//!     { "attribute": "hvac_action", "state": "heating" }
//! ] }
//! ```
//!
//! and match when every rule holds. A rule without `entity` applies to
//! the card's resolved entity. With `attribute`, the attribute's value is
//! compared instead of the entity state.

use serde::Deserialize;

use autopopup_app::ports::ConditionEvaluator;
use autopopup_domain::condition::ConditionDescriptor;
use autopopup_domain::dashboard::CardSettings;
use autopopup_domain::entity::{DeviceSnapshot, EntityState};
use autopopup_domain::error::EvaluationError;
use autopopup_domain::id::CardId;

#[derive(Debug, Deserialize)]
struct StateCondition {
    #[serde(default)]
    rules: Vec<StateRule>,
}

#[derive(Debug, Deserialize)]
struct StateRule {
    entity: Option<String>,
    attribute: Option<String>,
    state: String,
}

impl StateRule {
    fn holds(&self, state: &EntityState) -> bool {
        match &self.attribute {
            Some(key) => state
                .attributes
                .get(key)
                .is_some_and(|value| value.to_string() == self.state),
            None => state.state == self.state,
        }
    }
}

fn parse(condition: &ConditionDescriptor) -> Result<StateCondition, EvaluationError> {
    StateCondition::deserialize(condition.as_value()).map_err(EvaluationError::Malformed)
}

/// Evaluates all-of state equality rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateRuleEvaluator;

impl ConditionEvaluator for StateRuleEvaluator {
    fn is_configured(&self, condition: &ConditionDescriptor) -> bool {
        parse(condition).is_ok_and(|parsed| !parsed.rules.is_empty())
    }

    fn resolve_entity_id(
        &self,
        card_id: &CardId,
        settings: &CardSettings,
        _snapshot: &DeviceSnapshot,
    ) -> Option<String> {
        if let Some(entity_id) = &settings.entity_id {
            return Some(entity_id.clone());
        }
        if card_id.is_entity_id() {
            return Some(card_id.to_string());
        }
        // a condition watching a single entity speaks for the card
        let parsed = parse(&settings.auto_popup.condition).ok()?;
        let mut named = parsed.rules.iter().filter_map(|rule| rule.entity.as_deref());
        let first = named.next()?;
        named.all(|other| other == first).then(|| first.to_string())
    }

    fn evaluate(
        &self,
        condition: &ConditionDescriptor,
        entity: Option<&EntityState>,
        snapshot: &DeviceSnapshot,
        fallback_entity_id: Option<&str>,
    ) -> Result<bool, EvaluationError> {
        let parsed = parse(condition)?;
        for rule in &parsed.rules {
            let state = match (&rule.entity, entity) {
                (Some(id), _) => snapshot
                    .get(id)
                    .ok_or_else(|| EvaluationError::MissingEntity(id.clone()))?,
                (None, Some(state)) => state,
                (None, None) => {
                    return Err(match fallback_entity_id {
                        Some(id) => EvaluationError::MissingEntity(id.to_string()),
                        None => EvaluationError::NoEntity,
                    });
                }
            };
            if !rule.holds(state) {
                return Ok(false);
            }
        }
        Ok(!parsed.rules.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use autopopup_domain::dashboard::AutoPopupSettings;
    use autopopup_domain::entity::AttributeValue;
    use serde_json::json;

    use super::*;

    fn condition(value: serde_json::Value) -> ConditionDescriptor {
        ConditionDescriptor::new(value)
    }

    fn snapshot() -> DeviceSnapshot {
        DeviceSnapshot::loaded([
            ("binary_sensor.door".to_string(), EntityState::new("on")),
            (
                "climate.living".to_string(),
                EntityState::new("heat")
                    .with_attribute("hvac_action", AttributeValue::String("heating".into())),
            ),
        ])
    }

    #[test]
    fn should_be_configured_when_rules_are_present() {
        let evaluator = StateRuleEvaluator;
        assert!(evaluator.is_configured(&condition(json!({
            "rules": [{ "state": "on" }]
        }))));
    }

    #[test]
    fn should_not_be_configured_when_rules_are_empty_or_malformed() {
        let evaluator = StateRuleEvaluator;
        assert!(!evaluator.is_configured(&condition(json!({ "rules": [] }))));
        assert!(!evaluator.is_configured(&condition(json!({ "rules": "on" }))));
        assert!(!evaluator.is_configured(&ConditionDescriptor::default()));
    }

    #[test]
    fn should_match_when_named_entity_has_expected_state() {
        let result = StateRuleEvaluator.evaluate(
            &condition(json!({ "rules": [{ "entity": "binary_sensor.door", "state": "on" }] })),
            None,
            &snapshot(),
            None,
        );
        assert!(result.unwrap());
    }

    #[test]
    fn should_require_every_rule_to_hold() {
        let result = StateRuleEvaluator.evaluate(
            &condition(json!({ "rules": [
                { "entity": "binary_sensor.door", "state": "on" },
                { "entity": "climate.living", "state": "off" }
            ] })),
            None,
            &snapshot(),
            None,
        );
        assert!(!result.unwrap());
    }

    #[test]
    fn should_compare_attribute_of_fallback_entity() {
        let snapshot = snapshot();
        let result = StateRuleEvaluator.evaluate(
            &condition(json!({ "rules": [{ "attribute": "hvac_action", "state": "heating" }] })),
            snapshot.get("climate.living"),
            &snapshot,
            Some("climate.living"),
        );
        assert!(result.unwrap());
    }

    #[test]
    fn should_fail_when_no_entity_can_be_found() {
        let result = StateRuleEvaluator.evaluate(
            &condition(json!({ "rules": [{ "state": "on" }] })),
            None,
            &snapshot(),
            None,
        );
        assert!(matches!(result, Err(EvaluationError::NoEntity)));
    }

    #[test]
    fn should_fail_when_named_entity_is_missing() {
        let result = StateRuleEvaluator.evaluate(
            &condition(json!({ "rules": [{ "entity": "lock.front", "state": "unlocked" }] })),
            None,
            &snapshot(),
            None,
        );
        assert!(matches!(result, Err(EvaluationError::MissingEntity(id)) if id == "lock.front"));
    }

    #[test]
    fn should_fail_when_condition_is_malformed() {
        let result =
            StateRuleEvaluator.evaluate(&condition(json!({ "rules": 3 })), None, &snapshot(), None);
        assert!(matches!(result, Err(EvaluationError::Malformed(_))));
    }

    #[test]
    fn should_resolve_entity_from_settings_first() {
        let settings = CardSettings {
            entity_id: Some("cover.garage".to_string()),
            ..CardSettings::default()
        };
        let resolved = StateRuleEvaluator.resolve_entity_id(
            &CardId::new("light.kitchen"),
            &settings,
            &snapshot(),
        );
        assert_eq!(resolved.as_deref(), Some("cover.garage"));
    }

    #[test]
    fn should_resolve_entity_from_entity_card_id() {
        let resolved = StateRuleEvaluator.resolve_entity_id(
            &CardId::new("light.kitchen"),
            &CardSettings::default(),
            &snapshot(),
        );
        assert_eq!(resolved.as_deref(), Some("light.kitchen"));
    }

    #[test]
    fn should_resolve_single_watched_entity_for_room_card() {
        let settings = CardSettings {
            auto_popup: AutoPopupSettings {
                condition: condition(json!({ "rules": [
                    { "entity": "binary_sensor.door", "state": "on" },
                    { "entity": "binary_sensor.door", "attribute": "tamper", "state": "false" }
                ] })),
                ..AutoPopupSettings::default()
            },
            ..CardSettings::default()
        };
        let resolved =
            StateRuleEvaluator.resolve_entity_id(&CardId::new("room-hall"), &settings, &snapshot());
        assert_eq!(resolved.as_deref(), Some("binary_sensor.door"));
    }

    #[test]
    fn should_not_resolve_when_rules_watch_several_entities() {
        let settings = CardSettings {
            auto_popup: AutoPopupSettings {
                condition: condition(json!({ "rules": [
                    { "entity": "binary_sensor.door", "state": "on" },
                    { "entity": "climate.living", "state": "heat" }
                ] })),
                ..AutoPopupSettings::default()
            },
            ..CardSettings::default()
        };
        let resolved =
            StateRuleEvaluator.resolve_entity_id(&CardId::new("room-hall"), &settings, &snapshot());
        assert_eq!(resolved, None);
    }
}
