//! Condition port: the rule language the engine consumes as a predicate.

use autopopup_domain::condition::ConditionDescriptor;
use autopopup_domain::dashboard::CardSettings;
use autopopup_domain::entity::{DeviceSnapshot, EntityState};
use autopopup_domain::error::EvaluationError;
use autopopup_domain::id::CardId;

/// Evaluates auto-popup conditions against the current device snapshot.
///
/// Implementations must be pure: they are called synchronously during an
/// evaluation pass and must not touch engine state.
pub trait ConditionEvaluator {
    /// Whether the descriptor holds at least one actionable rule.
    fn is_configured(&self, condition: &ConditionDescriptor) -> bool;

    /// Card-type-specific default entity, used when a condition does not
    /// name one explicitly.
    fn resolve_entity_id(
        &self,
        card_id: &CardId,
        settings: &CardSettings,
        snapshot: &DeviceSnapshot,
    ) -> Option<String>;

    /// Evaluate the condition.
    ///
    /// `entity` is the state of `fallback_entity_id`, when both exist.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluationError`] when the descriptor cannot be
    /// interpreted. The engine treats that as a non-match for the pass.
    fn evaluate(
        &self,
        condition: &ConditionDescriptor,
        entity: Option<&EntityState>,
        snapshot: &DeviceSnapshot,
        fallback_entity_id: Option<&str>,
    ) -> Result<bool, EvaluationError>;
}
