//! Trigger: one card paired with its auto-popup condition.
//!
//! Triggers are derived fresh on every evaluation pass from the active
//! page and the card settings; the engine never persists them.

use serde::{Deserialize, Serialize};

use crate::condition::ConditionDescriptor;
use crate::dashboard::{AutoPopupSettings, CardSettings};
use crate::id::{CardId, PageId, TriggerId};

/// Shortest cooldown a trigger may use, in seconds.
pub const MIN_COOLDOWN_SECONDS: u64 = 10;
/// Longest cooldown a trigger may use, in seconds.
pub const MAX_COOLDOWN_SECONDS: u64 = 3600;
/// Longest auto-close delay, in seconds. `0` disables auto-close.
pub const MAX_AUTO_CLOSE_SECONDS: u64 = 3600;

/// A live auto-popup rule for one card on the active page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: TriggerId,
    pub page_id: PageId,
    pub card_id: CardId,
    pub enabled: bool,
    pub condition: ConditionDescriptor,
    pub cooldown_ms: u64,
    /// `0` means the popup stays open until closed by someone else.
    pub auto_close_ms: u64,
    /// Settings the card was configured with, handed to the dispatcher.
    pub settings: CardSettings,
}

impl Trigger {
    /// Derive a trigger from a card's settings, normalizing the timing
    /// windows.
    #[must_use]
    pub fn from_card(page_id: &PageId, card_id: &CardId, settings: CardSettings) -> Self {
        let AutoPopupSettings {
            enabled,
            condition,
            cooldown_seconds,
            auto_close_seconds,
        } = settings.auto_popup.clone();
        Self {
            id: TriggerId::for_card(page_id, card_id),
            page_id: page_id.clone(),
            card_id: card_id.clone(),
            enabled,
            condition,
            cooldown_ms: normalize_cooldown_seconds(cooldown_seconds) * 1000,
            auto_close_ms: normalize_auto_close_seconds(auto_close_seconds) * 1000,
            settings,
        }
    }
}

/// Clamp a raw cooldown to `[10, 3600]` seconds.
///
/// Missing or non-finite values fall back to the floor.
#[must_use]
pub fn normalize_cooldown_seconds(raw: Option<f64>) -> u64 {
    clamp_seconds(raw, MIN_COOLDOWN_SECONDS, MAX_COOLDOWN_SECONDS)
        .unwrap_or(MIN_COOLDOWN_SECONDS)
}

/// Clamp a raw auto-close delay to `[0, 3600]` seconds.
///
/// Missing or non-finite values disable auto-close.
#[must_use]
pub fn normalize_auto_close_seconds(raw: Option<f64>) -> u64 {
    clamp_seconds(raw, 0, MAX_AUTO_CLOSE_SECONDS).unwrap_or(0)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn clamp_seconds(raw: Option<f64>, min: u64, max: u64) -> Option<u64> {
    let value = raw.filter(|v| v.is_finite())?;
    // bounds are small integers, so the casts are exact
    Some(value.round().clamp(min as f64, max as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_raise_zero_cooldown_to_floor() {
        assert_eq!(normalize_cooldown_seconds(Some(0.0)), 10);
    }

    #[test]
    fn should_cap_huge_cooldown() {
        assert_eq!(normalize_cooldown_seconds(Some(99_999.0)), 3600);
    }

    #[test]
    fn should_default_missing_cooldown_to_floor() {
        assert_eq!(normalize_cooldown_seconds(None), 10);
        assert_eq!(normalize_cooldown_seconds(Some(f64::NAN)), 10);
    }

    #[test]
    fn should_keep_cooldown_within_range() {
        assert_eq!(normalize_cooldown_seconds(Some(45.0)), 45);
    }

    #[test]
    fn should_clamp_negative_auto_close_to_zero() {
        assert_eq!(normalize_auto_close_seconds(Some(-5.0)), 0);
    }

    #[test]
    fn should_cap_huge_auto_close() {
        assert_eq!(normalize_auto_close_seconds(Some(99_999.0)), 3600);
    }

    #[test]
    fn should_disable_auto_close_when_missing() {
        assert_eq!(normalize_auto_close_seconds(None), 0);
        assert_eq!(normalize_auto_close_seconds(Some(f64::INFINITY)), 0);
    }

    #[test]
    fn should_derive_trigger_with_millisecond_windows() {
        let settings = CardSettings {
            auto_popup: AutoPopupSettings {
                enabled: true,
                condition: ConditionDescriptor::new(serde_json::json!({"rules": []})),
                cooldown_seconds: Some(30.0),
                auto_close_seconds: Some(5.0),
            },
            ..CardSettings::default()
        };
        let trigger = Trigger::from_card(
            &PageId::new("home"),
            &CardId::new("cover-garage"),
            settings,
        );
        assert_eq!(trigger.id.as_str(), "home|cover-garage");
        assert!(trigger.enabled);
        assert_eq!(trigger.cooldown_ms, 30_000);
        assert_eq!(trigger.auto_close_ms, 5_000);
    }
}
