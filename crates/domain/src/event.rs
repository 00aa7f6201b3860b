//! Event: an immutable record of something the engine did.
//!
//! Events are produced when a trigger wins a pass, a popup opens or fails
//! to open, an auto-close timer is armed or fires, and when the engine
//! drops its transient state.

use serde::{Deserialize, Serialize};

use crate::id::TriggerId;
use crate::time::{self, Timestamp};

/// Kind of engine event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    TriggerFired,
    PopupOpened,
    PopupOpenFailed,
    AutoCloseArmed,
    AutoClosed,
    EngineReset,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TriggerFired => "trigger_fired",
            Self::PopupOpened => "popup_opened",
            Self::PopupOpenFailed => "popup_open_failed",
            Self::AutoCloseArmed => "auto_close_armed",
            Self::AutoClosed => "auto_closed",
            Self::EngineReset => "engine_reset",
        };
        f.write_str(name)
    }
}

/// A single engine event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_type: EventType,
    pub trigger_id: Option<TriggerId>,
    pub timestamp: Timestamp,
    pub data: serde_json::Value,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(
        event_type: EventType,
        trigger_id: Option<TriggerId>,
        data: serde_json::Value,
    ) -> Self {
        Self::at(time::now(), event_type, trigger_id, data)
    }

    /// Create an event stamped with an explicit time.
    #[must_use]
    pub fn at(
        timestamp: Timestamp,
        event_type: EventType,
        trigger_id: Option<TriggerId>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            event_type,
            trigger_id,
            timestamp,
            data,
        }
    }
}
