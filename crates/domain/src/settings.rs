//! Engine-wide settings.

use serde::{Deserialize, Serialize};

use crate::error::{AutoPopupError, ValidationError};

/// Grace period after device state first loads during which no trigger
/// may open a popup.
pub const STARTUP_WINDOW_MS: u64 = 15_000;

/// Upper bound accepted for [`EngineSettings::startup_window_ms`].
pub const MAX_STARTUP_WINDOW_MS: u64 = 3_600_000;

/// Tunables of the popup-trigger engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub startup_window_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            startup_window_ms: STARTUP_WINDOW_MS,
        }
    }
}

impl EngineSettings {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StartupWindowOutOfRange`] when the window
    /// exceeds one hour.
    pub fn validate(&self) -> Result<(), AutoPopupError> {
        if self.startup_window_ms > MAX_STARTUP_WINDOW_MS {
            return Err(ValidationError::StartupWindowOutOfRange(self.startup_window_ms).into());
        }
        Ok(())
    }
}
