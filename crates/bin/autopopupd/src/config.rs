//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `autopopup.toml` in the working directory, or the file named
//! by `AUTOPOPUP_CONFIG`. Every field has a default so the file is
//! optional. Environment variables take precedence over file values.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use autopopup_domain::dashboard::{CardSettings, Dashboard, Page};
use autopopup_domain::error::AutoPopupError;
use autopopup_domain::id::{CardId, PageId};
use autopopup_domain::settings::{EngineSettings, STARTUP_WINDOW_MS};

const DEFAULT_PATH: &str = "autopopup.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
    pub dashboard: DashboardConfig,
    pub scenario: ScenarioConfig,
}

/// Engine switches and tunables.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Master switch for automatic popups.
    pub enabled: bool,
    /// Startup suppression window in milliseconds.
    pub startup_window_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Pages and cards of the dashboard.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub active_page: Option<String>,
    pub pages: Vec<PageConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub id: String,
    pub cards: Vec<CardConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub id: String,
    #[serde(flatten)]
    pub settings: CardSettings,
}

/// Input changes to replay.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// JSON-lines scenario file. Without one the daemon idles until Ctrl-C.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `AUTOPOPUP_CONFIG` or `autopopup.toml`
    /// (if present) then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("AUTOPOPUP_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("AUTOPOPUP_SCENARIO") {
            self.scenario.path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("AUTOPOPUP_ACTIVE_PAGE") {
            self.dashboard.active_page = Some(val);
        }
        if let Ok(val) = std::env::var("AUTOPOPUP_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.engine_settings().validate()?;
        self.dashboard()?.validate(self.active_page().as_ref())?;
        Ok(())
    }

    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            startup_window_ms: self.engine.startup_window_ms,
        }
    }

    /// Build the dashboard layout from the configured pages.
    ///
    /// # Errors
    ///
    /// Returns an error if a page or card id is empty.
    pub fn dashboard(&self) -> Result<Dashboard, ConfigError> {
        let pages = self
            .dashboard
            .pages
            .iter()
            .map(|page| {
                page.cards
                    .iter()
                    .fold(Page::builder().id(page.id.as_str()), |builder, card| {
                        builder.card(card.id.as_str())
                    })
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Dashboard::new(pages))
    }

    #[must_use]
    pub fn active_page(&self) -> Option<PageId> {
        self.dashboard.active_page.as_deref().map(PageId::from)
    }

    /// Per-card settings keyed by page and card, so the same card id may
    /// be configured differently on two pages.
    #[must_use]
    pub fn card_settings(&self) -> HashMap<(PageId, CardId), CardSettings> {
        self.dashboard
            .pages
            .iter()
            .flat_map(|page| {
                page.cards.iter().map(|card| {
                    (
                        (PageId::new(page.id.as_str()), CardId::new(card.id.as_str())),
                        card.settings.clone(),
                    )
                })
            })
            .collect()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            startup_window_ms: STARTUP_WINDOW_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "autopopupd=info,autopopup_app=info,autopopup_adapter_virtual=info"
                .to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration")]
    Invalid(#[from] AutoPopupError),
}
