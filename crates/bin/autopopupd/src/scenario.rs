//! Scenario replay: a JSON-lines script of dashboard input changes.
//!
//! Each non-empty line is one step:
//!
//! ```text
//! {"at_ms": 0, "type": "snapshot", "entities": {"binary_sensor.front_door": {"state": "off"}}}
//! {"at_ms": 20000, "type": "set_state", "entity_id": "binary_sensor.front_door", "state": "on"}
//! {"at_ms": 30000, "type": "edit_mode", "enabled": true}
//! ```
//!
//! `at_ms` is the offset from the start of the replay and must not go
//! backwards. Lines starting with `#` are comments.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tokio::time::Instant;

use autopopup_app::popup_engine::{PassOutcome, PopupTriggerEngine};
use autopopup_app::ports::{Clock, ConditionEvaluator, EventPublisher, PopupPresenter};
use autopopup_domain::entity::{AttributeValue, DeviceSnapshot, EntityState};
use autopopup_domain::id::PageId;

/// An ordered list of steps.
#[derive(Debug, Default, PartialEq)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

/// One input change applied to the engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Replace the whole device snapshot.
    Snapshot {
        #[serde(default = "loaded_by_default")]
        loaded: bool,
        #[serde(default)]
        entities: HashMap<String, EntityState>,
    },
    /// Change one entity in the current snapshot.
    SetState {
        entity_id: String,
        state: String,
        #[serde(default)]
        attributes: HashMap<String, AttributeValue>,
    },
    /// Mark device state as unavailable, keeping the last known entities.
    Unload,
    ActivePage {
        page: Option<PageId>,
    },
    EditMode {
        enabled: bool,
    },
    Enabled {
        enabled: bool,
    },
}

fn loaded_by_default() -> bool {
    true
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Self::Snapshot { .. } => "snapshot",
            Self::SetState { .. } => "set_state",
            Self::Unload => "unload",
            Self::ActivePage { .. } => "active_page",
            Self::EditMode { .. } => "edit_mode",
            Self::Enabled { .. } => "enabled",
        }
    }

    /// Apply the change; the engine runs one evaluation pass.
    pub fn apply<E, P, B, C>(&self, engine: &mut PopupTriggerEngine<E, P, B, C>) -> PassOutcome
    where
        E: ConditionEvaluator,
        P: PopupPresenter,
        B: EventPublisher,
        C: Clock,
    {
        match self {
            Self::Snapshot { loaded, entities } => engine.update_snapshot(DeviceSnapshot {
                loaded: *loaded,
                entities: entities.clone(),
            }),
            Self::SetState {
                entity_id,
                state,
                attributes,
            } => {
                let mut snapshot = engine.snapshot().clone();
                snapshot.set(
                    entity_id.as_str(),
                    EntityState {
                        state: state.clone(),
                        attributes: attributes.clone(),
                        last_changed: None,
                    },
                );
                engine.update_snapshot(snapshot)
            }
            Self::Unload => {
                let mut snapshot = engine.snapshot().clone();
                snapshot.loaded = false;
                engine.update_snapshot(snapshot)
            }
            Self::ActivePage { page } => engine.set_active_page(page.clone()),
            Self::EditMode { enabled } => engine.set_edit_mode(*enabled),
            Self::Enabled { enabled } => engine.set_enabled(*enabled),
        }
    }
}

impl Scenario {
    /// Read a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a line is invalid.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse JSON-lines content.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid line.
    pub fn parse(content: &str) -> Result<Self, ScenarioError> {
        let mut steps: Vec<Step> = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let step: Step = serde_json::from_str(trimmed).map_err(|source| ScenarioError::Parse {
                line: line_no,
                source,
            })?;
            if let Some(previous) = steps.last()
                && step.at_ms < previous.at_ms
            {
                return Err(ScenarioError::OutOfOrder {
                    line: line_no,
                    at_ms: step.at_ms,
                    previous: previous.at_ms,
                });
            }
            steps.push(step);
        }
        Ok(Self { steps })
    }
}

/// Replay every step at its offset, then wait for a pending auto-close.
pub async fn replay<E, P, B, C>(engine: &mut PopupTriggerEngine<E, P, B, C>, scenario: &Scenario)
where
    E: ConditionEvaluator,
    P: PopupPresenter,
    B: EventPublisher,
    C: Clock,
{
    let start = Instant::now();
    for step in &scenario.steps {
        tokio::time::sleep_until(start + Duration::from_millis(step.at_ms)).await;
        let outcome = step.action.apply(engine);
        tracing::debug!(
            at_ms = step.at_ms,
            action = step.action.name(),
            ?outcome,
            "applied scenario step"
        );
    }

    if engine.is_auto_close_armed() {
        tracing::info!("scenario finished, waiting for pending auto-close");
    }
    while let Some(deadline) = engine.auto_close_deadline() {
        tokio::time::sleep_until(deadline).await;
        // let the timer task run its close
        tokio::task::yield_now().await;
    }
}

/// Scenario loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file")]
    Io(#[from] std::io::Error),
    #[error("invalid scenario step on line {line}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("step on line {line} at {at_ms}ms comes before the previous step at {previous}ms")]
    OutOfOrder { line: usize, at_ms: u64, previous: u64 },
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use autopopup_adapter_virtual::{StateRuleEvaluator, VirtualPopupSurface};
    use autopopup_app::event_bus::InProcessEventBus;
    use autopopup_app::popup_engine::SkipReason;
    use autopopup_domain::condition::ConditionDescriptor;
    use autopopup_domain::dashboard::{AutoPopupSettings, CardSettings, Dashboard, Page};
    use autopopup_domain::id::CardId;
    use autopopup_domain::popup::PopupTarget;
    use autopopup_domain::settings::EngineSettings;

    use super::*;
    use crate::clock::TokioClock;

    const FRONT_DOOR: &str = r#"
# door closed at startup, opens after the startup window
{"at_ms": 0, "type": "snapshot", "entities": {"binary_sensor.front_door": {"state": "off"}}}

{"at_ms": 20000, "type": "set_state", "entity_id": "binary_sensor.front_door", "state": "on"}
"#;

    type Engine =
        PopupTriggerEngine<StateRuleEvaluator, VirtualPopupSurface, InProcessEventBus, TokioClock>;

    fn engine(surface: &Arc<VirtualPopupSurface>) -> Engine {
        let mut engine = PopupTriggerEngine::new(
            EngineSettings::default(),
            StateRuleEvaluator,
            Arc::clone(surface),
            Arc::new(InProcessEventBus::new(16)),
            TokioClock::new(),
        )
        .unwrap();
        let settings = CardSettings {
            auto_popup: AutoPopupSettings {
                enabled: true,
                condition: ConditionDescriptor::new(
                    serde_json::json!({ "rules": [{ "state": "on" }] }),
                ),
                cooldown_seconds: None,
                auto_close_seconds: Some(5.0),
            },
            ..CardSettings::default()
        };
        let page = Page::builder()
            .id("home")
            .card("binary_sensor.front_door")
            .build()
            .unwrap();
        let resolver: HashMap<CardId, CardSettings> =
            HashMap::from([(CardId::new("binary_sensor.front_door"), settings)]);
        engine.configure(
            true,
            Dashboard::new(vec![page]),
            Some(PageId::new("home")),
            resolver,
        );
        engine
    }

    #[test]
    fn should_parse_steps_skipping_comments_and_blank_lines() {
        let scenario = Scenario::parse(FRONT_DOOR).unwrap();
        assert_eq!(scenario.steps.len(), 2);
        assert_eq!(scenario.steps[1].at_ms, 20_000);
        assert_eq!(
            scenario.steps[1].action,
            Action::SetState {
                entity_id: "binary_sensor.front_door".to_string(),
                state: "on".to_string(),
                attributes: HashMap::new(),
            }
        );
    }

    #[test]
    fn should_default_snapshot_to_loaded() {
        let scenario = Scenario::parse(r#"{"at_ms": 0, "type": "snapshot"}"#).unwrap();
        assert_eq!(
            scenario.steps[0].action,
            Action::Snapshot {
                loaded: true,
                entities: HashMap::new()
            }
        );
    }

    #[test]
    fn should_parse_unit_and_flag_steps() {
        let scenario = Scenario::parse(
            r#"{"at_ms": 0, "type": "unload"}
{"at_ms": 1, "type": "active_page", "page": "garden"}
{"at_ms": 2, "type": "edit_mode", "enabled": true}
{"at_ms": 3, "type": "enabled", "enabled": false}"#,
        )
        .unwrap();
        let actions: Vec<_> = scenario.steps.into_iter().map(|step| step.action).collect();
        assert_eq!(
            actions,
            vec![
                Action::Unload,
                Action::ActivePage {
                    page: Some(PageId::new("garden"))
                },
                Action::EditMode { enabled: true },
                Action::Enabled { enabled: false },
            ]
        );
    }

    #[test]
    fn should_report_line_of_invalid_step() {
        let result = Scenario::parse("{\"at_ms\": 0, \"type\": \"unload\"}\n\n{\"type\": \"teleport\"}");
        assert!(matches!(result, Err(ScenarioError::Parse { line: 3, .. })));
    }

    #[test]
    fn should_reject_steps_going_back_in_time() {
        let result = Scenario::parse(
            "{\"at_ms\": 500, \"type\": \"unload\"}\n{\"at_ms\": 100, \"type\": \"unload\"}",
        );
        assert!(matches!(
            result,
            Err(ScenarioError::OutOfOrder {
                line: 2,
                at_ms: 100,
                previous: 500
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn should_open_and_auto_close_popup_during_replay() {
        let surface = Arc::new(VirtualPopupSurface::default());
        let mut engine = engine(&surface);
        let scenario = Scenario::parse(FRONT_DOOR).unwrap();

        let started = Instant::now();
        replay(&mut engine, &scenario).await;

        assert_eq!(
            surface.shown(),
            vec![PopupTarget::EntityDetail {
                entity_id: "binary_sensor.front_door".to_string()
            }]
        );
        assert_eq!(surface.current(), None);
        assert_eq!(started.elapsed(), Duration::from_millis(25_000));
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_open_popup_for_change_inside_startup_window() {
        let surface = Arc::new(VirtualPopupSurface::default());
        let mut engine = engine(&surface);
        let scenario = Scenario::parse(
            r#"{"at_ms": 0, "type": "snapshot", "entities": {"binary_sensor.front_door": {"state": "off"}}}
{"at_ms": 3000, "type": "set_state", "entity_id": "binary_sensor.front_door", "state": "on"}"#,
        )
        .unwrap();

        replay(&mut engine, &scenario).await;

        assert!(surface.shown().is_empty());
    }

    #[tokio::test]
    async fn should_skip_pass_when_entering_edit_mode() {
        let surface = Arc::new(VirtualPopupSurface::default());
        let mut engine = engine(&surface);
        Scenario::parse(FRONT_DOOR).unwrap().steps[0]
            .action
            .apply(&mut engine);

        let outcome = Action::EditMode { enabled: true }.apply(&mut engine);
        assert_eq!(outcome, PassOutcome::Skipped(SkipReason::EditMode));
    }

    #[tokio::test]
    async fn should_keep_entities_when_unloading() {
        let surface = Arc::new(VirtualPopupSurface::default());
        let mut engine = engine(&surface);
        Scenario::parse(FRONT_DOOR).unwrap().steps[0]
            .action
            .apply(&mut engine);

        let outcome = Action::Unload.apply(&mut engine);

        assert_eq!(outcome, PassOutcome::Skipped(SkipReason::NotLoaded));
        assert!(engine.snapshot().get("binary_sensor.front_door").is_some());
    }
}
