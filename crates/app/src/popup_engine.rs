//! Popup-trigger engine: opens a card's popup when its condition turns true.
//!
//! The engine is driven by input changes, not by a polling loop: every
//! setter runs exactly one evaluation pass, and [`notify`] runs one without
//! changing anything. A pass builds the live triggers of the active page,
//! records each trigger's match result, and lets at most one rising edge
//! (the first in card order that is not suppressed) open its popup.
//!
//! [`notify`]: PopupTriggerEngine::notify

use std::sync::Arc;
use std::time::Duration;

use autopopup_domain::dashboard::Dashboard;
use autopopup_domain::entity::DeviceSnapshot;
use autopopup_domain::error::AutoPopupError;
use autopopup_domain::event::{Event, EventType};
use autopopup_domain::id::{PageId, TriggerId};
use autopopup_domain::settings::EngineSettings;
use autopopup_domain::time::Timestamp;
use autopopup_domain::trigger::Trigger;

use crate::auto_close::AutoCloseScheduler;
use crate::dispatcher::PopupDispatcher;
use crate::ports::{CardSettingsResolver, Clock, ConditionEvaluator, EventPublisher, PopupPresenter};
use crate::trigger_catalog::TriggerCatalog;
use crate::trigger_history::{Edge, TriggerHistory};

/// Why a pass did not evaluate any trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    EditMode,
    NotLoaded,
}

/// Result of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    Skipped(SkipReason),
    Evaluated {
        /// Trigger that won the pass, if any.
        winner: Option<TriggerId>,
        /// Whether the winner's popup actually opened.
        opened: bool,
    },
}

impl PassOutcome {
    /// Trigger that won the pass, if any.
    #[must_use]
    pub fn winner(&self) -> Option<&TriggerId> {
        match self {
            Self::Evaluated { winner, .. } => winner.as_ref(),
            Self::Skipped(_) => None,
        }
    }
}

/// Watches device state and opens popups for cards whose condition rises.
pub struct PopupTriggerEngine<E, P, B, C> {
    settings: EngineSettings,
    evaluator: E,
    dispatcher: PopupDispatcher<P>,
    auto_close: AutoCloseScheduler<P, B>,
    publisher: Arc<B>,
    clock: C,
    catalog: TriggerCatalog,
    enabled: bool,
    edit_mode: bool,
    snapshot: DeviceSnapshot,
    history: TriggerHistory,
}

impl<E, P, B, C> PopupTriggerEngine<E, P, B, C>
where
    E: ConditionEvaluator,
    P: PopupPresenter,
    B: EventPublisher,
    C: Clock,
{
    /// Create a disabled engine with an empty dashboard.
    ///
    /// Auto-close timers are spawned on the tokio runtime current at this
    /// call; without one, popups are never auto-closed.
    ///
    /// # Errors
    ///
    /// Returns [`AutoPopupError::Validation`] if `settings` are invalid.
    pub fn new(
        settings: EngineSettings,
        evaluator: E,
        presenter: Arc<P>,
        publisher: Arc<B>,
        clock: C,
    ) -> Result<Self, AutoPopupError> {
        settings.validate()?;
        Ok(Self {
            settings,
            evaluator,
            dispatcher: PopupDispatcher::new(Arc::clone(&presenter)),
            auto_close: AutoCloseScheduler::new(presenter, Arc::clone(&publisher)),
            publisher,
            clock,
            catalog: TriggerCatalog::default(),
            enabled: false,
            edit_mode: false,
            snapshot: DeviceSnapshot::default(),
            history: TriggerHistory::default(),
        })
    }

    /// Update the live trigger catalog and run a pass.
    ///
    /// History of triggers on pages that are no longer active is kept, so
    /// returning to a page resumes where it left off.
    #[tracing::instrument(skip(self, dashboard, resolver), fields(pages = dashboard.pages.len()))]
    pub fn configure(
        &mut self,
        enabled: bool,
        dashboard: Dashboard,
        active_page: Option<PageId>,
        resolver: impl CardSettingsResolver + Send + Sync + 'static,
    ) -> PassOutcome {
        self.enabled = enabled;
        self.catalog = TriggerCatalog::new(dashboard, active_page, resolver);
        self.notify()
    }

    /// Enable or disable the engine, then run a pass.
    pub fn set_enabled(&mut self, enabled: bool) -> PassOutcome {
        self.enabled = enabled;
        self.notify()
    }

    /// Switch the active page, then run a pass.
    pub fn set_active_page(&mut self, page: Option<PageId>) -> PassOutcome {
        self.catalog.set_active_page(page);
        self.notify()
    }

    /// Enter or leave edit mode, then run a pass.
    ///
    /// While editing, passes leave all history untouched. Losing device
    /// state still resets it.
    pub fn set_edit_mode(&mut self, edit_mode: bool) -> PassOutcome {
        self.edit_mode = edit_mode;
        self.notify()
    }

    /// Replace the device snapshot, then run a pass.
    pub fn update_snapshot(&mut self, snapshot: DeviceSnapshot) -> PassOutcome {
        self.snapshot = snapshot;
        self.notify()
    }

    /// Run one evaluation pass against the current inputs.
    pub fn notify(&mut self) -> PassOutcome {
        let now = self.clock.now();

        if !self.enabled {
            self.reset(now, "disabled");
            return PassOutcome::Skipped(SkipReason::Disabled);
        }
        if !self.snapshot.loaded {
            self.reset(now, "device state not loaded");
            return PassOutcome::Skipped(SkipReason::NotLoaded);
        }
        if self.edit_mode {
            return PassOutcome::Skipped(SkipReason::EditMode);
        }

        self.history
            .start_window(now, self.settings.startup_window_ms);

        let triggers = self.catalog.live_triggers(&self.evaluator);
        let mut winner: Option<&Trigger> = None;
        for trigger in &triggers {
            let matches_now = self.evaluate(trigger);
            let edge = self.history.observe(&trigger.id, matches_now);
            if edge != Edge::Rising {
                tracing::trace!(trigger_id = %trigger.id, ?edge, "no rising edge");
                continue;
            }
            if let Some(reason) = self.history.suppression(trigger, now) {
                tracing::debug!(trigger_id = %trigger.id, ?reason, "rising edge suppressed");
                continue;
            }
            if let Some(first) = winner {
                tracing::debug!(
                    trigger_id = %trigger.id,
                    winner = %first.id,
                    "rising edge lost to an earlier card"
                );
                continue;
            }
            winner = Some(trigger);
        }
        self.history.mark_initialized();

        match winner {
            Some(trigger) => self.fire(trigger, now),
            None => PassOutcome::Evaluated {
                winner: None,
                opened: false,
            },
        }
    }

    /// Cancel the auto-close timer, forget all history and disable the
    /// engine. Called on teardown.
    #[tracing::instrument(skip(self))]
    pub fn shutdown(&mut self) {
        self.auto_close.cancel();
        self.history.clear();
        self.enabled = false;
        tracing::info!("popup trigger engine shut down");
    }

    #[must_use]
    pub fn history(&self) -> &TriggerHistory {
        &self.history
    }

    #[must_use]
    pub fn is_auto_close_armed(&self) -> bool {
        self.auto_close.is_armed()
    }

    /// When the pending auto-close fires, if one is armed.
    #[must_use]
    pub fn auto_close_deadline(&self) -> Option<tokio::time::Instant> {
        self.auto_close.deadline()
    }

    #[must_use]
    pub fn snapshot(&self) -> &DeviceSnapshot {
        &self.snapshot
    }

    /// Evaluate a trigger's condition; failures count as no match.
    fn evaluate(&self, trigger: &Trigger) -> bool {
        let fallback = self.evaluator.resolve_entity_id(
            &trigger.card_id,
            &trigger.settings,
            &self.snapshot,
        );
        let entity = fallback.as_deref().and_then(|id| self.snapshot.get(id));
        match self.evaluator.evaluate(
            &trigger.condition,
            entity,
            &self.snapshot,
            fallback.as_deref(),
        ) {
            Ok(matches) => matches,
            Err(err) => {
                tracing::warn!(
                    trigger_id = %trigger.id,
                    error = %err,
                    "condition evaluation failed, treating as no match"
                );
                false
            }
        }
    }

    fn fire(&mut self, trigger: &Trigger, now: Timestamp) -> PassOutcome {
        tracing::info!(trigger_id = %trigger.id, card_id = %trigger.card_id, "auto-popup trigger fired");
        self.publish(now, EventType::TriggerFired, trigger, serde_json::json!({}));

        let opened = self.dispatcher.dispatch(&trigger.card_id, &trigger.settings);
        // cooldown starts even when the popup could not be opened
        self.history.stamp_opened(trigger.id.clone(), now);

        if !opened {
            tracing::warn!(
                trigger_id = %trigger.id,
                cooldown_ms = trigger.cooldown_ms,
                "popup could not be opened, cooldown still applies"
            );
            self.publish(now, EventType::PopupOpenFailed, trigger, serde_json::json!({}));
            return PassOutcome::Evaluated {
                winner: Some(trigger.id.clone()),
                opened: false,
            };
        }

        self.publish(
            now,
            EventType::PopupOpened,
            trigger,
            serde_json::json!({ "card_id": trigger.card_id }),
        );
        if trigger.auto_close_ms > 0
            && self
                .auto_close
                .arm(Duration::from_millis(trigger.auto_close_ms), trigger.id.clone())
        {
            self.publish(
                now,
                EventType::AutoCloseArmed,
                trigger,
                serde_json::json!({ "delay_ms": trigger.auto_close_ms }),
            );
        }

        PassOutcome::Evaluated {
            winner: Some(trigger.id.clone()),
            opened: true,
        }
    }

    /// Drop transient history and cancel the auto-close timer.
    fn reset(&mut self, now: Timestamp, reason: &'static str) {
        let cancelled = self.auto_close.cancel();
        let cleared = self.history.reset_transient();
        if cancelled || cleared {
            tracing::debug!(reason, cancelled, "resetting trigger history");
            self.publisher.publish(Event::at(
                now,
                EventType::EngineReset,
                None,
                serde_json::json!({ "reason": reason }),
            ));
        }
    }

    fn publish(
        &self,
        now: Timestamp,
        event_type: EventType,
        trigger: &Trigger,
        data: serde_json::Value,
    ) {
        self.publisher
            .publish(Event::at(now, event_type, Some(trigger.id.clone()), data));
    }
}
