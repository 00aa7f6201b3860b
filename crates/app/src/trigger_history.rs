//! Per-trigger history: edge detection and suppression.
//!
//! Every pass records each live trigger's match result and classifies it:
//!
//! | seen before? | before | now   | [`Edge`]     |
//! |--------------|--------|-------|--------------|
//! | no           | any    | any   | `First`      |
//! | yes          | any    | false | `NoMatch`    |
//! | yes          | true   | true  | `Sustained`  |
//! | yes          | false  | true  | `Rising`     |
//!
//! Only a `Rising` edge can open a popup, and only when no [`Suppression`]
//! applies: the very first pass after (re)enabling never fires, nothing
//! fires inside the startup window, and a trigger in cooldown stays quiet.

use std::collections::{HashMap, HashSet};

use autopopup_domain::id::TriggerId;
use autopopup_domain::time::{self, Timestamp};
use autopopup_domain::trigger::Trigger;

/// Classification of one trigger's match result on a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// First time this trigger was observed. Never fires.
    First,
    /// Condition does not hold.
    NoMatch,
    /// Condition held on the previous pass too.
    Sustained,
    /// Condition went from false to true.
    Rising,
}

/// Why a rising edge was not allowed to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// First evaluated pass since the engine was (re)enabled or reloaded.
    FirstPass,
    /// Inside the startup window that follows the first loaded snapshot.
    StartupWindow { remaining_ms: i64 },
    /// Same trigger opened (or tried to open) too recently.
    Cooldown { remaining_ms: i64 },
}

/// Match history owned by the engine for its whole lifetime.
#[derive(Debug, Default)]
pub struct TriggerHistory {
    matched: HashMap<TriggerId, bool>,
    seen: HashSet<TriggerId>,
    last_opened: HashMap<TriggerId, Timestamp>,
    suppress_until: Option<Timestamp>,
    initialized: bool,
}

impl TriggerHistory {
    /// Record the current match result and classify the transition.
    ///
    /// The stored value is always updated, even when the edge will be
    /// suppressed later on.
    pub fn observe(&mut self, id: &TriggerId, matches_now: bool) -> Edge {
        let matched_before = self
            .matched
            .insert(id.clone(), matches_now)
            .unwrap_or(false);
        if self.seen.insert(id.clone()) {
            return Edge::First;
        }
        match (matched_before, matches_now) {
            (_, false) => Edge::NoMatch,
            (true, true) => Edge::Sustained,
            (false, true) => Edge::Rising,
        }
    }

    /// Open the startup window, unless one is already running.
    pub fn start_window(&mut self, now: Timestamp, window_ms: u64) {
        if self.suppress_until.is_none() {
            self.suppress_until = Some(time::add_ms(now, window_ms));
        }
    }

    /// Check whether a rising edge of `trigger` must be held back at `now`.
    #[must_use]
    pub fn suppression(&self, trigger: &Trigger, now: Timestamp) -> Option<Suppression> {
        if !self.initialized {
            return Some(Suppression::FirstPass);
        }
        if let Some(until) = self.suppress_until
            && now < until
        {
            return Some(Suppression::StartupWindow {
                remaining_ms: time::elapsed_ms(now, until),
            });
        }
        if let Some(last) = self.last_opened.get(&trigger.id) {
            let elapsed = time::elapsed_ms(*last, now);
            let cooldown = i64::try_from(trigger.cooldown_ms).unwrap_or(i64::MAX);
            if elapsed < cooldown {
                return Some(Suppression::Cooldown {
                    remaining_ms: cooldown - elapsed,
                });
            }
        }
        None
    }

    /// Mark the end of an evaluated pass.
    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    /// Start the cooldown of `id`, whether or not the popup opened.
    pub fn stamp_opened(&mut self, id: TriggerId, now: Timestamp) {
        self.last_opened.insert(id, now);
    }

    /// Forget match results, first observations and the startup window.
    ///
    /// Cooldown stamps survive. Returns `true` if anything was cleared.
    pub fn reset_transient(&mut self) -> bool {
        let dirty = !self.matched.is_empty()
            || !self.seen.is_empty()
            || self.suppress_until.is_some()
            || self.initialized;
        self.matched.clear();
        self.seen.clear();
        self.suppress_until = None;
        self.initialized = false;
        dirty
    }

    /// Forget everything, cooldowns included.
    pub fn clear(&mut self) {
        self.reset_transient();
        self.last_opened.clear();
    }

    /// Match result of `id` on the latest pass it was evaluated in.
    #[must_use]
    pub fn matched(&self, id: &TriggerId) -> Option<bool> {
        self.matched.get(id).copied()
    }

    #[must_use]
    pub fn has_seen(&self, id: &TriggerId) -> bool {
        self.seen.contains(id)
    }

    #[must_use]
    pub fn last_opened(&self, id: &TriggerId) -> Option<Timestamp> {
        self.last_opened.get(id).copied()
    }

    #[must_use]
    pub fn suppress_until(&self) -> Option<Timestamp> {
        self.suppress_until
    }
}
