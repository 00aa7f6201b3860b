//! # autopopup-app
//!
//! Application layer: the popup-trigger engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `ConditionEvaluator`: the auto-popup rule language (opaque to the engine)
//!   - `PopupPresenter`: the UI surface that shows and closes popups
//!   - `CardSettingsResolver`: per-card configuration lookup
//!   - `Clock`: source of "now" for evaluation passes
//!   - `EventPublisher`: sink for engine events
//! - Provide the engine components:
//!   - `TriggerCatalog`: live triggers of the active page
//!   - `TriggerHistory`: edge detection and suppression (startup window, cooldown)
//!   - `PopupDispatcher`: routes a winning card to its popup
//!   - `AutoCloseScheduler`: the single, replaceable auto-close timer
//!   - `PopupTriggerEngine`: runs one evaluation pass per input change
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `autopopup-domain` only (plus `tokio` for the timer and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod auto_close;
pub mod dispatcher;
pub mod event_bus;
pub mod popup_engine;
pub mod ports;
pub mod trigger_catalog;
pub mod trigger_history;
