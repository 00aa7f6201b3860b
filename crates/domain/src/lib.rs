//! # autopopup-domain
//!
//! Pure domain model for the dashboard auto-popup engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **Dashboard** (pages, the cards on them, per-card settings)
//! - Define the **Device snapshot** (entity states the dashboard observes)
//! - Define **Triggers** (a card paired with an auto-popup condition) and
//!   the normalization of their cooldown / auto-close windows
//! - Define **Popup targets** (what kind of popup a card opens)
//! - Define **Events** emitted while the engine runs
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod condition;
pub mod dashboard;
pub mod entity;
pub mod event;
pub mod popup;
pub mod settings;
pub mod trigger;
