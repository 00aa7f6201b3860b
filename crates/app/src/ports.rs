//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the popup-trigger engine and the outside
//! world (the condition language, the UI, the wall clock, event consumers).
//! They are defined here (in `app`) so that both the engine and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod card_settings;
pub mod clock;
pub mod condition;
pub mod event_bus;
pub mod presenter;

pub use card_settings::CardSettingsResolver;
pub use clock::{Clock, SystemClock};
pub use condition::ConditionEvaluator;
pub use event_bus::EventPublisher;
pub use presenter::PopupPresenter;
