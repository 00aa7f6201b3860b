//! # autopopup-adapter-virtual
//!
//! Demo adapters that let the popup-trigger engine run without a real
//! dashboard or home-automation backend.
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`StateRuleEvaluator`] | `ConditionEvaluator` | All-of state equality rules |
//! | [`VirtualPopupSurface`] | `PopupPresenter` | Records and logs opened popups |
//!
//! ## Dependency rule
//!
//! Depends on `autopopup-app` (port traits) and `autopopup-domain` only.

mod evaluator;
mod surface;

pub use evaluator::StateRuleEvaluator;
pub use surface::VirtualPopupSurface;
