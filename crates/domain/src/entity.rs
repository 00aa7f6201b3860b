//! Entity states as observed by the dashboard.
//!
//! The dashboard does not own entities; it receives a [`DeviceSnapshot`]
//! (entity id → [`EntityState`]) from the home-automation backend and
//! re-evaluates popup triggers whenever it changes.

mod attribute_value;
mod snapshot;
mod state;

pub use attribute_value::AttributeValue;
pub use snapshot::DeviceSnapshot;
pub use state::EntityState;
