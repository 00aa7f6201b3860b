//! Event bus port: publish engine events to interested subscribers.

use std::sync::Arc;

use autopopup_domain::event::Event;

/// Publishes engine events to all current subscribers.
///
/// Publishing is fire-and-forget: it never fails and never blocks.
pub trait EventPublisher: Send + Sync + 'static {
    fn publish(&self, event: Event);
}

impl<T: EventPublisher> EventPublisher for Arc<T> {
    fn publish(&self, event: Event) {
        (**self).publish(event);
    }
}
