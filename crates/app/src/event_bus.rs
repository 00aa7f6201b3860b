//! Broadcast fan-out of engine events to in-process listeners.

use tokio::sync::broadcast;

use autopopup_domain::event::Event;

use crate::ports::EventPublisher;

/// [`EventPublisher`] over a tokio [`broadcast`] channel.
///
/// The engine never waits on listeners: an event published while nobody
/// listens is dropped, and a listener that falls more than `capacity`
/// events behind sees `Lagged` instead of stalling a pass.
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Listen to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) {
        tracing::trace!(event_type = %event.event_type, "publishing engine event");
        // only fails with zero receivers
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopopup_domain::event::EventType;
    use autopopup_domain::id::TriggerId;

    fn fired(trigger: &str) -> Event {
        Event::new(
            EventType::TriggerFired,
            Some(TriggerId::new(trigger)),
            serde_json::json!({}),
        )
    }

    #[tokio::test]
    async fn should_deliver_event_to_subscriber() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(fired("home|cover-garage"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event_type, EventType::TriggerFired);
        assert_eq!(received.trigger_id.unwrap().as_str(), "home|cover-garage");
    }

    #[tokio::test]
    async fn should_deliver_event_to_multiple_subscribers() {
        let bus = InProcessEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Event::new(EventType::AutoClosed, None, serde_json::json!({})));

        assert_eq!(rx1.recv().await.unwrap().event_type, EventType::AutoClosed);
        assert_eq!(rx2.recv().await.unwrap().event_type, EventType::AutoClosed);
    }

    #[test]
    fn should_not_panic_when_no_subscribers() {
        let bus = InProcessEventBus::new(16);
        bus.publish(fired("home|room-kitchen"));
    }

    #[tokio::test]
    async fn should_not_deliver_events_published_before_subscription() {
        let bus = InProcessEventBus::new(16);
        bus.publish(fired("home|early"));

        let mut rx = bus.subscribe();
        bus.publish(fired("home|late"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.trigger_id.unwrap().as_str(), "home|late");
    }

    #[tokio::test]
    async fn should_report_lag_instead_of_blocking_publisher() {
        let bus = InProcessEventBus::new(2);
        let mut rx = bus.subscribe();

        for n in 0..5 {
            bus.publish(fired(&format!("home|card-{n}")));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        let next = rx.recv().await.unwrap();
        assert_eq!(next.trigger_id.unwrap().as_str(), "home|card-3");
    }
}
