//! Auto-close scheduler: a single, replaceable timer that closes popups.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use autopopup_domain::event::{Event, EventType};
use autopopup_domain::id::TriggerId;

use crate::ports::{EventPublisher, PopupPresenter};

struct ArmedTimer {
    handle: AbortHandle,
    deadline: Instant,
}

/// Holds at most one armed auto-close timer.
///
/// Arming replaces the previous timer. Dropping the scheduler aborts the
/// armed timer, so no close callback outlives its owner.
pub struct AutoCloseScheduler<P, B> {
    presenter: Arc<P>,
    publisher: Arc<B>,
    runtime: Option<Handle>,
    armed: Option<ArmedTimer>,
}

impl<P, B> AutoCloseScheduler<P, B>
where
    P: PopupPresenter,
    B: EventPublisher,
{
    /// Create a scheduler spawning its timers on the current tokio runtime.
    ///
    /// Outside a runtime the scheduler is inert: [`arm`](Self::arm) logs
    /// and does nothing.
    pub fn new(presenter: Arc<P>, publisher: Arc<B>) -> Self {
        Self {
            presenter,
            publisher,
            runtime: Handle::try_current().ok(),
            armed: None,
        }
    }

    /// Cancel any armed timer, then close all popups after `delay`.
    pub fn arm(&mut self, delay: Duration, trigger_id: TriggerId) -> bool {
        self.cancel();

        let Some(runtime) = &self.runtime else {
            tracing::warn!(trigger_id = %trigger_id, "no async runtime, auto-close skipped");
            return false;
        };

        let deadline = Instant::now() + delay;
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let presenter = Arc::clone(&self.presenter);
        let publisher = Arc::clone(&self.publisher);
        let task = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tracing::info!(trigger_id = %trigger_id, "auto-closing popups");
            presenter.close_all();
            publisher.publish(Event::new(
                EventType::AutoClosed,
                Some(trigger_id),
                serde_json::json!({ "delay_ms": delay_ms }),
            ));
        });
        self.armed = Some(ArmedTimer {
            handle: task.abort_handle(),
            deadline,
        });
        true
    }

    /// Abort the armed timer, if any. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.armed.take() {
            Some(timer) => {
                let pending = !timer.handle.is_finished();
                timer.handle.abort();
                pending
            }
            None => false,
        }
    }

    /// Whether a timer is armed and has not fired yet.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline().is_some()
    }

    /// When the armed timer fires, if one is pending.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.armed
            .as_ref()
            .filter(|timer| !timer.handle.is_finished())
            .map(|timer| timer.deadline)
    }
}

impl<P, B> Drop for AutoCloseScheduler<P, B> {
    fn drop(&mut self) {
        if let Some(timer) = self.armed.take() {
            timer.handle.abort();
        }
    }
}
