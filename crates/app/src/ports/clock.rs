//! Clock port: where evaluation passes get "now" from.

use std::sync::Arc;

use autopopup_domain::time::{self, Timestamp};

/// Source of the current time for evaluation passes.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        time::now()
    }
}

impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_read_wall_clock() {
        let before = time::now();
        let now = SystemClock.now();
        assert!(now >= before);
        assert!(now <= time::now());
    }

    #[test]
    fn should_delegate_through_arc() {
        let clock = Arc::new(SystemClock);
        assert!(clock.now() <= time::now());
    }
}
