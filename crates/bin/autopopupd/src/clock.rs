//! Engine clock anchored to the tokio timer.
//!
//! Engine time and auto-close timers then advance together, which keeps
//! scenario replays deterministic under a paused runtime.

use tokio::time::Instant;

use autopopup_app::ports::Clock;
use autopopup_domain::time::{self, Timestamp};

/// Wall-clock time at creation plus tokio time elapsed since.
pub struct TokioClock {
    wall_origin: Timestamp,
    origin: Instant,
}

impl TokioClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            wall_origin: time::now(),
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Timestamp {
        let elapsed = u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX);
        time::add_ms(self.wall_origin, elapsed)
    }
}
