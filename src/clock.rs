//! Monotonic time sources for the render loop.
//!
//! The loop only ever asks "how long since the session started?". Hosts hand in a
//! [`SystemClock`]; tests and hosts with their own frame timestamps use [`ManualClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use web_time::{Duration, Instant};

/// A monotonic clock measured from its own origin.
pub trait Clock {
    /// Time elapsed since the clock's origin. Never decreases.
    fn elapsed(&self) -> Duration;
}

/// Wall-clock time since construction.
///
/// Backed by `web_time::Instant`, so it reads `performance.now()` in the browser and
/// `std::time::Instant` elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so one handle can be given to a session while another
/// advances it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock to `elapsed`.
    ///
    /// # Panics
    ///
    /// Panics if `elapsed` is earlier than the current reading. The reading is left
    /// unchanged in that case.
    pub fn set(&self, elapsed: Duration) {
        let nanos = elapsed.as_nanos() as u64;
        let update = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |previous| {
                (nanos >= previous).then_some(nanos)
            });
        if let Err(previous) = update {
            panic!("manual clock moved backwards from {previous}ns to {nanos}ns");
        }
    }

    /// Moves the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.nanos
            .fetch_add(step.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}
