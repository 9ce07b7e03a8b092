//! Frames-per-second measurement over a sliding one-second window.

use web_time::Duration;

/// Counts presented frames and publishes one sample per elapsed window.
///
/// Timestamps are durations since session start, as reported by a
/// [`Clock`](crate::clock::Clock).
#[derive(Debug, Clone)]
pub struct FrameCounter {
    window: Duration,
    window_start: Duration,
    frames_in_window: u32,
    total_frames: u64,
}

impl FrameCounter {
    /// The default sampling window.
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(1000);

    /// Creates a counter whose first window opens at `start`.
    pub fn new(window: Duration, start: Duration) -> Self {
        debug_assert!(!window.is_zero());
        Self {
            window,
            window_start: start,
            frames_in_window: 0,
            total_frames: 0,
        }
    }

    /// Records one frame at `now`.
    ///
    /// Returns the frame count of the window when at least one full window has passed
    /// since it opened; the next window then opens at `now`.
    pub fn tick(&mut self, now: Duration) -> Option<u32> {
        self.frames_in_window += 1;
        self.total_frames += 1;

        if now.saturating_sub(self.window_start) < self.window {
            return None;
        }

        let sample = self.frames_in_window;
        self.frames_in_window = 0;
        self.window_start = now;
        Some(sample)
    }

    /// Frames recorded since the counter was created.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Frames recorded in the currently open window.
    pub fn frames_in_window(&self) -> u32 {
        self.frames_in_window
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW, Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publishes_only_after_a_full_window() {
        let mut counter = FrameCounter::default();
        assert_eq!(counter.tick(Duration::from_millis(500)), None);
        assert_eq!(counter.tick(Duration::from_millis(999)), None);
        assert_eq!(counter.tick(Duration::from_millis(1000)), Some(3));
        assert_eq!(counter.frames_in_window(), 0);
        assert_eq!(counter.total_frames(), 3);
    }

    #[test]
    fn next_window_opens_at_the_publishing_tick() {
        let mut counter = FrameCounter::default();
        assert_eq!(counter.tick(Duration::from_millis(1200)), Some(1));
        assert_eq!(counter.tick(Duration::from_millis(2100)), None);
        assert_eq!(counter.tick(Duration::from_millis(2200)), Some(2));
    }

    #[test]
    fn long_stall_yields_a_single_sample() {
        let mut counter = FrameCounter::default();
        counter.tick(Duration::from_millis(100));
        assert_eq!(counter.tick(Duration::from_secs(10)), Some(2));
        assert_eq!(counter.tick(Duration::from_millis(10_500)), None);
    }
}
