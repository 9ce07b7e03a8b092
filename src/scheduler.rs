//! # Frame Scheduler
//!
//! Drives a render target once per display refresh and owns the session lifecycle:
//!
//! ```text
//! Uninitialized --attach--> Ready --start--> Running --cancel / fatal error--> Stopped
//! ```
//!
//! The host calls [`FrameScheduler::tick`] from its redraw callback. Each tick:
//!
//! 1. Stops the loop if the [`CancellationToken`] was raised. No further frame is
//!    submitted after that, even if a redraw was already queued.
//! 2. Reads elapsed time from the injected [`Clock`].
//! 3. Asks the [`FrameTarget`] to draw and present a frame.
//! 4. Counts the frame and, once per FPS window, publishes a sample through the
//!    [`RenderObserver`].
//!
//! Surface timeouts and outdated surfaces skip one frame. A lost surface or an
//! out-of-memory error stops the loop for good. Ticks take `&mut self`, so two can
//! never run at once.

use std::sync::Arc;

use web_time::Duration;

use crate::cancel::CancellationToken;
use crate::clock::Clock;
use crate::error::{FrameError, InitError};
use crate::frame_counter::FrameCounter;
use crate::renderer::RenderSession;
use crate::telemetry::RenderObserver;

/// Something that can draw one frame for a point in time.
pub trait FrameTarget {
    /// Draws and presents the frame for `elapsed` time since the session started.
    fn render_frame(&mut self, elapsed: Duration) -> Result<(), FrameError>;

    /// Adapts to a new drawable size.
    fn resize(&mut self, width: u32, height: u32);
}

/// Lifecycle of a render session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No target has been attached yet.
    #[default]
    Uninitialized,
    /// A target is attached but the loop has not started.
    Ready,
    /// Frames are being drawn.
    Running,
    /// The loop ended. Terminal.
    Stopped,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was submitted. Carries the FPS sample if this frame closed a window.
    Rendered { fps: Option<u32> },
    /// No frame was submitted this tick; the loop keeps going.
    Skipped(FrameError),
    /// The loop is not running yet.
    Idle,
    /// The loop has stopped.
    Stopped,
}

/// Per-tick driver of a [`FrameTarget`].
pub struct FrameScheduler<T: FrameTarget = RenderSession> {
    state: SessionState,

    target: Option<T>,

    clock: Box<dyn Clock>,

    frame_counter: FrameCounter,

    fps_window: Duration,

    observer: Arc<dyn RenderObserver>,

    cancel: CancellationToken,
}

impl<T: FrameTarget> FrameScheduler<T> {
    pub fn new(
        clock: Box<dyn Clock>,
        fps_window: Duration,
        observer: Arc<dyn RenderObserver>,
        cancel: CancellationToken,
    ) -> Self {
        let start = clock.elapsed();
        Self {
            state: SessionState::Uninitialized,
            target: None,
            clock,
            frame_counter: FrameCounter::new(fps_window, start),
            fps_window,
            observer,
            cancel,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// A handle that stops this loop when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    /// Frames submitted since the loop started.
    pub fn total_frames(&self) -> u64 {
        self.frame_counter.total_frames()
    }

    /// Hands over an initialized target. Moves `Uninitialized` to `Ready`.
    ///
    /// A target attached after cancellation is dropped straight away.
    pub fn attach(&mut self, target: T) {
        if self.state != SessionState::Uninitialized {
            log::warn!("Ignoring render target attached in state {:?}", self.state);
            return;
        }
        if self.cancel.is_cancelled() {
            self.stop("cancelled before the loop started");
            return;
        }
        self.target = Some(target);
        self.state = SessionState::Ready;
    }

    /// Takes the outcome of session initialization.
    ///
    /// A session is attached and the loop started. A failure ends the loop in
    /// `Stopped`, so the host stops scheduling redraws. Returns whether the loop is
    /// running.
    pub fn finish_initialization(&mut self, result: Result<T, InitError>) -> bool {
        match result {
            Ok(target) => {
                self.attach(target);
                self.start()
            }
            Err(error) => {
                log::warn!("Render session unavailable: {error}");
                self.stop(&error.to_string());
                false
            }
        }
    }

    /// Starts the loop. Moves `Ready` to `Running` and opens the first FPS window.
    pub fn start(&mut self) -> bool {
        if self.state != SessionState::Ready {
            return false;
        }
        self.frame_counter = FrameCounter::new(self.fps_window, self.clock.elapsed());
        self.state = SessionState::Running;
        log::info!("Render loop started");
        true
    }

    /// Runs one tick of the loop.
    pub fn tick(&mut self) -> TickOutcome {
        match self.state {
            SessionState::Running => {}
            SessionState::Stopped => return TickOutcome::Stopped,
            SessionState::Uninitialized | SessionState::Ready => return TickOutcome::Idle,
        }

        if self.cancel.is_cancelled() {
            self.stop("cancelled");
            return TickOutcome::Stopped;
        }

        let Some(target) = self.target.as_mut() else {
            self.stop("render target missing");
            return TickOutcome::Stopped;
        };

        let elapsed = self.clock.elapsed();

        match target.render_frame(elapsed) {
            Ok(()) => {
                let fps = self.frame_counter.tick(elapsed);
                if let Some(fps) = fps {
                    self.observer.on_fps_sample(fps);
                }
                TickOutcome::Rendered { fps }
            }
            Err(error) if error.is_fatal() => {
                log::error!("Stopping render loop: {error}");
                self.stop(&error.to_string());
                TickOutcome::Stopped
            }
            Err(error) => {
                log::debug!("Skipping frame: {error}");
                TickOutcome::Skipped(error)
            }
        }
    }

    /// Forwards a new drawable size to the target.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(target) = self.target.as_mut() {
            target.resize(width, height);
        }
    }

    /// Stops the loop and releases the target. Idempotent.
    pub fn stop(&mut self, reason: &str) {
        if self.state == SessionState::Stopped {
            return;
        }
        self.cancel.cancel();
        self.target = None;
        self.state = SessionState::Stopped;
        self.observer.on_stopped(reason);
    }
}
