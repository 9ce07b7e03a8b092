//! # Telemetry
//!
//! The observable state a render session exposes to whatever presents it, and the hook
//! the session calls at its lifecycle points.
//!
//! - [`Status`]: where initialization stands, with the text shown to the user.
//! - [`Telemetry`]: a cheap, cloneable handle holding the current status and the latest
//!   frames-per-second sample. Readers never block the render loop for longer than a
//!   status swap; the FPS value is a plain atomic.
//! - [`RenderObserver`]: lifecycle callbacks (status change, adapter acquired, pipeline
//!   built, FPS sample, loop stopped). [`LogObserver`] forwards them to the `log` crate and
//!   [`Telemetry`] records them. A pair of observers is itself an observer.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Initialization status of a render session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// Setup is in progress.
    #[default]
    Initializing,
    /// The host offers no graphics API.
    Unsupported,
    /// No GPU adapter could be acquired.
    NoAdapter,
    /// The surface could not be turned into a GPU context.
    ContextUnavailable,
    /// The session is drawing.
    Ready,
    /// Shader or pipeline creation failed.
    Failed(String),
}

impl Status {
    /// Whether this status ends initialization for good.
    pub fn is_error(&self) -> bool {
        !matches!(self, Status::Initializing | Status::Ready)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Initializing => f.write_str("Initializing WebGPU..."),
            Status::Unsupported => f.write_str("Error: WebGPU is not supported."),
            Status::NoAdapter => f.write_str("Error: failed to get a GPU adapter."),
            Status::ContextUnavailable => f.write_str("Error: failed to get a WebGPU context."),
            Status::Ready => f.write_str("WebGPU initialized successfully!"),
            Status::Failed(message) => write!(f, "Error: {message}"),
        }
    }
}

/// Lifecycle hook called by the render session.
///
/// Every method has an empty default so observers only implement what they need.
pub trait RenderObserver {
    /// The session status changed.
    fn on_status(&self, _status: &Status) {}

    /// A GPU adapter was acquired.
    fn on_adapter_acquired(&self, _info: &wgpu::AdapterInfo) {}

    /// The render pipeline was built for the given color format.
    fn on_pipeline_built(&self, _format: wgpu::TextureFormat) {}

    /// A new frames-per-second sample was measured.
    fn on_fps_sample(&self, _fps: u32) {}

    /// The render loop stopped and will not submit again.
    fn on_stopped(&self, _reason: &str) {}
}

impl<A: RenderObserver, B: RenderObserver> RenderObserver for (A, B) {
    fn on_status(&self, status: &Status) {
        self.0.on_status(status);
        self.1.on_status(status);
    }

    fn on_adapter_acquired(&self, info: &wgpu::AdapterInfo) {
        self.0.on_adapter_acquired(info);
        self.1.on_adapter_acquired(info);
    }

    fn on_pipeline_built(&self, format: wgpu::TextureFormat) {
        self.0.on_pipeline_built(format);
        self.1.on_pipeline_built(format);
    }

    fn on_fps_sample(&self, fps: u32) {
        self.0.on_fps_sample(fps);
        self.1.on_fps_sample(fps);
    }

    fn on_stopped(&self, reason: &str) {
        self.0.on_stopped(reason);
        self.1.on_stopped(reason);
    }
}

/// Forwards lifecycle events to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RenderObserver for LogObserver {
    fn on_status(&self, status: &Status) {
        if status.is_error() {
            log::error!("{status}");
        } else {
            log::info!("{status}");
        }
    }

    fn on_adapter_acquired(&self, info: &wgpu::AdapterInfo) {
        log::info!(
            "Adapter acquired: {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );
    }

    fn on_pipeline_built(&self, format: wgpu::TextureFormat) {
        log::info!("Render pipeline built for {format:?}");
    }

    fn on_fps_sample(&self, fps: u32) {
        log::debug!("FPS: {fps}");
    }

    fn on_stopped(&self, reason: &str) {
        log::info!("Render loop stopped: {reason}");
    }
}

#[derive(Debug, Default)]
struct TelemetryState {
    status: Mutex<Status>,
    fps: AtomicU32,
}

/// Shared status and FPS, read by the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    state: Arc<TelemetryState>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current status.
    pub fn status(&self) -> Status {
        self.state
            .status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The most recent frames-per-second sample, `0` before the first one.
    pub fn fps(&self) -> u32 {
        self.state.fps.load(Ordering::Relaxed)
    }

    pub fn set_status(&self, status: Status) {
        *self
            .state
            .status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = status;
    }

    pub fn set_fps(&self, fps: u32) {
        self.state.fps.store(fps, Ordering::Relaxed);
    }
}

impl RenderObserver for Telemetry {
    fn on_status(&self, status: &Status) {
        self.set_status(status.clone());
    }

    fn on_fps_sample(&self, fps: u32) {
        self.set_fps(fps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        samples: Mutex<Vec<u32>>,
    }

    impl RenderObserver for &Counting {
        fn on_fps_sample(&self, fps: u32) {
            self.samples.lock().unwrap().push(fps);
        }
    }

    #[test]
    fn telemetry_starts_initializing_with_zero_fps() {
        let telemetry = Telemetry::new();
        assert_eq!(telemetry.status(), Status::Initializing);
        assert_eq!(telemetry.fps(), 0);
    }

    #[test]
    fn clones_share_state() {
        let telemetry = Telemetry::new();
        let reader = telemetry.clone();
        telemetry.on_status(&Status::Ready);
        telemetry.on_fps_sample(59);
        assert_eq!(reader.status(), Status::Ready);
        assert_eq!(reader.fps(), 59);
    }

    #[test]
    fn pairs_notify_both_observers() {
        let telemetry = Telemetry::new();
        let counting = Counting::default();
        let pair = (telemetry.clone(), &counting);
        pair.on_fps_sample(60);
        pair.on_fps_sample(61);
        assert_eq!(telemetry.fps(), 61);
        assert_eq!(*counting.samples.lock().unwrap(), vec![60, 61]);
    }

    #[test]
    fn status_text_and_error_classification() {
        assert_eq!(Status::Initializing.to_string(), "Initializing WebGPU...");
        assert_eq!(Status::Unsupported.to_string(), "Error: WebGPU is not supported.");
        assert!(Status::NoAdapter.is_error());
        assert!(Status::Failed("boom".into()).is_error());
        assert!(!Status::Ready.is_error());
        assert!(!Status::Initializing.is_error());
    }
}
