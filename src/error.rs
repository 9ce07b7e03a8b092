//! Error types for session setup and the render loop.

use thiserror::Error;

use crate::telemetry::Status;

/// Failures while bringing up a render session.
///
/// None of these are retried. The caller turns them into a [`Status`] with
/// [`InitError::status`] and the session simply never reaches `Ready`.
#[derive(Error, Debug)]
pub enum InitError {
    /// The host has no usable graphics API at all.
    #[error("WebGPU is not supported in this environment")]
    Unsupported,

    /// A graphics API exists but no adapter could be acquired.
    #[error("no compatible GPU adapter is available")]
    NoAdapter,

    /// The drawable surface could not be turned into a GPU context.
    #[error("could not create a WebGPU context for the surface: {0}")]
    ContextUnavailable(String),

    /// The adapter refused to hand out a logical device.
    #[error("could not acquire a logical device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// The embedded shader program failed validation.
    #[error("shader compilation failed: {0}")]
    ShaderCompilation(String),

    /// The render pipeline object could not be created.
    #[error("render pipeline creation failed: {0}")]
    PipelineCreation(String),

    /// The host cancelled initialization before it finished.
    #[error("initialization was cancelled")]
    Cancelled,
}

impl InitError {
    /// The status shown to the presentation layer for this failure.
    pub fn status(&self) -> Status {
        match self {
            InitError::Unsupported => Status::Unsupported,
            InitError::NoAdapter => Status::NoAdapter,
            InitError::ContextUnavailable(_) => Status::ContextUnavailable,
            InitError::Cancelled => Status::Initializing,
            other => Status::Failed(other.to_string()),
        }
    }
}

/// Failures while producing a single frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The surface is gone, usually because the window was destroyed.
    #[error("the drawable surface was lost")]
    SurfaceLost,

    /// The surface needs to be reconfigured before the next frame.
    #[error("the drawable surface is outdated")]
    Outdated,

    /// Acquiring the next surface texture timed out.
    #[error("timed out acquiring the next surface texture")]
    Timeout,

    /// The device ran out of memory.
    #[error("out of GPU memory")]
    OutOfMemory,
}

impl FrameError {
    /// Whether the loop must stop instead of trying again next tick.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FrameError::SurfaceLost | FrameError::OutOfMemory)
    }
}

impl From<wgpu::SurfaceError> for FrameError {
    fn from(error: wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Timeout => FrameError::Timeout,
            wgpu::SurfaceError::Outdated => FrameError::Outdated,
            wgpu::SurfaceError::OutOfMemory => FrameError::OutOfMemory,
            _ => FrameError::SurfaceLost,
        }
    }
}
