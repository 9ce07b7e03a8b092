//! # Tetrahedron Renderer Library
//!
//! A minimal real-time 3-D demo: a colored tetrahedron tumbling about two axes, drawn
//! every display refresh with `wgpu`, natively or in the browser. A build with the
//! `minimal-triangle` feature draws a static flat triangle instead.
//!
//! ## Modules
//!
//! - [`matrix`]: double-precision 4x4 matrices: perspective, translation, axis
//!   rotations, composition and narrowing to the GPU's single precision.
//! - [`animation`]: elapsed time to the frame's model-view-projection matrix.
//! - [`gpu`]: adapter, device and surface setup.
//! - [`pipeline`]: shader compilation and the render pipeline.
//! - [`scene`]: vertex, index, uniform and depth resources, and the draw call.
//! - [`renderer`]: [`RenderSession`], the per-drawable aggregate that draws a frame.
//! - [`scheduler`]: [`FrameScheduler`], the per-tick loop with FPS measurement and
//!   the session lifecycle.
//! - [`telemetry`]: status and FPS exposed to the presentation layer, plus the
//!   [`RenderObserver`] hook.
//! - [`app`]: the `winit` host.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() -> Result<(), winit::error::EventLoopError> {
//!     tetra_demo::run()
//! }
//! ```
//!
//! ## Configuration
//!
//! Natively, a JSON file named by the `TETRA_DEMO_CONFIG` environment variable can
//! override the camera, rotation speeds, clear color, FPS window and surface settings.
//! See [`RenderConfig`]. Log output follows `RUST_LOG`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod animation;
pub mod app;
pub mod cancel;
pub mod clock;
pub mod config;
pub mod error;
pub mod frame_counter;
pub mod geometry;
pub mod gpu;
pub mod logging;
pub mod matrix;
pub mod pipeline;
pub mod renderer;
pub mod scene;
pub mod scheduler;
pub mod shader;
pub mod telemetry;
pub mod uniform_binding;
pub mod uniform_buffer;
pub mod vertex;

pub use crate::animation::Animation;
pub use crate::app::App;
pub use crate::cancel::CancellationToken;
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::RenderConfig;
pub use crate::error::{FrameError, InitError};
pub use crate::frame_counter::FrameCounter;
pub use crate::geometry::Geometry;
pub use crate::gpu::{Gpu, SurfaceRequest};
pub use crate::logging::{init_logging, LoggingConfig};
pub use crate::matrix::{multiply, narrow, Matrix4};
pub use crate::pipeline::PipelineState;
pub use crate::renderer::RenderSession;
pub use crate::scene::Scene;
pub use crate::scheduler::{FrameScheduler, FrameTarget, SessionState, TickOutcome};
pub use crate::telemetry::{LogObserver, RenderObserver, Status, Telemetry};
pub use crate::uniform_binding::UniformBinding;
pub use crate::uniform_buffer::UniformBuffer;
pub use crate::vertex::Vertex;

/// Runs the demo on a native window until it is closed.
#[cfg(not(target_arch = "wasm32"))]
pub fn run() -> Result<(), winit::error::EventLoopError> {
    init_logging(LoggingConfig::default());

    let config = RenderConfig::from_env();
    let event_loop = winit::event_loop::EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)
}

/// Browser entry point: starts the demo on the page's `canvas` element.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    use winit::platform::web::EventLoopExtWebSys;

    init_logging(LoggingConfig::default());

    let event_loop = winit::event_loop::EventLoop::new()
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    event_loop.spawn_app(App::new(RenderConfig::default()));
    Ok(())
}
