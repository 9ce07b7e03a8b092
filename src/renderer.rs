//! # Render Session Module
//!
//! [`RenderSession`] owns everything one drawable needs: the [`Gpu`] context, the
//! compiled [`PipelineState`], the uploaded [`Scene`], the depth attachment and the
//! [`Animation`] that produces each frame's MVP matrix.
//!
//! ## Initialization
//!
//! [`RenderSession::initialize`] runs device initialization, pipeline creation and
//! resource upload in that order. The [`CancellationToken`] is checked between the
//! asynchronous steps, so a host that goes away mid-setup gets
//! [`InitError::Cancelled`] back and no further GPU objects are created. Status changes
//! are reported to the [`RenderObserver`]: `Initializing` first, then `Ready` or the
//! status of the failure.
//!
//! ## Per frame
//!
//! [`RenderSession::render_frame`] does the GPU half of a tick:
//!
//! 1. Compute the MVP for the elapsed time and current aspect ratio, narrow it and
//!    stage it into the uniform buffer.
//! 2. Acquire the next surface texture.
//! 3. Record one render pass: clear color and depth 1.0, then the indexed draw.
//! 4. Submit and present.
//!
//! Frame pacing, FPS measurement and the stop policy live in
//! [`FrameScheduler`](crate::scheduler::FrameScheduler).

use web_time::Duration;

use crate::animation::Animation;
use crate::cancel::CancellationToken;
use crate::config::RenderConfig;
use crate::error::{FrameError, InitError};
use crate::geometry::Geometry;
use crate::gpu::{Gpu, SurfaceRequest};
use crate::pipeline::PipelineState;
use crate::scene::{create_depth_texture, Scene};
use crate::scheduler::FrameTarget;
use crate::telemetry::{RenderObserver, Status};
use crate::uniform_buffer::UniformBuffer;

/// A fully initialized render session bound to one drawable.
pub struct RenderSession {
    gpu: Gpu,

    pipeline: PipelineState,

    scene: Scene,

    depth_texture_view: wgpu::TextureView,

    animation: Animation,

    clear_color: wgpu::Color,
}

impl RenderSession {
    /// Brings up a session for `request` drawing `geometry`.
    pub async fn initialize(
        request: SurfaceRequest,
        geometry: Geometry,
        config: &RenderConfig,
        observer: &dyn RenderObserver,
        cancel: &CancellationToken,
    ) -> Result<Self, InitError> {
        let api_available = request.api_available;
        drive_initialization(
            api_available,
            observer,
            cancel,
            Self::build(request, &geometry, config, observer, cancel),
        )
        .await
    }

    async fn build(
        request: SurfaceRequest,
        geometry: &Geometry,
        config: &RenderConfig,
        observer: &dyn RenderObserver,
        cancel: &CancellationToken,
    ) -> Result<Self, InitError> {
        let gpu = Gpu::new_async(request, config, observer).await?;

        ensure_not_cancelled(cancel)?;
        let pipeline = PipelineState::new(&gpu.device, gpu.surface_format, &geometry.shader).await?;
        observer.on_pipeline_built(pipeline.color_format);

        ensure_not_cancelled(cancel)?;
        let scene = Scene::new(&gpu.device, geometry, &pipeline);

        let (width, height) = gpu.size();
        let depth_texture_view = create_depth_texture(&gpu.device, width, height);

        Ok(Self {
            gpu,
            pipeline,
            scene,
            depth_texture_view,
            animation: Animation::from_config(config),
            clear_color: config.clear_color(),
        })
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Resizes the surface and the depth attachment. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.gpu.resize(width, height) {
            self.depth_texture_view = create_depth_texture(&self.gpu.device, width, height);
        }
    }

    /// Draws and presents one frame for `elapsed` time since the session started.
    ///
    /// An outdated surface is reconfigured before the error is returned, so the next
    /// frame can go through.
    pub fn render_frame(&mut self, elapsed: Duration) -> Result<(), FrameError> {
        let mvp = self.animation.mvp(elapsed, self.gpu.aspect_ratio());
        self.scene
            .update(&self.gpu.queue, UniformBuffer::from_matrix(&mvp));

        let surface_texture = match self.gpu.acquire_frame() {
            Ok(surface_texture) => surface_texture,
            Err(FrameError::Outdated) => {
                self.gpu.reconfigure();
                return Err(FrameError::Outdated);
            }
            Err(error) => return Err(error),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let commands = record_frame(
            &self.gpu.device,
            &surface_texture_view,
            &self.depth_texture_view,
            self.clear_color,
            &self.pipeline,
            &self.scene,
        );

        self.gpu.queue.submit(std::iter::once(commands));

        let suboptimal = surface_texture.suboptimal;
        surface_texture.present();
        if suboptimal {
            self.gpu.reconfigure();
        }
        Ok(())
    }
}

impl FrameTarget for RenderSession {
    fn render_frame(&mut self, elapsed: Duration) -> Result<(), FrameError> {
        RenderSession::render_frame(self, elapsed)
    }

    fn resize(&mut self, width: u32, height: u32) {
        RenderSession::resize(self, width, height);
    }
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), InitError> {
    if cancel.is_cancelled() {
        Err(InitError::Cancelled)
    } else {
        Ok(())
    }
}

/// Runs the initialization `steps` with status reporting around them.
///
/// Reports `Initializing`, then refuses without polling `steps` when the host has no
/// graphics API or the token is already cancelled. A token cancelled while the steps
/// ran discards their result. Success reports `Ready`; failures report their status,
/// except cancellation, which leaves the status at `Initializing`.
pub async fn drive_initialization<T>(
    api_available: bool,
    observer: &dyn RenderObserver,
    cancel: &CancellationToken,
    steps: impl std::future::Future<Output = Result<T, InitError>>,
) -> Result<T, InitError> {
    observer.on_status(&Status::Initializing);

    let result = if !api_available {
        Err(InitError::Unsupported)
    } else if let Err(error) = ensure_not_cancelled(cancel) {
        Err(error)
    } else {
        match steps.await {
            Ok(value) => ensure_not_cancelled(cancel).map(|()| value),
            Err(error) => Err(error),
        }
    };

    match &result {
        Ok(_) => observer.on_status(&Status::Ready),
        Err(InitError::Cancelled) => log::info!("Initialization cancelled"),
        Err(error) => observer.on_status(&error.status()),
    }
    result
}


/// Records one frame: a single pass that clears `color_view` to `clear_color` and the
/// depth attachment to 1.0, then draws `scene`.
///
/// The uniform buffer must already hold the frame's MVP.
pub fn record_frame(
    device: &wgpu::Device,
    color_view: &wgpu::TextureView,
    depth_view: &wgpu::TextureView,
    clear_color: wgpu::Color,
    pipeline: &PipelineState,
    scene: &Scene,
) -> wgpu::CommandBuffer {
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Render Encoder"),
    });

    encoder.insert_debug_marker("Render scene");

    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        scene.render(&mut render_pass, pipeline);
    }

    encoder.finish()
}
