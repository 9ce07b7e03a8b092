//! # GPU Management Module
//!
//! The `gpu` module brings up the GPU context a render session draws with: the surface
//! bound to the drawable, the adapter, the logical device with its queue, and the
//! surface configuration.
//!
//! ## Overview
//!
//! [`Gpu::new_async`] runs the device-initialization sequence and stops at the first
//! failure, reporting it as an [`InitError`]:
//!
//! 1. Refuse immediately when the host reports no graphics API
//!    ([`InitError::Unsupported`]).
//! 2. Create the surface for the drawable ([`InitError::ContextUnavailable`]).
//! 3. Request an adapter compatible with that surface ([`InitError::NoAdapter`]).
//! 4. Request a logical device from it ([`InitError::RequestDevice`]).
//! 5. Configure the surface with the platform's preferred format and opaque alpha.
//!
//! Every step is attempted once. Nothing is retried.
//!
//! ## Resizing
//!
//! [`Gpu::resize`] reconfigures the surface for a new drawable size. Zero-sized
//! requests, sent by some platforms while a window is minimized, are ignored; the
//! previous configuration stays in place.
//!
//! ## Example Usage
//!
//! ```ignore
//! let request = SurfaceRequest::new(window.clone(), width, height);
//! let gpu = Gpu::new_async(request, &RenderConfig::default(), &LogObserver).await?;
//! ```

use crate::config::RenderConfig;
use crate::error::{FrameError, InitError};
use crate::telemetry::RenderObserver;

/// What the host hands over to start a session: a drawable and its size.
pub struct SurfaceRequest {
    /// The window or canvas to draw into.
    pub target: wgpu::SurfaceTarget<'static>,

    /// Drawable width in physical pixels.
    pub width: u32,

    /// Drawable height in physical pixels.
    pub height: u32,

    /// Whether the host exposes a graphics API at all.
    ///
    /// Natively this is always `true`. In the browser the host reports whether WebGPU
    /// (or WebGL, with the `webgl` feature) is present.
    pub api_available: bool,
}

impl SurfaceRequest {
    pub fn new(target: impl Into<wgpu::SurfaceTarget<'static>>, width: u32, height: u32) -> Self {
        Self {
            target: target.into(),
            width,
            height,
            api_available: true,
        }
    }

    pub fn with_api_available(mut self, available: bool) -> Self {
        self.api_available = available;
        self
    }
}

/// The GPU context of one render session.
pub struct Gpu {
    /// The surface bound to the drawable.
    pub surface: wgpu::Surface<'static>,

    /// Logical device all resources are created on.
    pub device: wgpu::Device,

    /// Queue for buffer writes and command submission.
    pub queue: wgpu::Queue,

    /// The active surface configuration. Its size is always non-zero.
    pub surface_config: wgpu::SurfaceConfiguration,

    /// Color format of the surface, and of the pipeline's color target.
    pub surface_format: wgpu::TextureFormat,

    /// Description of the adapter the device came from.
    pub adapter_info: wgpu::AdapterInfo,
}

impl Gpu {
    /// Width divided by height of the configured surface.
    pub fn aspect_ratio(&self) -> f64 {
        self.surface_config.width as f64 / self.surface_config.height.max(1) as f64
    }

    /// The configured surface size `(width, height)` in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Reconfigures the surface for a new size.
    ///
    /// Returns `false`, leaving the surface untouched, when either dimension is zero.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::debug!("Ignoring zero-sized resize to ({width}, {height})");
            return false;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        true
    }

    /// Applies the current configuration again, after the surface reported it is
    /// outdated.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Acquires the next surface texture to draw into.
    pub fn acquire_frame(&self) -> Result<wgpu::SurfaceTexture, FrameError> {
        self.surface.get_current_texture().map_err(FrameError::from)
    }

    /// Runs the device-initialization sequence for `request`.
    pub async fn new_async(
        request: SurfaceRequest,
        config: &RenderConfig,
        observer: &dyn RenderObserver,
    ) -> Result<Self, InitError> {
        if !request.api_available {
            return Err(InitError::Unsupported);
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface = instance
            .create_surface(request.target)
            .map_err(|error| InitError::ContextUnavailable(error.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference.into(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(InitError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        observer.on_adapter_acquired(&adapter_info);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Tetra Demo Device"),
                    memory_hints: wgpu::MemoryHints::default(),
                    required_features: wgpu::Features::empty(),
                    #[cfg(not(all(target_arch = "wasm32", feature = "webgl")))]
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    #[cfg(all(target_arch = "wasm32", feature = "webgl"))]
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);

        // The first reported format is the platform's preferred one.
        let surface_format = surface_capabilities.formats.first().copied().ok_or_else(|| {
            InitError::ContextUnavailable("the surface reports no supported formats".into())
        })?;

        let alpha_mode = if surface_capabilities
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::Opaque)
        {
            wgpu::CompositeAlphaMode::Opaque
        } else {
            surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };

        let requested_present_mode = config.present_mode();
        let present_mode = if surface_capabilities
            .present_modes
            .contains(&requested_present_mode)
            || requested_present_mode == wgpu::PresentMode::AutoNoVsync
        {
            requested_present_mode
        } else {
            wgpu::PresentMode::Fifo
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: request.width.max(1),
            height: request.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);

        log::info!(
            "Surface configured: {surface_format:?}, {}x{}, {present_mode:?}",
            surface_config.width,
            surface_config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            surface_format,
            adapter_info,
        })
    }
}
