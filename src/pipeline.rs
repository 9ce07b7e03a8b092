//! # Render Pipeline Module
//!
//! Compiles the embedded shader program and builds the one render pipeline a session
//! draws with.
//!
//! ## Fixed state
//!
//! - Vertex input: one buffer of [`Vertex`], a 28-byte stride with `float32x3` position
//!   and `float32x4` color.
//! - Primitives: triangle list, counter-clockwise front faces, back faces culled.
//! - Depth: [`DEPTH_FORMAT`], depth writes enabled, compare `Less`.
//! - Color: one target in the surface format, written without blending.
//! - Layout: one bind group at index 0 holding the MVP uniform, see
//!   [`UniformBinding::create_layout`].
//!
//! Shader and pipeline creation each run inside a validation error scope, so a broken
//! program surfaces as an [`InitError`] instead of an uncaptured device error.

use crate::error::InitError;
use crate::shader::{ShaderProgram, FRAGMENT_ENTRY, VERTEX_ENTRY};
use crate::uniform_binding::UniformBinding;
use crate::vertex::Vertex;

/// Format of the depth attachment.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Index format of every geometry set.
pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint16;

/// The compiled pipeline and the bind group layout it expects at group 0.
pub struct PipelineState {
    pub pipeline: wgpu::RenderPipeline,

    /// Layout of the MVP uniform bind group.
    pub uniform_layout: wgpu::BindGroupLayout,

    /// The color target format the pipeline was built for.
    pub color_format: wgpu::TextureFormat,
}

impl PipelineState {
    /// Compiles `shader` and builds the pipeline for `color_format`.
    pub async fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        shader: &ShaderProgram,
    ) -> Result<Self, InitError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader.label),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(shader.source)),
        });
        if let Some(error) = device.pop_error_scope().await {
            return Err(InitError::ShaderCompilation(error.to_string()));
        }

        let uniform_layout = UniformBinding::create_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let attributes = Vertex::vertex_attributes();

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: Some(VERTEX_ENTRY),
                buffers: &[Vertex::description(&attributes)],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: Some(FRAGMENT_ENTRY),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });
        if let Some(error) = device.pop_error_scope().await {
            return Err(InitError::PipelineCreation(error.to_string()));
        }

        Ok(Self {
            pipeline,
            uniform_layout,
            color_format,
        })
    }
}
