//! # Scene Resources Module
//!
//! Uploads a [`Geometry`] to the GPU and records the draw that renders it.
//!
//! ## Resources
//!
//! - **Vertex buffer**: `VERTEX | COPY_DST`, filled while mapped at creation.
//! - **Index buffer**: `INDEX | COPY_DST`, 16-bit indices, filled the same way.
//! - **Uniform binding**: the 64-byte MVP buffer and its bind group, see
//!   [`UniformBinding`].
//! - **Depth texture**: created separately by [`create_depth_texture`], since it
//!   follows the surface size rather than the geometry.
//!
//! Mapped-at-creation buffers must be a multiple of [`wgpu::COPY_BUFFER_ALIGNMENT`]
//! in size, so odd-length index data (a single 16-bit triangle is six bytes) is padded.
//! The draw call only ever reads [`Scene::index_count`] indices.

use crate::geometry::Geometry;
use crate::pipeline::{PipelineState, DEPTH_FORMAT, INDEX_FORMAT};
use crate::uniform_binding::UniformBinding;
use crate::uniform_buffer::UniformBuffer;

/// GPU copies of one geometry set plus the MVP uniform.
pub struct Scene {
    pub vertex_buffer: wgpu::Buffer,

    pub index_buffer: wgpu::Buffer,

    pub uniform: UniformBinding,

    /// Number of indices drawn per frame.
    pub index_count: u32,
}

impl Scene {
    /// Uploads `geometry` and binds a fresh uniform buffer to the pipeline's layout.
    pub fn new(device: &wgpu::Device, geometry: &Geometry, pipeline: &PipelineState) -> Self {
        let vertex_buffer = create_static_buffer(
            device,
            "Vertex Buffer",
            geometry.vertex_bytes(),
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );

        let index_buffer = create_static_buffer(
            device,
            "Index Buffer",
            geometry.index_bytes(),
            wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        );

        let uniform = UniformBinding::new(device, &pipeline.uniform_layout);

        log::debug!(
            "{}: uploaded {} vertices and {} indices",
            geometry.label,
            geometry.vertices.len(),
            geometry.indices.len()
        );

        Self {
            vertex_buffer,
            index_buffer,
            uniform,
            index_count: geometry.index_count(),
        }
    }

    /// Stages a new uniform value for the next submission.
    pub fn update(&self, queue: &wgpu::Queue, uniform: UniformBuffer) {
        self.uniform.update_buffer(queue, 0, uniform);
    }

    /// Records the indexed draw of the whole geometry into `renderpass`.
    pub fn render(&self, renderpass: &mut wgpu::RenderPass<'_>, pipeline: &PipelineState) {
        renderpass.set_pipeline(&pipeline.pipeline);
        renderpass.set_bind_group(0, &self.uniform.bind_group, &[]);

        renderpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        renderpass.set_index_buffer(self.index_buffer.slice(..), INDEX_FORMAT);

        renderpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Creates a buffer holding `contents`, written through a mapping at creation.
fn create_static_buffer(
    device: &wgpu::Device,
    label: &str,
    contents: &[u8],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    let size = wgpu::util::align_to(contents.len() as wgpu::BufferAddress, wgpu::COPY_BUFFER_ALIGNMENT);

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage,
        mapped_at_creation: true,
    });

    {
        let mut mapped = buffer.slice(..).get_mapped_range_mut();
        mapped[..contents.len()].copy_from_slice(contents);
    }
    buffer.unmap();

    buffer
}

/// Creates a depth attachment of the given size and returns its view.
pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
