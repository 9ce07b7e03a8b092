//! # Uniform Binding Module
//!
//! Owns the GPU uniform buffer holding the MVP matrix and the bind group that exposes it
//! to the vertex stage at group 0, binding 0.
//!
//! The layout is created first, by the pipeline, because the pipeline layout needs it.
//! The buffer and bind group are created afterwards from that same layout. The buffer
//! starts empty and is fully overwritten on every frame.
//!
//! ```ignore
//! let layout = UniformBinding::create_layout(&device);
//! let binding = UniformBinding::new(&device, &layout);
//! binding.update_buffer(&queue, 0, UniformBuffer::from_matrix(&mvp));
//! ```

use crate::uniform_buffer::UniformBuffer;

/// The MVP uniform buffer and its bind group.
pub struct UniformBinding {
    /// 64-byte buffer, `UNIFORM | COPY_DST`.
    pub buffer: wgpu::Buffer,

    /// Bind group linking [`Self::buffer`] to binding 0.
    pub bind_group: wgpu::BindGroup,
}

impl UniformBinding {
    /// Creates the bind group layout: one uniform buffer at binding 0, visible to the
    /// vertex stage, exactly one [`UniformBuffer`] in size.
    pub fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(UniformBuffer::SIZE),
                },
                count: None,
            }],
            label: Some("uniform_bind_group_layout"),
        })
    }

    /// Allocates the uniform buffer, left empty until the first frame, and binds it
    /// to slot 0 of `layout`.
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"),
            size: UniformBuffer::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        Self { buffer, bind_group }
    }

    /// Writes `uniform_buffer` at `offset`.
    ///
    /// The write is staged on the queue and lands before the next submission.
    pub fn update_buffer(
        &self,
        queue: &wgpu::Queue,
        offset: wgpu::BufferAddress,
        uniform_buffer: UniformBuffer,
    ) {
        queue.write_buffer(&self.buffer, offset, uniform_buffer.as_bytes());
    }
}
