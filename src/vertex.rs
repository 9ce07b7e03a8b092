//! # Vertex Module
//!
//! Defines the [`Vertex`] layout shared by every demo geometry: a 3-component position
//! followed by an RGBA color, both `f32`, packed with no padding. That is 7 scalars and
//! 28 bytes per vertex.
//!
//! The vertex stage reads the position at `@location(0)` as `vec3<f32>` and the color at
//! `@location(1)` as `vec4<f32>`. [`Vertex::vertex_attributes`] and [`Vertex::description`]
//! describe exactly that layout to the pipeline.
//!
//! ```ignore
//! let attributes = Vertex::vertex_attributes();
//! let layout = Vertex::description(&attributes);
//! assert_eq!(layout.array_stride, 28);
//! ```

/// A single vertex: position and color.
///
/// `#[repr(C)]` together with `bytemuck::Pod` lets slices of vertices be handed to
/// the GPU as raw bytes without copying field by field.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position `[x, y, z]`.
    pub position: [f32; 3],

    /// Color `[r, g, b, a]`, interpolated across each face.
    pub color: [f32; 4],
}

impl Vertex {
    /// Number of `f32` scalars in one vertex.
    pub const SCALARS: usize = 7;

    /// Size of one vertex in bytes.
    pub const SIZE: wgpu::BufferAddress = std::mem::size_of::<Vertex>() as wgpu::BufferAddress;

    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    /// Returns the attribute list matching the shader inputs.
    ///
    /// - Location 0: `Float32x3` position at offset 0.
    /// - Location 1: `Float32x4` color at offset 12.
    pub fn vertex_attributes() -> Vec<wgpu::VertexAttribute> {
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4].to_vec()
    }

    /// Returns the buffer layout for vertex data built from `attributes`.
    ///
    /// The stride is the size of [`Vertex`] and the buffer advances once per vertex.
    pub fn description(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }
}
