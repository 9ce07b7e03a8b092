//! # Uniform Buffer Module
//!
//! CPU-side mirror of the uniform block the vertex stage reads at group 0, binding 0:
//! a single `mat4x4<f32>` holding the model-view-projection matrix.
//!
//! The value is produced once per frame by narrowing the double-precision MVP with
//! [`narrow`], then copied into the GPU buffer by
//! [`UniformBinding::update_buffer`](crate::uniform_binding::UniformBinding::update_buffer).
//! Because it derives `bytemuck::Pod`, the struct can be cast straight to bytes.

use crate::matrix::{narrow, Matrix4};

/// The uniform block: one column-major `f32` 4x4 matrix, 64 bytes.
#[repr(C)]
#[derive(Default, Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformBuffer {
    /// Model-view-projection matrix in single precision.
    pub mvp: nalgebra_glm::Mat4,
}

impl UniformBuffer {
    /// Size of the block in bytes.
    pub const SIZE: wgpu::BufferAddress = std::mem::size_of::<Self>() as wgpu::BufferAddress;

    /// Narrows `mvp` into a fresh uniform block.
    pub fn from_matrix(mvp: &Matrix4) -> Self {
        Self { mvp: narrow(mvp) }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
