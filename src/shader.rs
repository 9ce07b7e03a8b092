//! Embedded WGSL programs.
//!
//! Both programs read the [`Vertex`](crate::Vertex) layout and expose the same entry
//! point names, so the pipeline code never needs to know which one it is compiling.

/// Entry point of the vertex stage in every embedded program.
pub const VERTEX_ENTRY: &str = "vertex_main";

/// Entry point of the fragment stage in every embedded program.
pub const FRAGMENT_ENTRY: &str = "fragment_main";

/// The solid demo program.
///
/// The vertex stage multiplies each position by the `mvp` uniform at group 0,
/// binding 0 and passes the color through. The fragment stage returns the
/// interpolated color.
pub const TETRAHEDRON_SHADER: &str = include_str!("shaders/tetrahedron.wgsl");

/// The reduced flat-triangle program. Positions go straight to clip space.
pub const TRIANGLE_SHADER: &str = include_str!("shaders/triangle.wgsl");

/// A WGSL program chosen when the session is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    pub label: &'static str,
    pub source: &'static str,
}

impl ShaderProgram {
    pub const TETRAHEDRON: Self = Self {
        label: "Tetrahedron Shader",
        source: TETRAHEDRON_SHADER,
    };

    pub const TRIANGLE: Self = Self {
        label: "Triangle Shader",
        source: TRIANGLE_SHADER,
    };
}
