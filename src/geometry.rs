//! # Geometry
//!
//! Static geometry drawn by a render session, together with the shader program that
//! knows how to draw it. Geometry and shader are picked once, when the session is built,
//! and never change afterwards.
//!
//! Two sets ship with the crate:
//!
//! - [`Geometry::tetrahedron`]: four colored vertices and twelve indices forming a
//!   closed solid, drawn with the MVP transform.
//! - [`Geometry::triangle`]: the reduced flat-triangle demo, drawn without a transform.
//!
//! [`Geometry::for_build`] picks between them with the `minimal-triangle` cargo feature.

use crate::shader::ShaderProgram;
use crate::vertex::Vertex;

/// The four corners of the tetrahedron.
pub const TETRAHEDRON_VERTICES: [Vertex; 4] = [
    // Top (red)
    Vertex::new([0.0, 0.5, 0.0], [1.0, 0.0, 0.0, 1.0]),
    // Base front left (green)
    Vertex::new([-0.5, -0.5, 0.25], [0.0, 1.0, 0.0, 1.0]),
    // Base front right (blue)
    Vertex::new([0.5, -0.5, 0.25], [0.0, 0.0, 1.0, 1.0]),
    // Base back (yellow)
    Vertex::new([0.0, -0.5, -0.5], [1.0, 1.0, 0.0, 1.0]),
];

/// Faces of the tetrahedron, counter-clockwise when seen from outside.
pub const TETRAHEDRON_INDICES: [u16; 12] = [
    0, 1, 2, // front
    0, 2, 3, // right
    0, 3, 1, // left
    1, 3, 2, // bottom
];

/// The flat triangle, already in clip space.
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex::new([0.0, 0.5, 0.0], [1.0, 0.0, 0.0, 1.0]),
    Vertex::new([-0.5, -0.5, 0.0], [0.0, 1.0, 0.0, 1.0]),
    Vertex::new([0.5, -0.5, 0.0], [0.0, 0.0, 1.0, 1.0]),
];

pub const TRIANGLE_INDICES: [u16; 3] = [0, 1, 2];

/// Vertices, triangle-list indices and the program that draws them.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub label: &'static str,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    pub shader: ShaderProgram,
}

impl Geometry {
    /// Creates a geometry set.
    ///
    /// # Panics
    ///
    /// Panics if the index list is not a whole number of triangles or refers to a vertex
    /// that does not exist. Both are mistakes in hard-coded data.
    pub fn new(
        label: &'static str,
        vertices: Vec<Vertex>,
        indices: Vec<u16>,
        shader: ShaderProgram,
    ) -> Self {
        assert!(
            !indices.is_empty() && indices.len() % 3 == 0,
            "{label}: index count {} is not a whole number of triangles",
            indices.len()
        );
        assert!(
            indices.iter().all(|&index| (index as usize) < vertices.len()),
            "{label}: index out of range for {} vertices",
            vertices.len()
        );
        Self {
            label,
            vertices,
            indices,
            shader,
        }
    }

    /// The rotating solid.
    pub fn tetrahedron() -> Self {
        Self::new(
            "Tetrahedron",
            TETRAHEDRON_VERTICES.to_vec(),
            TETRAHEDRON_INDICES.to_vec(),
            ShaderProgram::TETRAHEDRON,
        )
    }

    /// The reduced flat triangle.
    pub fn triangle() -> Self {
        Self::new(
            "Triangle",
            TRIANGLE_VERTICES.to_vec(),
            TRIANGLE_INDICES.to_vec(),
            ShaderProgram::TRIANGLE,
        )
    }

    /// The geometry selected at build time.
    pub fn for_build() -> Self {
        if cfg!(feature = "minimal-triangle") {
            Self::triangle()
        } else {
            Self::tetrahedron()
        }
    }

    /// Number of indices handed to the indexed draw call.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Vertex data as bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn tetrahedron_has_four_faces_and_packed_sizes() {
        let geometry = Geometry::tetrahedron();
        assert_eq!(geometry.vertices.len(), 4);
        assert_eq!(geometry.index_count(), 12);
        assert_eq!(geometry.vertex_bytes().len(), 4 * 28);
        assert_eq!(geometry.index_bytes().len(), 24);
    }

    #[test]
    fn tetrahedron_faces_wind_outward() {
        let geometry = Geometry::tetrahedron();
        let positions: Vec<[f32; 3]> = geometry.vertices.iter().map(|v| v.position).collect();
        let centroid = positions.iter().fold([0.0; 3], |acc, p| {
            [acc[0] + p[0] / 4.0, acc[1] + p[1] / 4.0, acc[2] + p[2] / 4.0]
        });

        for face in geometry.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| positions[face[i] as usize]);
            let normal = cross(sub(b, a), sub(c, a));
            let length = dot(normal, normal).sqrt();
            assert!(length > 1e-3, "face {face:?} is degenerate");

            let face_center = [
                (a[0] + b[0] + c[0]) / 3.0,
                (a[1] + b[1] + c[1]) / 3.0,
                (a[2] + b[2] + c[2]) / 3.0,
            ];
            let outward = sub(face_center, centroid);
            assert!(dot(normal, outward) > 0.0, "face {face:?} winds inward");
        }
    }

    #[test]
    fn tetrahedron_is_closed() {
        // Every directed edge must be matched by its reverse on a neighbouring face.
        let geometry = Geometry::tetrahedron();
        let mut edges = Vec::new();
        for face in geometry.indices.chunks(3) {
            edges.push((face[0], face[1]));
            edges.push((face[1], face[2]));
            edges.push((face[2], face[0]));
        }
        for &(from, to) in &edges {
            let reversed = edges.iter().filter(|&&edge| edge == (to, from)).count();
            let forward = edges.iter().filter(|&&edge| edge == (from, to)).count();
            assert_eq!((forward, reversed), (1, 1), "edge {from}->{to}");
        }
        assert_eq!(edges.len(), 12);
    }

    #[test]
    fn triangle_is_counter_clockwise_in_clip_space() {
        let geometry = Geometry::triangle();
        let [a, b, c] = [0, 1, 2].map(|i| geometry.vertices[geometry.indices[i] as usize].position);
        assert!(cross(sub(b, a), sub(c, a))[2] > 0.0);
        assert_eq!(geometry.shader, ShaderProgram::TRIANGLE);
    }

    #[test]
    #[should_panic(expected = "whole number of triangles")]
    fn rejects_partial_triangles() {
        Geometry::new(
            "Broken",
            TRIANGLE_VERTICES.to_vec(),
            vec![0, 1],
            ShaderProgram::TRIANGLE,
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn rejects_dangling_indices() {
        Geometry::new(
            "Broken",
            TRIANGLE_VERTICES.to_vec(),
            vec![0, 1, 3],
            ShaderProgram::TRIANGLE,
        );
    }

    #[test]
    fn build_selection_matches_feature() {
        let expected = if cfg!(feature = "minimal-triangle") {
            "Triangle"
        } else {
            "Tetrahedron"
        };
        assert_eq!(Geometry::for_build().label, expected);
    }
}
