//! # Matrix Module
//!
//! Double-precision 4x4 transforms used to build the per-frame model-view-projection (MVP)
//! matrix, and the narrowing step that turns the final result into the single-precision
//! matrix uploaded to the GPU.
//!
//! ## Layout
//!
//! A [`Matrix4`] stores sixteen scalars as four groups of four, called *rows* here, in the
//! order they are produced. Points are treated as row vectors multiplied on the left, so a
//! point `v` is transformed as `v' = v · M`. Translation therefore lives in row 3 and the
//! projective divide column of a perspective matrix is column 3.
//!
//! Flattened row by row, the sixteen scalars are bit-for-bit the column-major layout that
//! WGSL expects for a `mat4x4<f32>`, which is why [`narrow`] can hand the flat array
//! straight to `nalgebra_glm::Mat4::from_column_slice`.
//!
//! ## Composition
//!
//! [`multiply`]`(a, b)` yields the transform "apply `b`, then `a`". The summation order of
//! every element is fixed, and nothing here relies on fused multiply-add, so identical
//! inputs always produce identical bits.
//!
//! ## Precision
//!
//! All composition stays in `f64`. Only the finished MVP is narrowed to `f32`, right at the
//! upload boundary; doing the whole chain in `f32` would compound rounding error across the
//! rotation and projection products.

use std::f64::consts::PI;

/// A double-precision 4x4 transform.
///
/// Always fully populated. See the module docs for the row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    rows: [[f64; 4]; 4],
}

impl Matrix4 {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a matrix from its four rows.
    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self { rows }
    }

    /// Creates a matrix from sixteen scalars in row order.
    pub fn from_flat(values: [f64; 16]) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (index, value) in values.into_iter().enumerate() {
            rows[index / 4][index % 4] = value;
        }
        Self { rows }
    }

    /// Returns the four rows.
    pub fn rows(&self) -> &[[f64; 4]; 4] {
        &self.rows
    }

    /// Returns the element at `row`, `col`.
    ///
    /// # Panics
    ///
    /// Panics if either index is greater than 3.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    /// Returns the sixteen scalars in row order.
    pub fn to_flat(&self) -> [f64; 16] {
        let mut flat = [0.0; 16];
        for (index, value) in flat.iter_mut().enumerate() {
            *value = self.rows[index / 4][index % 4];
        }
        flat
    }

    /// Builds a right-handed perspective projection.
    ///
    /// Eye-space depth between `near` and `far` is mapped to `[0, 1]`, the clip range
    /// used by WebGPU and matched by the `Less` depth compare of the pipeline. The
    /// projective divide column is fixed: element `(2, 3)` is `-1` and `(3, 3)` is `0`.
    ///
    /// # Parameters
    ///
    /// - `aspect`: Surface width divided by height.
    /// - `fov`: Vertical field of view, in radians.
    /// - `near`: Distance to the near clipping plane.
    /// - `far`: Distance to the far clipping plane.
    ///
    /// # Panics
    ///
    /// A degenerate projection means the surface or the configuration is broken, so the
    /// preconditions are asserted rather than reported:
    ///
    /// - `aspect > 0`
    /// - `0 < fov < π`
    /// - `0 < near < far`
    pub fn perspective(aspect: f64, fov: f64, near: f64, far: f64) -> Self {
        assert!(aspect > 0.0, "perspective aspect must be positive, got {aspect}");
        assert!(
            fov > 0.0 && fov < PI,
            "perspective fov must lie in (0, pi), got {fov}"
        );
        assert!(near > 0.0, "perspective near plane must be positive, got {near}");
        assert!(
            far > near,
            "perspective far plane ({far}) must lie beyond the near plane ({near})"
        );

        let f = 1.0 / (fov / 2.0).tan();
        let range_inv = 1.0 / (near - far);

        Self::from_rows([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, far * range_inv, -1.0],
            [0.0, 0.0, near * far * range_inv, 0.0],
        ])
    }

    /// A translation by `(x, y, z)`.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [x, y, z, 1.0],
        ])
    }

    /// A rotation of `angle` radians about the X axis.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// A rotation of `angle` radians about the Y axis.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Transforms a homogeneous point, `v · self`.
    pub fn transform_point(&self, v: [f64; 4]) -> [f64; 4] {
        let m = &self.rows;
        let mut out = [0.0; 4];
        for (col, value) in out.iter_mut().enumerate() {
            *value = v[0] * m[0][col] + v[1] * m[1][col] + v[2] * m[2][col] + v[3] * m[3][col];
        }
        out
    }

    /// Largest absolute elementwise difference to `other`.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.to_flat()
            .iter()
            .zip(other.to_flat().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Composes two transforms: the result applies `b` first, then `a`.
///
/// Row `i` of the result is row `i` of `b` pushed through `a`:
/// `out[i][j] = b[i][0]·a[0][j] + b[i][1]·a[1][j] + b[i][2]·a[2][j] + b[i][3]·a[3][j]`,
/// summed left to right.
pub fn multiply(a: &Matrix4, b: &Matrix4) -> Matrix4 {
    let a = &a.rows;
    let mut out = [[0.0; 4]; 4];
    for (out_row, b_row) in out.iter_mut().zip(b.rows.iter()) {
        let [b0, b1, b2, b3] = *b_row;
        for (col, value) in out_row.iter_mut().enumerate() {
            *value = b0 * a[0][col] + b1 * a[1][col] + b2 * a[2][col] + b3 * a[3][col];
        }
    }
    Matrix4 { rows: out }
}

/// Narrows a double-precision matrix to the single-precision matrix the GPU consumes.
///
/// Each element goes through a plain IEEE `f64 -> f32` conversion. The source is left
/// untouched and a fresh value is returned.
pub fn narrow(matrix: &Matrix4) -> nalgebra_glm::Mat4 {
    let narrowed = matrix.to_flat().map(|value| value as f32);
    nalgebra_glm::Mat4::from_column_slice(&narrowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_round_trip_keeps_row_order() {
        let values: [f64; 16] = std::array::from_fn(|i| i as f64);
        let matrix = Matrix4::from_flat(values);
        assert_eq!(matrix.get(0, 3), 3.0);
        assert_eq!(matrix.get(3, 0), 12.0);
        assert_eq!(matrix.to_flat(), values);
    }

    #[test]
    fn translation_moves_points_through_row_three() {
        let t = Matrix4::translation(1.0, 2.0, -3.0);
        assert_eq!(t.transform_point([0.0, 0.0, 0.0, 1.0]), [1.0, 2.0, -3.0, 1.0]);
        // Directions are unaffected.
        assert_eq!(t.transform_point([1.0, 0.0, 0.0, 0.0]), [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn multiply_applies_right_operand_first() {
        let scale_then_move = multiply(
            &Matrix4::translation(10.0, 0.0, 0.0),
            &Matrix4::from_rows([
                [2.0, 0.0, 0.0, 0.0],
                [0.0, 2.0, 0.0, 0.0],
                [0.0, 0.0, 2.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
        );
        let p = scale_then_move.transform_point([1.0, 0.0, 0.0, 1.0]);
        assert_eq!(p, [12.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth_range() {
        let p = Matrix4::perspective(1.0, PI / 2.0, 0.5, 50.0);
        let near = p.transform_point([0.0, 0.0, -0.5, 1.0]);
        let far = p.transform_point([0.0, 0.0, -50.0, 1.0]);
        assert!((near[2] / near[3]).abs() < 1e-12);
        assert!((far[2] / far[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "aspect")]
    fn perspective_rejects_non_positive_aspect() {
        Matrix4::perspective(0.0, PI / 4.0, 0.1, 100.0);
    }

    #[test]
    #[should_panic(expected = "far plane")]
    fn perspective_rejects_inverted_planes() {
        Matrix4::perspective(1.0, PI / 4.0, 10.0, 10.0);
    }

    #[test]
    #[should_panic(expected = "fov")]
    fn perspective_rejects_straight_angle_fov() {
        Matrix4::perspective(1.0, PI, 0.1, 100.0);
    }

    #[test]
    fn narrow_keeps_layout_and_source() {
        let source = Matrix4::translation(0.5, 0.25, -3.0);
        let narrowed = narrow(&source);
        assert_eq!(narrowed.as_slice()[12], 0.5);
        assert_eq!(narrowed.as_slice()[13], 0.25);
        assert_eq!(narrowed.as_slice()[14], -3.0);
        assert_eq!(source, Matrix4::translation(0.5, 0.25, -3.0));
    }
}
