//! # Animation
//!
//! Turns elapsed session time into the MVP matrix for a frame. This is the CPU half of
//! every tick and is a pure function of `(elapsed, aspect)`: the same inputs always give
//! bit-identical output.
//!
//! ## Per-frame transform
//!
//! 1. `angle_x = t / period_x` and `angle_y = t / period_y`, with `t` in milliseconds.
//!    Two different periods make the solid tumble rather than spin about one axis.
//! 2. A perspective projection for the current aspect ratio, a view matrix that moves
//!    the world `camera_distance` along -Z, and one rotation about each axis.
//! 3. Composition, in this exact order:
//!    - `model = rotation_y ∘ rotation_x`
//!    - `model_view = view ∘ model`
//!    - `mvp = projection ∘ model_view`

use web_time::Duration;

use crate::config::RenderConfig;
use crate::matrix::{multiply, Matrix4};

/// Rotation and camera parameters for the tumbling solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub fov_y: f64,
    pub z_near: f64,
    pub z_far: f64,
    pub camera_distance: f64,
    pub period_x_ms: f64,
    pub period_y_ms: f64,
}

impl Default for Animation {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl Animation {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            fov_y: config.fov_y,
            z_near: config.z_near,
            z_far: config.z_far,
            camera_distance: config.camera_distance,
            period_x_ms: config.period_x_ms,
            period_y_ms: config.period_y_ms,
        }
    }

    /// Rotation angles `(x, y)` in radians after `elapsed`.
    pub fn angles(&self, elapsed: Duration) -> (f64, f64) {
        let millis = elapsed.as_secs_f64() * 1000.0;
        (millis / self.period_x_ms, millis / self.period_y_ms)
    }

    pub fn projection(&self, aspect: f64) -> Matrix4 {
        Matrix4::perspective(aspect, self.fov_y, self.z_near, self.z_far)
    }

    pub fn view(&self) -> Matrix4 {
        Matrix4::translation(0.0, 0.0, -self.camera_distance)
    }

    /// The model matrix after `elapsed`.
    pub fn model(&self, elapsed: Duration) -> Matrix4 {
        let (angle_x, angle_y) = self.angles(elapsed);
        multiply(&Matrix4::rotation_y(angle_y), &Matrix4::rotation_x(angle_x))
    }

    /// The full model-view-projection matrix after `elapsed`.
    ///
    /// # Panics
    ///
    /// Panics if `aspect` is not positive, see [`Matrix4::perspective`].
    pub fn mvp(&self, elapsed: Duration, aspect: f64) -> Matrix4 {
        let model = self.model(elapsed);
        let model_view = multiply(&self.view(), &model);
        let mvp = multiply(&self.projection(aspect), &model_view);
        log::trace!("MVP at {elapsed:?}: {:?}", mvp.rows());
        mvp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_grow_linearly_with_distinct_periods() {
        let animation = Animation::default();
        assert_eq!(animation.angles(Duration::ZERO), (0.0, 0.0));

        let (x, y) = animation.angles(Duration::from_millis(3000));
        assert!((x - 1.5).abs() < 1e-12);
        assert!((y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn model_is_identity_at_time_zero() {
        let animation = Animation::default();
        assert_eq!(animation.model(Duration::ZERO), Matrix4::IDENTITY);
    }

    #[test]
    fn view_pulls_the_world_back_along_negative_z() {
        let animation = Animation::default();
        let origin = animation.view().transform_point([0.0, 0.0, 0.0, 1.0]);
        assert_eq!(origin, [0.0, 0.0, -3.0, 1.0]);
    }

    #[test]
    fn origin_lands_inside_the_depth_range() {
        let animation = Animation::default();
        let clip = animation
            .mvp(Duration::from_millis(1234), 4.0 / 3.0)
            .transform_point([0.0, 0.0, 0.0, 1.0]);
        let depth = clip[2] / clip[3];
        assert!(clip[3] > 0.0);
        assert!((0.0..1.0).contains(&depth), "depth {depth}");
    }
}
