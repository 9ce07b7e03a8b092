//! The per-frame transform: determinism, composition order and where the geometry
//! ends up in clip space.

use web_time::Duration;

use tetra_demo::geometry::TETRAHEDRON_VERTICES;
use tetra_demo::{multiply, narrow, Animation, Matrix4, RenderConfig, UniformBuffer};

const ASPECT: f64 = 800.0 / 600.0;

fn clip(mvp: &Matrix4, position: [f32; 3]) -> [f64; 4] {
    mvp.transform_point([
        position[0] as f64,
        position[1] as f64,
        position[2] as f64,
        1.0,
    ])
}

#[test]
fn same_time_and_aspect_give_bit_identical_matrices() {
    let animation = Animation::default();
    for millis in [0, 16, 1234, 98_765] {
        let elapsed = Duration::from_millis(millis);
        let first = animation.mvp(elapsed, ASPECT).to_flat().map(f64::to_bits);
        let second = animation.mvp(elapsed, ASPECT).to_flat().map(f64::to_bits);
        assert_eq!(first, second, "t={millis}ms");
    }
}

#[test]
fn at_time_zero_the_model_is_identity() {
    let animation = Animation::default();
    let expected = multiply(&animation.projection(ASPECT), &animation.view());
    assert_eq!(animation.mvp(Duration::ZERO, ASPECT), expected);
}

#[test]
fn top_vertex_is_above_center_at_time_zero() {
    let mvp = Animation::default().mvp(Duration::ZERO, ASPECT);
    let top = clip(&mvp, TETRAHEDRON_VERTICES[0].position);
    assert!(top[3] > 0.0);
    assert!(top[1] / top[3] > 0.0);
}

#[test]
fn every_vertex_stays_inside_the_view_volume() {
    let animation = Animation::default();
    for millis in (0..10_000).step_by(250) {
        let mvp = animation.mvp(Duration::from_millis(millis), ASPECT);
        for vertex in TETRAHEDRON_VERTICES {
            let [x, y, z, w] = clip(&mvp, vertex.position);
            assert!(w > 0.0);
            assert!((x / w).abs() < 1.0, "x out of view at {millis}ms");
            assert!((y / w).abs() < 1.0, "y out of view at {millis}ms");
            assert!((0.0..1.0).contains(&(z / w)), "depth out of range at {millis}ms");
        }
    }
}

#[test]
fn mvp_applies_model_then_view_then_projection() {
    let animation = Animation::default();
    let elapsed = Duration::from_millis(777);
    let mvp = animation.mvp(elapsed, ASPECT);

    let point = [0.5, -0.5, 0.25, 1.0];
    let stepwise = animation.projection(ASPECT).transform_point(
        animation
            .view()
            .transform_point(animation.model(elapsed).transform_point(point)),
    );
    let composed = mvp.transform_point(point);
    for (a, b) in composed.iter().zip(stepwise) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn rotation_is_periodic_about_y() {
    let config = RenderConfig {
        period_x_ms: f64::INFINITY,
        ..RenderConfig::default()
    };
    let animation = Animation::from_config(&config);
    let turn = Duration::from_secs_f64(std::f64::consts::TAU * config.period_y_ms / 1000.0);
    let start = animation.model(Duration::ZERO);
    let after_turn = animation.model(turn);
    assert!(start.max_abs_diff(&after_turn) < 1e-9);
}

#[test]
fn uniform_block_carries_the_narrowed_mvp() {
    let mvp = Animation::default().mvp(Duration::from_millis(500), ASPECT);
    let block = UniformBuffer::from_matrix(&mvp);
    assert_eq!(block.mvp, narrow(&mvp));
    for (wide, single) in mvp.to_flat().iter().zip(block.mvp.as_slice()) {
        assert!((*single as f64 - wide).abs() <= wide.abs() * f32::EPSILON as f64);
    }
}
