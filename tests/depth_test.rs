//! Offscreen rendering through the real pipeline: depth testing keeps the nearer
//! surface regardless of draw order.
//!
//! These tests need a GPU adapter. Machines without one skip them.

use tetra_demo::pipeline::PipelineState;
use tetra_demo::renderer::record_frame;
use tetra_demo::scene::{create_depth_texture, Scene};
use tetra_demo::shader::ShaderProgram;
use tetra_demo::vertex::Vertex;
use tetra_demo::{Animation, Geometry, Matrix4, UniformBuffer};

const SIZE: u32 = 64;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const BYTES_PER_ROW: u32 = SIZE * 4;

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: None,
        force_fallback_adapter: false,
    }))?;
    pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some("Headless Test Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::default(),
        },
        None,
    ))
    .ok()
}

/// Two full-screen-ish triangles: a red one at depth 0.25 and a green one at 0.75.
fn overlapping_triangles(near_first: bool) -> Geometry {
    let triangle = |z: f32, color: [f32; 4]| {
        [
            Vertex::new([-0.9, -0.9, z], color),
            Vertex::new([0.9, -0.9, z], color),
            Vertex::new([0.0, 0.9, z], color),
        ]
    };
    let mut vertices = triangle(0.25, [1.0, 0.0, 0.0, 1.0]).to_vec();
    vertices.extend(triangle(0.75, [0.0, 1.0, 0.0, 1.0]));

    let indices = if near_first {
        vec![0, 1, 2, 3, 4, 5]
    } else {
        vec![3, 4, 5, 0, 1, 2]
    };
    Geometry::new("Depth Test", vertices, indices, ShaderProgram::TETRAHEDRON)
}

fn render_center_pixel(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    geometry: &Geometry,
    mvp: &Matrix4,
) -> [u8; 4] {
    let pipeline = pollster::block_on(PipelineState::new(device, FORMAT, &geometry.shader))
        .expect("pipeline should build");
    let scene = Scene::new(device, geometry, &pipeline);
    scene.update(queue, UniformBuffer::from_matrix(mvp));

    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let color_view = target.create_view(&wgpu::TextureViewDescriptor::default());
    let depth_view = create_depth_texture(device, SIZE, SIZE);

    let draw = record_frame(
        device,
        &color_view,
        &depth_view,
        wgpu::Color::BLACK,
        &pipeline,
        &scene,
    );

    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Buffer"),
        size: (BYTES_PER_ROW * SIZE) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Readback Encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(BYTES_PER_ROW),
                rows_per_image: Some(SIZE),
            },
        },
        wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
    );
    queue.submit([draw, encoder.finish()]);

    let slice = readback.slice(..);
    let (sender, receiver) = futures::channel::oneshot::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    let _ = device.poll(wgpu::Maintain::Wait);
    pollster::block_on(receiver)
        .expect("map callback should run")
        .expect("readback should map");

    let data = slice.get_mapped_range();
    let center = ((SIZE / 2) * BYTES_PER_ROW + (SIZE / 2) * 4) as usize;
    let mut pixel = [0; 4];
    pixel.copy_from_slice(&data[center..center + 4]);
    pixel
}

#[test]
fn nearer_surface_wins_in_either_draw_order() {
    let Some((device, queue)) = headless_device() else {
        eprintln!("no GPU adapter available, skipping");
        return;
    };

    let far_first = render_center_pixel(
        &device,
        &queue,
        &overlapping_triangles(false),
        &Matrix4::IDENTITY,
    );
    let near_first = render_center_pixel(
        &device,
        &queue,
        &overlapping_triangles(true),
        &Matrix4::IDENTITY,
    );

    assert_eq!(far_first, RED);
    assert_eq!(near_first, RED);
    assert_ne!(near_first, GREEN);
}

#[test]
fn tetrahedron_covers_the_center_at_time_zero() {
    let Some((device, queue)) = headless_device() else {
        eprintln!("no GPU adapter available, skipping");
        return;
    };

    let mvp = Animation::default().mvp(web_time::Duration::ZERO, 1.0);
    let pixel = render_center_pixel(&device, &queue, &Geometry::tetrahedron(), &mvp);
    assert_ne!(pixel, BLACK);
}

#[test]
fn flat_triangle_draws_without_a_transform() {
    let Some((device, queue)) = headless_device() else {
        eprintln!("no GPU adapter available, skipping");
        return;
    };

    let pixel = render_center_pixel(&device, &queue, &Geometry::triangle(), &Matrix4::IDENTITY);
    assert_ne!(pixel, BLACK);
}

#[test]
fn broken_shader_is_reported_instead_of_panicking() {
    let Some((device, _queue)) = headless_device() else {
        eprintln!("no GPU adapter available, skipping");
        return;
    };

    let broken = ShaderProgram {
        label: "Broken Shader",
        source: "@vertex fn vertex_main() -> @builtin(position) vec4<f32> { return nope; }",
    };
    let result = pollster::block_on(PipelineState::new(&device, FORMAT, &broken));
    assert!(matches!(
        result,
        Err(tetra_demo::InitError::ShaderCompilation(_))
    ));
}
