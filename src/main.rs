use std::time::{Duration, Instant};

use anyhow::Result;
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

use tumble::body::RigidBody;
use tumble::camera::Camera;
use tumble::config::Config;
use tumble::fb::FrameBuffers;
use tumble::input::InputFrame;
use tumble::math::Vec3;
use tumble::mesh::{axis_markers, Rgb};
use tumble::shade::{apply_lights, PointLight};

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::default();

    let mut window = Window::new(
        "tumble",
        config.width,
        config.height,
        WindowOptions::default(),
    )?;
    window.limit_update_rate(Some(Duration::from_secs_f64(1.0 / config.fps as f64)));

    let mut camera = Camera::new(
        config.cam_start,
        config.fov_deg,
        config.plane_dist,
        config.width,
        config.height,
    );
    camera.rot_self_x(-std::f32::consts::FRAC_PI_2);

    let mut hammer = build_hammer();
    // Momentum close to the intermediate axis, with a nudge off it: the
    // classic unstable tumbling setup.
    hammer.ang_mom = Vec3::new(0.0, 15_000.0, 0.01);
    log::info!(
        "scene ready: {} triangles, mass {:.3}, volume {:.0}",
        hammer.triangles.len(),
        hammer.mass,
        hammer.volume
    );

    let lights = [PointLight::new(Vec3::new(0.0, 0.0, 300.0), 40_000.0)];
    let markers = axis_markers();
    let mut fb = FrameBuffers::new(config.width, config.height);
    let mut last_mouse: Option<(f32, f32)> = None;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let frame_start = Instant::now();

        fb.clear();
        for tri in &markers {
            camera.render_triangle(tri, &mut fb);
        }
        camera.render_body(&hammer, &mut fb);
        apply_lights(&camera, &mut fb, &lights, config.gloss_factor);
        log::debug!("frame rendered in {:?}", frame_start.elapsed());

        window.update_with_buffer(&fb.pixels, config.width, config.height)?;

        let mut input = capture_input(&window, &mut last_mouse);
        camera.apply_input(&mut input, config.cam_lin_speed, config.cam_rot_speed);

        for _ in 0..config.substeps {
            hammer.step(config.timestep);
        }
    }

    Ok(())
}

/// Head and handle cuboids welded together, plus an icosahedral pommel at
/// the handle's end, recentered on the origin.
fn build_hammer() -> RigidBody {
    let density = 1e-4;

    let mut head = RigidBody::cuboid(density, 50.0, 100.0, 50.0);
    head.paint_face(4, Rgb::RED);
    head.paint_face(5, Rgb::RED);
    head.paint_face(6, Rgb::BLUE);
    head.paint_face(7, Rgb::BLUE);

    let mut handle = RigidBody::cuboid(density, 100.0, 10.0, 10.0);
    handle.translate(Vec3::new(75.0, 0.0, 0.0));

    let mut pommel = RigidBody::icosahedron(density, 20.0);
    pommel.translate(Vec3::new(125.0, 0.0, 0.0));

    let mut hammer = RigidBody::weld(&RigidBody::weld(&head, &handle), &pommel);
    let recenter = -hammer.cm_pos;
    hammer.translate(recenter);
    hammer
}

/// One immutable snapshot of the window's input state. Mouse deltas come
/// from the cursor's travel since the previous frame.
fn capture_input(window: &Window, last_mouse: &mut Option<(f32, f32)>) -> InputFrame {
    let (mouse_dx, mouse_dy) = match (window.get_mouse_pos(MouseMode::Pass), *last_mouse) {
        (Some(pos), Some(prev)) => {
            *last_mouse = Some(pos);
            (pos.0 - prev.0, pos.1 - prev.1)
        }
        (Some(pos), None) => {
            *last_mouse = Some(pos);
            (0.0, 0.0)
        }
        (None, _) => (0.0, 0.0),
    };

    InputFrame {
        forward: window.is_key_down(Key::W),
        back: window.is_key_down(Key::S),
        left: window.is_key_down(Key::A),
        right: window.is_key_down(Key::D),
        up: window.is_key_down(Key::Space),
        down: window.is_key_down(Key::LeftShift),
        look: window.get_mouse_down(MouseButton::Left),
        mouse_dx,
        mouse_dy,
    }
}
