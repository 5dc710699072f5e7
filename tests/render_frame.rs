//! Headless frames through the whole pipeline: physics step, geometry pass,
//! lighting pass, buffer clear. No window involved.

use tumble::body::RigidBody;
use tumble::camera::Camera;
use tumble::fb::FrameBuffers;
use tumble::math::Vec3;
use tumble::mesh::Rgb;
use tumble::shade::{apply_lights, PointLight};

const WIDTH: usize = 160;
const HEIGHT: usize = 120;

fn test_camera() -> Camera {
    Camera::new(Vec3::ZERO, 90.0, 100.0, WIDTH, HEIGHT)
}

fn render_frame(
    camera: &Camera,
    fb: &mut FrameBuffers,
    bodies: &[&RigidBody],
    lights: &[PointLight],
) {
    fb.clear();
    for body in bodies {
        camera.render_body(body, fb);
    }
    apply_lights(camera, fb, lights, 200.0);
}

#[test]
fn spinning_body_stays_visible_across_frames() {
    let camera = test_camera();
    let mut fb = FrameBuffers::new(WIDTH, HEIGHT);
    let mut body = RigidBody::cuboid(1e-4, 60.0, 60.0, 60.0);
    body.translate(Vec3::new(0.0, 0.0, 250.0));
    body.ang_mom = Vec3::new(0.0, 10.0, 0.3);
    let lights = [PointLight::new(Vec3::new(0.0, 0.0, 100.0), 40_000.0)];

    for _ in 0..3 {
        for _ in 0..50 {
            body.step(0.01);
        }
        render_frame(&camera, &mut fb, &[&body], &lights);
        let lit = fb.pixels.iter().filter(|&&p| p != 0).count();
        assert!(lit > 0, "body should cover some pixels every frame");
    }

    fb.clear();
    assert!(fb.pixels.iter().all(|&p| p == 0));
    assert!(fb.depth.iter().all(|d| d.is_infinite()));
}

#[test]
fn nearer_body_occludes_farther_one() {
    let camera = test_camera();
    let mut fb = FrameBuffers::new(WIDTH, HEIGHT);

    let mut near = RigidBody::cuboid(1e-4, 40.0, 40.0, 40.0);
    near.translate(Vec3::new(0.0, 0.0, 200.0));
    for i in 0..near.triangles.len() {
        near.paint_face(i, Rgb::RED);
    }

    let mut far = RigidBody::cuboid(1e-4, 120.0, 120.0, 40.0);
    far.translate(Vec3::new(0.0, 0.0, 400.0));
    for i in 0..far.triangles.len() {
        far.paint_face(i, Rgb::GREEN);
    }

    let lights = [PointLight::new(Vec3::new(0.0, 0.0, 100.0), 40_000.0)];
    render_frame(&camera, &mut fb, &[&far, &near], &lights);

    let center = fb.index(WIDTH / 2, HEIGHT / 2);
    assert_eq!(fb.albedo[center], Rgb::RED);
    // The farther body is wider and still shows around the near one.
    assert!(fb.albedo.iter().any(|&c| c == Rgb::GREEN));
}

#[test]
fn bodies_straddling_the_near_plane_clip_cleanly() {
    let camera = test_camera();
    let mut fb = FrameBuffers::new(WIDTH, HEIGHT);
    let mut body = RigidBody::cuboid(1e-4, 60.0, 60.0, 60.0);
    body.translate(Vec3::new(0.0, 0.0, 120.0));

    fb.clear();
    camera.render_body(&body, &mut fb);

    let mut any = false;
    for i in 0..fb.depth.len() {
        if !fb.albedo[i].is_black() {
            any = true;
            assert!(
                fb.hit[i].z >= camera.plane_dist - 1.0,
                "rasterized hit slipped behind the near plane"
            );
        }
    }
    assert!(any, "the clipped faces should still rasterize");
}

#[test]
fn welded_tumbler_survives_a_long_run() {
    let camera = test_camera();
    let mut fb = FrameBuffers::new(WIDTH, HEIGHT);

    let mut head = RigidBody::cuboid(1e-4, 50.0, 100.0, 50.0);
    head.translate(Vec3::new(0.0, 0.0, 400.0));
    let mut handle = RigidBody::cuboid(1e-4, 100.0, 10.0, 10.0);
    handle.translate(Vec3::new(75.0, 0.0, 400.0));
    let mut hammer = RigidBody::weld(&head, &handle);
    hammer.ang_mom = Vec3::new(0.0, 15_000.0, 0.01);

    let lights = [PointLight::new(Vec3::new(0.0, 0.0, 300.0), 40_000.0)];
    for _ in 0..10 {
        for _ in 0..50 {
            hammer.step(0.01);
        }
        render_frame(&camera, &mut fb, &[&hammer], &lights);
    }

    assert_eq!(hammer.ang_mom, Vec3::new(0.0, 15_000.0, 0.01));
    let gram = hammer.orient.transpose() * hammer.orient;
    for r in 0..3 {
        for c in 0..3 {
            let expected = if r == c { 1.0 } else { 0.0 };
            assert!((gram.m[r][c] - expected).abs() < 0.05);
        }
    }
}
