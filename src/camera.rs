//! Camera pose, near-plane clipping, and the geometry pass.
//!
//! Triangles are taken to camera space, clipped against the near plane,
//! perspective-divided onto the projection plane, and scanned over their
//! pixel bounding box. Each covered pixel stores its view-space hit point,
//! the (unnormalized) triangle normal and the unlit color, guarded by a
//! squared-distance depth test; lighting happens later in a separate pass.

use crate::body::RigidBody;
use crate::fb::FrameBuffers;
use crate::input::InputFrame;
use crate::math::{Mat3, Vec3};
use crate::mesh::{Rgb, Triangle};

pub struct Camera {
    pub eye: Vec3,
    /// World-from-camera rotation; columns are the camera's right / up /
    /// forward axes in world space.
    pub orient: Mat3,
    pub plane_dist: f32,
    scale: f32,
    pixel_size: f32,
    width: usize,
    height: usize,
}

impl Camera {
    pub fn new(eye: Vec3, fov_deg: f32, plane_dist: f32, width: usize, height: usize) -> Self {
        let scale =
            width as f32 / (2.0 * plane_dist * (fov_deg * std::f32::consts::PI / 720.0).tan());
        Self {
            eye,
            orient: Mat3::IDENTITY,
            plane_dist,
            scale,
            pixel_size: 1.0 / scale,
            width,
            height,
        }
    }

    /// World direction -> camera space. Vertices subtract `eye` first.
    pub fn to_camera(&self, v: Vec3) -> Vec3 {
        self.orient.transpose() * v
    }

    pub fn render_body(&self, body: &RigidBody, fb: &mut FrameBuffers) {
        for tri in &body.triangles {
            self.render_triangle(&tri.rotated(body.orient).translated(body.cm_pos), fb);
        }
    }

    /// Clips one world-space triangle against the near plane and rasterizes
    /// whatever survives. All 8 in-front/behind combinations of the three
    /// vertices are covered; clipped vertices land exactly on the plane, so
    /// their perspective projection is the intersection point itself.
    pub fn render_triangle(&self, tri: &Triangle, fb: &mut FrameBuffers) {
        let r1 = self.to_camera(tri.a - self.eye);
        let r2 = self.to_camera(tri.b - self.eye);
        let r3 = self.to_camera(tri.c - self.eye);

        // Plane of the untouched camera-space triangle; the ray cast in
        // `fill` intersects this plane even for clipped sub-triangles.
        let n = (r2 - r1).cross(r3 - r1);
        let n_dot_p = n.dot(r1);
        let color = tri.color;

        let behind = (
            r1.z < self.plane_dist,
            r2.z < self.plane_dist,
            r3.z < self.plane_dist,
        );
        match behind {
            (true, true, true) => {}
            (false, false, false) => {
                let p1 = self.project(r1);
                let p2 = self.project(r2);
                let p3 = self.project(r3);
                self.fill(n, n_dot_p, p1, p2, p3, color, fb);
            }
            // One vertex behind: the visible quad splits into two triangles.
            (true, false, false) => self.fill_quad(n, n_dot_p, r2, r3, r1, color, fb),
            (false, true, false) => self.fill_quad(n, n_dot_p, r1, r3, r2, color, fb),
            (false, false, true) => self.fill_quad(n, n_dot_p, r1, r2, r3, color, fb),
            // Two vertices behind: a single clipped triangle survives.
            (true, true, false) => self.fill_corner(n, n_dot_p, r3, r1, r2, color, fb),
            (true, false, true) => self.fill_corner(n, n_dot_p, r2, r1, r3, color, fb),
            (false, true, true) => self.fill_corner(n, n_dot_p, r1, r2, r3, color, fb),
        }
    }

    fn project(&self, v: Vec3) -> (f32, f32) {
        (
            v.x * self.plane_dist / v.z,
            v.y * self.plane_dist / v.z,
        )
    }

    /// Intersection of the edge from behind-vertex `b` to front-vertex `f`
    /// with the near plane, by linear interpolation on z.
    fn clip_edge(&self, b: Vec3, f: Vec3) -> (f32, f32) {
        let t = (self.plane_dist - b.z) / (f.z - b.z);
        (b.x + (f.x - b.x) * t, b.y + (f.y - b.y) * t)
    }

    fn fill_quad(
        &self,
        n: Vec3,
        n_dot_p: f32,
        f1: Vec3,
        f2: Vec3,
        b: Vec3,
        color: Rgb,
        fb: &mut FrameBuffers,
    ) {
        let p1 = self.project(f1);
        let p2 = self.project(f2);
        let i1 = self.clip_edge(b, f1);
        let i2 = self.clip_edge(b, f2);
        self.fill(n, n_dot_p, p1, p2, i1, color, fb);
        self.fill(n, n_dot_p, p2, i1, i2, color, fb);
    }

    fn fill_corner(
        &self,
        n: Vec3,
        n_dot_p: f32,
        f: Vec3,
        b1: Vec3,
        b2: Vec3,
        color: Rgb,
        fb: &mut FrameBuffers,
    ) {
        let p = self.project(f);
        let i1 = self.clip_edge(b1, f);
        let i2 = self.clip_edge(b2, f);
        self.fill(n, n_dot_p, p, i1, i2, color, fb);
    }

    /// Scans the screen-space triangle's pixel bounding box and writes every
    /// covered pixel that passes the depth test. A degenerate triangle
    /// (zero normal) produces NaN depths that fail the strict compare, so
    /// it touches nothing.
    fn fill(
        &self,
        n: Vec3,
        n_dot_p: f32,
        (x1, y1): (f32, f32),
        (x2, y2): (f32, f32),
        (x3, y3): (f32, f32),
        color: Rgb,
        fb: &mut FrameBuffers,
    ) {
        let w = self.width as f32;
        let h = self.height as f32;
        let min_x = ((0.5 * w + x1.min(x2).min(x3) * self.scale) as i32).max(0);
        let max_x = ((0.5 * w + x1.max(x2).max(x3) * self.scale) as i32).min(self.width as i32);
        let min_y = ((0.5 * h + y1.min(y2).min(y3) * self.scale) as i32).max(0);
        let max_y = ((0.5 * h + y1.max(y2).max(y3) * self.scale) as i32).min(self.height as i32);
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        let px_start = (min_x as f32 - 0.5 * w) * self.pixel_size;
        let mut py = (min_y as f32 - 0.5 * h) * self.pixel_size;
        for y in min_y..max_y {
            let mut px = px_start;
            for x in min_x..max_x {
                if point_in_triangle(px, py, x1, y1, x2, y2, x3, y3) {
                    let ray = Vec3::new(px, py, self.plane_dist);
                    let hit = ray * (n_dot_p / n.dot(ray));
                    let dist_sq = hit.length_squared();
                    let idx = y as usize * self.width + x as usize;
                    if dist_sq < fb.depth[idx] {
                        fb.depth[idx] = dist_sq;
                        fb.hit[idx] = hit;
                        fb.normal[idx] = n;
                        fb.albedo[idx] = color;
                    }
                }
                px += self.pixel_size;
            }
            py += self.pixel_size;
        }
    }

    /// Applies one frame's input snapshot: translation along the camera
    /// axes (vertical stays world-aligned), and while the look button is
    /// held, yaw about the world vertical and pitch about the camera's own
    /// x axis, consuming the mouse deltas.
    pub fn apply_input(&mut self, input: &mut InputFrame, lin_speed: f32, rot_speed: f32) {
        if input.forward {
            self.eye += self.orient.col(2) * lin_speed;
        }
        if input.back {
            self.eye -= self.orient.col(2) * lin_speed;
        }
        if input.right {
            self.eye += self.orient.col(0) * lin_speed;
        }
        if input.left {
            self.eye -= self.orient.col(0) * lin_speed;
        }
        if input.up {
            self.eye += Vec3::Z * lin_speed;
        }
        if input.down {
            self.eye -= Vec3::Z * lin_speed;
        }
        if input.look {
            let (dx, dy) = input.drain_mouse();
            self.rot_world_z(-rot_speed * dx);
            self.rot_self_x(-rot_speed * dy);
        }
    }

    pub fn rot_self_x(&mut self, angle: f32) {
        self.orient = Mat3::from_axis_angle(self.orient.col(0), angle) * self.orient;
    }
    pub fn rot_self_y(&mut self, angle: f32) {
        self.orient = Mat3::from_axis_angle(self.orient.col(1), angle) * self.orient;
    }
    pub fn rot_self_z(&mut self, angle: f32) {
        self.orient = Mat3::from_axis_angle(self.orient.col(2), angle) * self.orient;
    }
    pub fn rot_world_x(&mut self, angle: f32) {
        self.orient = Mat3::from_axis_angle(Vec3::X, angle) * self.orient;
    }
    pub fn rot_world_y(&mut self, angle: f32) {
        self.orient = Mat3::from_axis_angle(Vec3::Y, angle) * self.orient;
    }
    pub fn rot_world_z(&mut self, angle: f32) {
        self.orient = Mat3::from_axis_angle(Vec3::Z, angle) * self.orient;
    }
}

/// Sign-consistency point-in-triangle test; the branch picks the edge
/// orientation once from the triangle's own screen winding.
fn point_in_triangle(
    px: f32,
    py: f32,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    x3: f32,
    y3: f32,
) -> bool {
    if (x2 - x1) * (y3 - y1) > (y2 - y1) * (x3 - x1) {
        if (x2 - x1) * (py - y1) < (y2 - y1) * (px - x1) {
            return false;
        }
        if (x3 - x2) * (py - y2) < (y3 - y2) * (px - x2) {
            return false;
        }
        if (x1 - x3) * (py - y3) < (y1 - y3) * (px - x3) {
            return false;
        }
    } else {
        if (x2 - x1) * (py - y1) > (y2 - y1) * (px - x1) {
            return false;
        }
        if (x3 - x2) * (py - y2) > (y3 - y2) * (px - x2) {
            return false;
        }
        if (x1 - x3) * (py - y3) > (y1 - y3) * (px - x3) {
            return false;
        }
    }
    true
}
