//! Rigid bodies: mass properties, welding, torque-free integration.

use crate::math::{Mat3, Vec3};
use crate::mesh::{Rgb, Triangle};

/// Angular speeds squared below this skip the orientation update entirely,
/// because the rotation constructor cannot normalize a zero axis.
const SPIN_EPS: f32 = 1e-12;

/// A symmetric inertia tensor (or its inverse; the operations below apply to
/// both). Welding chains several frame changes, and doing them through named
/// operations keeps the tensor-vs-inverse bookkeeping readable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InertiaTensor(pub Mat3);

impl InertiaTensor {
    /// Body frame -> world frame: `R * I * R^T`.
    pub fn to_world(self, orient: Mat3) -> Self {
        Self(orient * self.0 * orient.transpose())
    }

    /// Parallel-axis shift from the center of mass to a point offset by
    /// `offset`.
    pub fn shift(self, offset: Vec3, mass: f32) -> Self {
        Self(self.0 + offset_matrix(offset) * mass)
    }

    /// Parallel-axis shift from an arbitrary reference point back to the
    /// center of mass, `offset` being the center's position in that frame.
    pub fn shift_to_com(self, offset: Vec3, mass: f32) -> Self {
        Self(self.0 - offset_matrix(offset) * mass)
    }

    pub fn invert(self) -> Self {
        Self(self.0.inverse())
    }
}

impl std::ops::Add for InertiaTensor {
    type Output = InertiaTensor;
    fn add(self, rhs: InertiaTensor) -> InertiaTensor {
        InertiaTensor(self.0 + rhs.0)
    }
}

impl std::ops::Mul<Vec3> for InertiaTensor {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.0 * rhs
    }
}

/// Huygens-Steiner correction matrix for a displacement `a`, per unit mass.
fn offset_matrix(a: Vec3) -> Mat3 {
    Mat3::new([
        [a.y * a.y + a.z * a.z, -a.x * a.y, -a.x * a.z],
        [-a.x * a.y, a.x * a.x + a.z * a.z, -a.y * a.z],
        [-a.x * a.z, -a.y * a.z, a.x * a.x + a.y * a.y],
    ])
}

/// A closed triangle mesh with mass properties and free-motion state.
///
/// Triangles are body-local, relative to the center of mass at construction.
/// Angular momentum is the stored conserved quantity; angular velocity is
/// always derived from it through the current orientation.
#[derive(Clone, Debug)]
pub struct RigidBody {
    pub triangles: Vec<Triangle>,
    pub volume: f32,
    pub mass: f32,
    pub cm_pos: Vec3,
    pub cm_vel: Vec3,
    pub ang_mom: Vec3,
    /// World-from-body rotation. Only ever composed with rotations from
    /// [`Mat3::from_axis_angle`], which keeps it orthonormal.
    pub orient: Mat3,
    /// Inverse inertia tensor in the body frame.
    pub inv_inertia: InertiaTensor,
}

impl RigidBody {
    /// Builds a body from a closed, outward-wound mesh of uniform `density`
    /// by summing signed tetrahedra between the origin and every triangle.
    /// The mesh is re-expressed relative to the computed center of mass.
    ///
    /// A mesh with non-positive total volume is invalid input; the inertia
    /// inversion would be garbage.
    pub fn from_mesh(density: f32, mut triangles: Vec<Triangle>) -> Self {
        let mut volume = 0.0;
        let mut weighted_centroid = Vec3::ZERO;
        let mut inertia = Mat3::default();

        for tri in &triangles {
            let v = tri.signed_tetra_volume();
            volume += v;
            weighted_centroid += tri.tetra_centroid() * v;
            inertia += tri.tetra_inertia();
        }
        debug_assert!(volume > 0.0, "mesh must enclose positive volume");

        let mass = density * volume;
        // Constant density, so dividing by volume instead of mass is fine.
        let cm = weighted_centroid / volume;
        let about_cm = InertiaTensor(inertia * density).shift_to_com(cm, mass);

        for tri in &mut triangles {
            *tri = tri.translated(-cm);
        }

        Self {
            triangles,
            volume,
            mass,
            cm_pos: cm,
            cm_vel: Vec3::ZERO,
            ang_mom: Vec3::ZERO,
            orient: Mat3::IDENTITY,
            inv_inertia: about_cm.invert(),
        }
    }

    /// Axis-aligned box with the standard closed-form inertia, used both for
    /// building scenes and as a cross-check of the mesh decomposition path.
    pub fn cuboid(density: f32, x: f32, y: f32, z: f32) -> Self {
        let volume = x * y * z;
        let mass = density * volume;
        Self {
            triangles: cuboid_mesh(x, y, z),
            volume,
            mass,
            cm_pos: Vec3::ZERO,
            cm_vel: Vec3::ZERO,
            ang_mom: Vec3::ZERO,
            orient: Mat3::IDENTITY,
            inv_inertia: InertiaTensor(Mat3::diagonal(
                12.0 / (mass * (y * y + z * z)),
                12.0 / (mass * (x * x + z * z)),
                12.0 / (mass * (x * x + y * y)),
            )),
        }
    }

    /// Regular icosahedron from the golden-ratio vertex set, scaled by `a`
    /// (half the edge length), built through the general mesh path.
    pub fn icosahedron(density: f32, a: f32) -> Self {
        let phi = 0.5 * (1.0 + 5.0_f32.sqrt());
        let v = [
            Vec3::new(phi * a, a, 0.0),
            Vec3::new(phi * a, -a, 0.0),
            Vec3::new(-phi * a, -a, 0.0),
            Vec3::new(-phi * a, a, 0.0),
            Vec3::new(a, 0.0, phi * a),
            Vec3::new(-a, 0.0, phi * a),
            Vec3::new(-a, 0.0, -phi * a),
            Vec3::new(a, 0.0, -phi * a),
            Vec3::new(0.0, phi * a, a),
            Vec3::new(0.0, phi * a, -a),
            Vec3::new(0.0, -phi * a, -a),
            Vec3::new(0.0, -phi * a, a),
        ];
        let faces = [
            (4, 5, 8),
            (4, 5, 11),
            (4, 8, 0),
            (5, 8, 3),
            (5, 11, 2),
            (4, 11, 1),
            (4, 0, 1),
            (5, 3, 2),
            (2, 11, 10),
            (1, 11, 10),
            (0, 8, 9),
            (3, 8, 9),
            (0, 1, 7),
            (2, 3, 6),
            (0, 7, 9),
            (1, 7, 10),
            (2, 6, 10),
            (3, 6, 9),
            (6, 7, 9),
            (6, 7, 10),
        ];
        let mut triangles: Vec<Triangle> = faces
            .iter()
            .map(|&(i, j, k)| Triangle::new(v[i], v[j], v[k], Rgb::WHITE))
            .collect();
        for tri in &mut triangles {
            tri.make_right_handed();
        }
        Self::from_mesh(density, triangles)
    }

    /// Rigidly joins two bodies into one. Both meshes are carried into the
    /// merged local frame (own orientation applied, then offset from the new
    /// center of mass), the inertia tensors are transported to the new
    /// center and summed, and the merged orientation resets to identity.
    /// Motion state resets to rest; callers re-apply spin afterwards.
    pub fn weld(a: &RigidBody, b: &RigidBody) -> Self {
        let mass = a.mass + b.mass;
        let volume = a.volume + b.volume;
        let cm_pos = (a.cm_pos * a.mass + b.cm_pos * b.mass) / mass;

        let mut triangles = Vec::with_capacity(a.triangles.len() + b.triangles.len());
        let shift_a = a.cm_pos - cm_pos;
        for tri in &a.triangles {
            triangles.push(tri.rotated(a.orient).translated(shift_a));
        }
        let shift_b = b.cm_pos - cm_pos;
        for tri in &b.triangles {
            triangles.push(tri.rotated(b.orient).translated(shift_b));
        }

        let combined = a
            .inv_inertia
            .invert()
            .to_world(a.orient)
            .shift(cm_pos - a.cm_pos, a.mass)
            + b.inv_inertia
                .invert()
                .to_world(b.orient)
                .shift(cm_pos - b.cm_pos, b.mass);

        Self {
            triangles,
            volume,
            mass,
            cm_pos,
            cm_vel: Vec3::ZERO,
            ang_mom: Vec3::ZERO,
            orient: Mat3::IDENTITY,
            inv_inertia: combined.invert(),
        }
    }

    /// Current angular velocity, derived from the conserved angular momentum:
    /// `w = R * I^-1 * R^T * L`.
    pub fn ang_vel(&self) -> Vec3 {
        self.inv_inertia.to_world(self.orient) * self.ang_mom
    }

    /// One fixed step of free motion. The incremental rotation about the
    /// instantaneous spin axis conserves angular momentum exactly; energy
    /// and orthonormality drift grows with `dt`.
    pub fn step(&mut self, dt: f32) {
        let w = self.ang_vel();
        self.cm_pos += self.cm_vel * dt;
        let w_sq = w.length_squared();
        if w_sq > SPIN_EPS {
            self.orient = Mat3::from_axis_angle(w, w_sq.sqrt() * dt) * self.orient;
        }
    }

    pub fn translate(&mut self, d: Vec3) {
        self.cm_pos += d;
    }

    pub fn paint_face(&mut self, idx: usize, color: Rgb) {
        self.triangles[idx].color = color;
    }
}

/// The 12 outward-wound triangles of an origin-centered box.
pub fn cuboid_mesh(x: f32, y: f32, z: f32) -> Vec<Triangle> {
    let v1 = Vec3::new(x / 2.0, y / 2.0, z / 2.0);
    let v2 = Vec3::new(x / 2.0, y / 2.0, -z / 2.0);
    let v3 = Vec3::new(x / 2.0, -y / 2.0, z / 2.0);
    let v4 = Vec3::new(x / 2.0, -y / 2.0, -z / 2.0);
    let v5 = Vec3::new(-x / 2.0, y / 2.0, z / 2.0);
    let v6 = Vec3::new(-x / 2.0, y / 2.0, -z / 2.0);
    let v7 = Vec3::new(-x / 2.0, -y / 2.0, z / 2.0);
    let v8 = Vec3::new(-x / 2.0, -y / 2.0, -z / 2.0);

    let faces = [
        (v1, v2, v3),
        (v4, v2, v3),
        (v5, v6, v7),
        (v8, v6, v7),
        (v1, v3, v5),
        (v7, v3, v5),
        (v2, v4, v6),
        (v8, v4, v6),
        (v1, v2, v5),
        (v6, v2, v5),
        (v3, v4, v7),
        (v8, v4, v7),
    ];
    faces
        .iter()
        .map(|&(a, b, c)| {
            let mut tri = Triangle::new(a, b, c, Rgb::WHITE);
            tri.make_right_handed();
            tri
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_decomposition_matches_closed_form_box() {
        let (x, y, z, density) = (50.0, 100.0, 50.0, 1e-4);
        let from_mesh = RigidBody::from_mesh(density, cuboid_mesh(x, y, z));
        let closed = RigidBody::cuboid(density, x, y, z);

        assert!((from_mesh.volume - x * y * z).abs() / (x * y * z) < 1e-4);
        assert!((from_mesh.mass - closed.mass).abs() / closed.mass < 1e-4);
        assert!(from_mesh.cm_pos.length() < 1e-2);

        let inertia = from_mesh.inv_inertia.invert().0;
        let expected = closed.inv_inertia.invert().0;
        for r in 0..3 {
            for c in 0..3 {
                if r == c {
                    assert!((inertia.m[r][c] - expected.m[r][c]).abs() / expected.m[r][c] < 1e-3);
                } else {
                    assert!(inertia.m[r][c].abs() / expected.m[r][r] < 1e-3);
                }
            }
        }
    }

    #[test]
    fn icosahedron_is_centered_and_isotropic() {
        let a = 1.0;
        let body = RigidBody::icosahedron(1.0, a);
        // V = (5/12)(3 + sqrt(5)) * edge^3, edge = 2a.
        let expected = 5.0 / 12.0 * (3.0 + 5.0_f32.sqrt()) * 8.0 * a * a * a;
        assert!((body.volume - expected).abs() / expected < 1e-3);
        assert!(body.cm_pos.length() < 1e-4);

        let i = body.inv_inertia.invert().0;
        assert!((i.m[0][0] - i.m[1][1]).abs() / i.m[0][0] < 1e-3);
        assert!((i.m[1][1] - i.m[2][2]).abs() / i.m[0][0] < 1e-3);
        assert!(i.m[0][1].abs() / i.m[0][0] < 1e-3);
    }

    #[test]
    fn weld_reproduces_parallel_axis_result() {
        let s = 10.0;
        let d = 15.0;
        let mut left = RigidBody::cuboid(1.0, s, s, s);
        left.translate(Vec3::new(-d, 0.0, 0.0));
        let mut right = RigidBody::cuboid(1.0, s, s, s);
        right.translate(Vec3::new(d, 0.0, 0.0));

        let pair = RigidBody::weld(&left, &right);
        assert!(pair.cm_pos.length() < 1e-3);
        assert!((pair.mass - 2000.0).abs() < 1e-2);

        let m = 1000.0;
        let box_term = m * (s * s + s * s) / 12.0;
        let ixx = 2.0 * box_term;
        let iyy = 2.0 * (box_term + m * d * d);
        let inertia = pair.inv_inertia.invert().0;
        assert!((inertia.m[0][0] - ixx).abs() / ixx < 1e-3);
        assert!((inertia.m[1][1] - iyy).abs() / iyy < 1e-3);
        assert!((inertia.m[2][2] - iyy).abs() / iyy < 1e-3);
        assert!(inertia.m[0][1].abs() / iyy < 1e-4);
    }

    #[test]
    fn weld_resets_pose_and_motion() {
        let mut a = RigidBody::cuboid(1.0, 2.0, 2.0, 2.0);
        a.ang_mom = Vec3::new(1.0, 2.0, 3.0);
        a.cm_vel = Vec3::X;
        a.orient = Mat3::from_axis_angle(Vec3::Z, 0.5);
        let b = RigidBody::cuboid(1.0, 2.0, 2.0, 2.0);

        let welded = RigidBody::weld(&a, &b);
        assert_eq!(welded.orient, Mat3::IDENTITY);
        assert_eq!(welded.ang_mom, Vec3::ZERO);
        assert_eq!(welded.cm_vel, Vec3::ZERO);
    }

    #[test]
    fn zero_spin_is_a_fixed_point() {
        let mut body = RigidBody::cuboid(1.0, 1.0, 2.0, 3.0);
        for _ in 0..100 {
            body.step(0.01);
        }
        assert_eq!(body.orient, Mat3::IDENTITY);
        assert_eq!(body.cm_pos, Vec3::ZERO);
    }

    #[test]
    fn linear_motion_is_uniform() {
        let mut body = RigidBody::cuboid(1.0, 1.0, 1.0, 1.0);
        body.cm_vel = Vec3::new(1.0, -2.0, 0.5);
        for _ in 0..100 {
            body.step(0.01);
        }
        assert!((body.cm_pos - Vec3::new(1.0, -2.0, 0.5)).length() < 1e-4);
    }

    #[test]
    fn off_axis_spin_tumbles_while_conserving_momentum() {
        let mut body = RigidBody::cuboid(1.0, 1.0, 2.0, 3.0);
        body.ang_mom = Vec3::new(3.0, 4.0, 0.0);
        let w0 = body.ang_vel();

        for _ in 0..1000 {
            body.step(0.001);
        }

        // The stored momentum is the conserved quantity and is never touched.
        assert_eq!(body.ang_mom, Vec3::new(3.0, 4.0, 0.0));

        // Orientation stays close to orthonormal over many small steps.
        let gram = body.orient.transpose() * body.orient;
        for r in 0..3 {
            for c in 0..3 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert!((gram.m[r][c] - expected).abs() < 1e-2);
            }
        }

        // Momentum off the principal axes makes the spin axis wander.
        let w1 = body.ang_vel();
        assert!(w0.norm_dot(w1) < 0.999);
    }

    #[test]
    fn spin_about_principal_axis_keeps_velocity_aligned() {
        let mut body = RigidBody::cuboid(1.0, 1.0, 2.0, 3.0);
        body.ang_mom = Vec3::new(0.0, 0.0, 5.0);
        for _ in 0..500 {
            body.step(0.001);
        }
        assert!(body.ang_vel().norm_dot(Vec3::Z) > 0.9999);
    }
}
