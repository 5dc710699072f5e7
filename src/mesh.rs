//! Colored triangles and their signed-tetrahedron contributions.
//!
//! Mass properties of a closed mesh are accumulated per triangle over the
//! tetrahedron spanned by the coordinate origin and the triangle. The sign
//! of each contribution comes from the scalar triple product of the
//! vertices, so contributions outside the solid cancel and the origin may
//! lie anywhere.

use crate::math::{triple, Mat3, Vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Black doubles as the "no hit" sentinel in the unlit color buffer.
    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub color: Rgb,
}

impl Triangle {
    pub const fn new(a: Vec3, b: Vec3, c: Vec3, color: Rgb) -> Self {
        Self { a, b, c, color }
    }

    /// Unnormalized face normal `(b - a) x (c - a)`.
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a)
    }

    /// Swaps two vertices unless the tetrahedron (origin, a, b, c) already
    /// has positive signed volume. Applied to primitives built around the
    /// origin this makes every face wind outward.
    pub fn make_right_handed(&mut self) {
        if triple(self.a, self.b, self.c) <= 0.0 {
            std::mem::swap(&mut self.b, &mut self.c);
        }
    }

    pub fn signed_tetra_volume(&self) -> f32 {
        triple(self.a, self.b, self.c) / 6.0
    }

    pub fn tetra_centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 4.0
    }

    /// Inertia tensor of the origin tetrahedron about the origin, for unit
    /// density. Closed-form polynomial moments over the three vertices,
    /// scaled by the Jacobian determinant so the sign matches the signed
    /// volume of the same tetrahedron.
    pub fn tetra_inertia(&self) -> Mat3 {
        let (x2, y2, z2) = (self.a.x, self.a.y, self.a.z);
        let (x3, y3, z3) = (self.b.x, self.b.y, self.b.z);
        let (x4, y4, z4) = (self.c.x, self.c.y, self.c.z);

        let ixx = (y2 * y2 + y2 * y3 + y3 * y3 + y2 * y4 + y3 * y4 + y4 * y4
            + z2 * z2 + z2 * z3 + z3 * z3 + z2 * z4 + z3 * z4 + z4 * z4)
            / 60.0;
        let iyy = (x2 * x2 + x2 * x3 + x3 * x3 + x2 * x4 + x3 * x4 + x4 * x4
            + z2 * z2 + z2 * z3 + z3 * z3 + z2 * z4 + z3 * z4 + z4 * z4)
            / 60.0;
        let izz = (x2 * x2 + x2 * x3 + x3 * x3 + x2 * x4 + x3 * x4 + x4 * x4
            + y2 * y2 + y2 * y3 + y3 * y3 + y2 * y4 + y3 * y4 + y4 * y4)
            / 60.0;

        let ixy = (2.0 * x2 * y2 + x3 * y2 + x4 * y2 + x2 * y3 + 2.0 * x3 * y3 + x4 * y3
            + x2 * y4 + x3 * y4 + 2.0 * x4 * y4)
            / 120.0;
        let ixz = (2.0 * x2 * z2 + x3 * z2 + x4 * z2 + x2 * z3 + 2.0 * x3 * z3 + x4 * z3
            + x2 * z4 + x3 * z4 + 2.0 * x4 * z4)
            / 120.0;
        let iyz = (2.0 * y2 * z2 + y3 * z2 + y4 * z2 + y2 * z3 + 2.0 * y3 * z3 + y4 * z3
            + y2 * z4 + y3 * z4 + 2.0 * y4 * z4)
            / 120.0;

        let jacobian = triple(self.a, self.b, self.c);
        Mat3::new([[ixx, -ixy, -ixz], [-ixy, iyy, -iyz], [-ixz, -iyz, izz]]) * jacobian
    }

    pub fn translated(&self, d: Vec3) -> Self {
        Self::new(self.a + d, self.b + d, self.c + d, self.color)
    }

    pub fn rotated(&self, m: Mat3) -> Self {
        Self::new(m * self.a, m * self.b, m * self.c, self.color)
    }
}

/// Thin red/green/blue slivers along the +X/+Y/+Z world axes, drawn by the
/// demo as a static orientation reference.
pub fn axis_markers() -> [Triangle; 3] {
    [
        Triangle::new(
            Vec3::ZERO,
            Vec3::new(300.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
            Rgb::RED,
        ),
        Triangle::new(
            Vec3::ZERO,
            Vec3::new(0.0, 300.0, 0.0),
            Vec3::new(0.0, 0.0, 10.0),
            Rgb::GREEN,
        ),
        Triangle::new(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 300.0),
            Vec3::new(10.0, 0.0, 0.0),
            Rgb::BLUE,
        ),
    ]
}
