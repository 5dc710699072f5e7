//! Hand-rolled 3-vector / 3x3-matrix kernel.
//!
//! Everything downstream (mass properties, integration, rasterization) runs
//! on these two value types, so they stay plain `f32` structs with no
//! allocation and no branching beyond what the formulas need.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn normalized(self) -> Self {
        self / self.length()
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Cosine of the angle between two vectors.
    pub fn norm_dot(self, other: Self) -> f32 {
        self.dot(other) / (self.length_squared() * other.length_squared()).sqrt()
    }

    pub fn project_onto(self, other: Self) -> Self {
        other * (self.dot(other) / other.dot(other))
    }
}

/// Scalar triple product `a . (b x c)`.
pub fn triple(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    a.x * (b.y * c.z - b.z * c.y) - a.y * (b.x * c.z - b.z * c.x) + a.z * (b.x * c.y - b.y * c.x)
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}
impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}
impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}
impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
impl MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}
impl Div<f32> for Vec3 {
    type Output = Vec3;
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}
impl DivAssign<f32> for Vec3 {
    fn div_assign(&mut self, rhs: f32) {
        self.x /= rhs;
        self.y /= rhs;
        self.z /= rhs;
    }
}
impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Row-major 3x3 matrix. Doubles as a general linear map and, when built
/// through [`Mat3::from_axis_angle`], a proper rotation; orientation updates
/// must only ever compose such rotations to keep orthonormality.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Mat3 {
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub const fn new(m: [[f32; 3]; 3]) -> Self {
        Self { m }
    }

    pub const fn diagonal(a: f32, b: f32, c: f32) -> Self {
        Self {
            m: [[a, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, c]],
        }
    }

    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::new(self.m[i][0], self.m[i][1], self.m[i][2])
    }

    pub fn col(&self, i: usize) -> Vec3 {
        Vec3::new(self.m[0][i], self.m[1][i], self.m[2][i])
    }

    pub fn transpose(&self) -> Self {
        let [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]] = self.m;
        Self::new([[a1, b1, c1], [a2, b2, c2], [a3, b3, c3]])
    }

    pub fn det(&self) -> f32 {
        let [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]] = self.m;
        a1 * (b2 * c3 - b3 * c2) - a2 * (b1 * c3 - b3 * c1) + a3 * (b1 * c2 - b2 * c1)
    }

    /// Classical adjugate inverse. Undefined for a numerically singular
    /// matrix; callers guarantee well-conditioned input.
    pub fn inverse(&self) -> Self {
        let [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]] = self.m;
        let inv_det = 1.0 / self.det();
        Self::new([
            [
                (b2 * c3 - b3 * c2) * inv_det,
                (c2 * a3 - a2 * c3) * inv_det,
                (a2 * b3 - a3 * b2) * inv_det,
            ],
            [
                (c1 * b3 - b1 * c3) * inv_det,
                (a1 * c3 - c1 * a3) * inv_det,
                (a3 * b1 - a1 * b3) * inv_det,
            ],
            [
                (b1 * c2 - c1 * b2) * inv_det,
                (a2 * c1 - a1 * c2) * inv_det,
                (a1 * b2 - a2 * b1) * inv_det,
            ],
        ])
    }

    /// Rodrigues rotation about `axis` (normalized here) by `angle` radians.
    /// A zero axis is invalid input; callers with a possibly-zero axis
    /// (angular velocity) must short-circuit before getting here.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        debug_assert!(axis.length_squared() > 0.0, "zero rotation axis");
        let (sin_t, cos_t) = angle.sin_cos();
        let k = 1.0 - cos_t;
        let a = axis.normalized();
        let (x, y, z) = (a.x, a.y, a.z);
        Self::new([
            [
                x * x * k + cos_t,
                x * y * k - z * sin_t,
                x * z * k + y * sin_t,
            ],
            [
                x * y * k + z * sin_t,
                y * y * k + cos_t,
                y * z * k - x * sin_t,
            ],
            [
                x * z * k - y * sin_t,
                y * z * k + x * sin_t,
                z * z * k + cos_t,
            ],
        ])
    }
}

impl Add for Mat3 {
    type Output = Mat3;
    fn add(self, rhs: Mat3) -> Mat3 {
        let mut m = self.m;
        for r in 0..3 {
            for c in 0..3 {
                m[r][c] += rhs.m[r][c];
            }
        }
        Mat3 { m }
    }
}
impl AddAssign for Mat3 {
    fn add_assign(&mut self, rhs: Mat3) {
        *self = *self + rhs;
    }
}
impl Sub for Mat3 {
    type Output = Mat3;
    fn sub(self, rhs: Mat3) -> Mat3 {
        let mut m = self.m;
        for r in 0..3 {
            for c in 0..3 {
                m[r][c] -= rhs.m[r][c];
            }
        }
        Mat3 { m }
    }
}
impl Mul<f32> for Mat3 {
    type Output = Mat3;
    fn mul(self, rhs: f32) -> Mat3 {
        let mut m = self.m;
        for row in m.iter_mut() {
            for v in row.iter_mut() {
                *v *= rhs;
            }
        }
        Mat3 { m }
    }
}
impl Div<f32> for Mat3 {
    type Output = Mat3;
    fn div(self, rhs: f32) -> Mat3 {
        let mut m = self.m;
        for row in m.iter_mut() {
            for v in row.iter_mut() {
                *v /= rhs;
            }
        }
        Mat3 { m }
    }
}
impl Mul for Mat3 {
    type Output = Mat3;
    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut m = [[0.0; 3]; 3];
        for r in 0..3 {
            for c in 0..3 {
                m[r][c] = self.m[r][0] * rhs.m[0][c]
                    + self.m[r][1] * rhs.m[1][c]
                    + self.m[r][2] * rhs.m[2][c];
            }
        }
        Mat3 { m }
    }
}
impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Vec3 {
        Vec3::new(
            self.m[0][0] * rhs.x + self.m[0][1] * rhs.y + self.m[0][2] * rhs.z,
            self.m[1][0] * rhs.x + self.m[1][1] * rhs.y + self.m[1][2] * rhs.z,
            self.m[2][0] * rhs.x + self.m[2][1] * rhs.y + self.m[2][2] * rhs.z,
        )
    }
}
