//! 3D Math Utilities for Wireframe Ornaments
//!
//! Vectors, unit quaternions for orientation, and column-major 4x4 matrices
//! for the model/view/projection chain.

use std::ops::{Add, Mul, Sub};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy; near-zero vectors collapse to zero
    #[inline]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 1e-8 {
            *self * (1.0 / len)
        } else {
            Self::zero()
        }
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Approximate equality check for floating point comparison
    #[cfg(test)]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }

    /// Rotate around X axis
    #[inline]
    pub fn rotate_x(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x,
            y: self.y * cos - self.z * sin,
            z: self.y * sin + self.z * cos,
        }
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

/// 2D Vector (normalized placement plane)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Approximate equality check for floating point comparison
    #[cfg(test)]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

// ============================================================================
// Quaternion
// ============================================================================

/// Rotation quaternion (x, y, z vector part, w scalar part)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quat {
    /// Cosine threshold above which slerp degrades to normalized lerp
    pub const SLERP_LINEAR_THRESHOLD: f32 = 0.9995;

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    pub fn from_axis_angle(axis: Vec3, radians: f32) -> Self {
        let axis = axis.normalize();
        let (s, c) = (radians * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Euler angles in radians: pitch about X, yaw about Y, roll about Z
    pub fn from_euler(pitch: f32, yaw: f32, roll: f32) -> Self {
        let (sx, cx) = (pitch * 0.5).sin_cos();
        let (sy, cy) = (yaw * 0.5).sin_cos();
        let (sz, cz) = (roll * 0.5).sin_cos();
        Self {
            w: cx * cy * cz + sx * sy * sz,
            x: sx * cy * cz - cx * sy * sz,
            y: cx * sy * cz + sx * cy * sz,
            z: cx * cy * sz - sx * sy * cz,
        }
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy; a degenerate quaternion becomes identity
    pub fn normalize(&self) -> Self {
        let len = self.norm();
        if len < 1e-8 {
            return Self::identity();
        }
        let inv = 1.0 / len;
        Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
    }

    /// Hamilton product `self * rhs` (applies `rhs` first, then `self`)
    pub fn mul(&self, rhs: &Self) -> Self {
        let (a, b) = (self, rhs);
        Self {
            w: a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
            x: a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            y: a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            z: a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        }
    }

    /// Spherical linear interpolation along the shorter arc.
    ///
    /// Nearly parallel inputs fall back to a normalized lerp so the
    /// `sin(theta)` divisor never approaches zero.
    pub fn slerp(&self, other: &Self, t: f32) -> Self {
        let a = self.normalize();
        let mut b = other.normalize();
        let mut dot = a.dot(&b);
        if dot < 0.0 {
            b = Self::new(-b.x, -b.y, -b.z, -b.w);
            dot = -dot;
        }

        if dot > Self::SLERP_LINEAR_THRESHOLD {
            return Self::new(
                a.x + t * (b.x - a.x),
                a.y + t * (b.y - a.y),
                a.z + t * (b.z - a.z),
                a.w + t * (b.w - a.w),
            )
            .normalize();
        }

        let theta = dot.min(1.0).acos();
        let sin_theta = theta.sin();
        let s1 = ((1.0 - t) * theta).sin() / sin_theta;
        let s2 = (t * theta).sin() / sin_theta;
        Self::new(
            a.x * s1 + b.x * s2,
            a.y * s1 + b.y * s2,
            a.z * s1 + b.z * s2,
            a.w * s1 + b.w * s2,
        )
    }

    /// Rotate a vector by this (unit) quaternion
    #[cfg(test)]
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(&v) * 2.0;
        v + t * self.w + u.cross(&t)
    }

    /// Approximate equality, treating `q` and `-q` as the same rotation
    #[cfg(test)]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        let same = (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
            && (self.w - other.w).abs() < epsilon;
        let flipped = (self.x + other.x).abs() < epsilon
            && (self.y + other.y).abs() < epsilon
            && (self.z + other.z).abs() < epsilon
            && (self.w + other.w).abs() < epsilon;
        same || flipped
    }
}

// ============================================================================
// Mat4
// ============================================================================

/// 4x4 matrix, column-major (`m[col * 4 + row]`), OpenGL conventions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub const fn identity() -> Self {
        Self {
            m: [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.m[col * 4 + row]
    }

    /// Matrix product `self * rhs` (applies `rhs` first)
    pub fn mul(&self, rhs: &Self) -> Self {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = (0..4).map(|k| self.at(row, k) * rhs.at(k, col)).sum();
            }
        }
        Self { m: out }
    }

    pub fn translation(t: Vec3) -> Self {
        let mut out = Self::identity();
        out.m[12] = t.x;
        out.m[13] = t.y;
        out.m[14] = t.z;
        out
    }

    pub fn scale(s: f32) -> Self {
        let mut out = Self::identity();
        out.m[0] = s;
        out.m[5] = s;
        out.m[10] = s;
        out
    }

    /// Right-handed perspective projection, `fovy` in radians
    pub fn perspective(fovy: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        let f = 1.0 / (fovy * 0.5).tan();
        let mut m = [0.0; 16];
        m[0] = f / aspect;
        m[5] = f;
        m[10] = (zfar + znear) / (znear - zfar);
        m[11] = -1.0;
        m[14] = (2.0 * zfar * znear) / (znear - zfar);
        Self { m }
    }

    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        let f = (center - eye).normalize();
        let s = f.cross(&up).normalize();
        let u = s.cross(&f);
        let mut out = Self::identity();
        out.m[0] = s.x;
        out.m[4] = s.y;
        out.m[8] = s.z;
        out.m[1] = u.x;
        out.m[5] = u.y;
        out.m[9] = u.z;
        out.m[2] = -f.x;
        out.m[6] = -f.y;
        out.m[10] = -f.z;
        out.m[12] = -s.dot(&eye);
        out.m[13] = -u.dot(&eye);
        out.m[14] = f.dot(&eye);
        out
    }

    pub fn from_quat(q: Quat) -> Self {
        let Quat { x, y, z, w } = q.normalize();
        let mut out = Self::identity();
        out.m[0] = 1.0 - 2.0 * y * y - 2.0 * z * z;
        out.m[1] = 2.0 * x * y + 2.0 * w * z;
        out.m[2] = 2.0 * x * z - 2.0 * w * y;
        out.m[4] = 2.0 * x * y - 2.0 * w * z;
        out.m[5] = 1.0 - 2.0 * x * x - 2.0 * z * z;
        out.m[6] = 2.0 * y * z + 2.0 * w * x;
        out.m[8] = 2.0 * x * z + 2.0 * w * y;
        out.m[9] = 2.0 * y * z - 2.0 * w * x;
        out.m[10] = 1.0 - 2.0 * x * x - 2.0 * y * y;
        out
    }

    /// Transform a point (w = 1), returning homogeneous (x, y, z, w)
    pub fn transform_point(&self, p: Vec3) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = self.at(row, 0) * p.x + self.at(row, 1) * p.y + self.at(row, 2) * p.z
                + self.at(row, 3);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_slerp_identical_inputs() {
        let q = Quat::from_euler(0.3, -1.1, 0.7);
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!(q.slerp(&q, t).approx_eq(&q, 1e-5), "t={}", t);
        }
    }

    #[test]
    fn test_slerp_endpoints_and_midpoint() {
        let a = Quat::identity();
        let b = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), FRAC_PI_2);
        assert!(a.slerp(&b, 0.0).approx_eq(&a, 1e-5));
        assert!(a.slerp(&b, 1.0).approx_eq(&b, 1e-5));

        let mid = a.slerp(&b, 0.5);
        let expected = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), FRAC_PI_2 / 2.0);
        assert!(mid.approx_eq(&expected, 1e-5));
        assert!((mid.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_slerp_takes_shorter_arc() {
        let a = Quat::identity();
        let b = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), 0.4);
        let negated = Quat::new(-b.x, -b.y, -b.z, -b.w);
        let via_negated = a.slerp(&negated, 0.5);
        let direct = a.slerp(&b, 0.5);
        assert!(via_negated.approx_eq(&direct, 1e-5));
    }

    #[test]
    fn test_quat_rotate_matches_matrix() {
        let q = Quat::from_euler(0.4, 1.2, -0.3);
        let m = Mat4::from_quat(q);
        let v = Vec3::new(0.5, -0.25, 1.0);
        let by_quat = q.rotate(v);
        let [x, y, z, w] = m.transform_point(v);
        assert!((w - 1.0).abs() < 1e-6);
        assert!(by_quat.approx_eq(&Vec3::new(x, y, z), 1e-5));
    }

    #[test]
    fn test_axis_angle_yaw_rotates_x_toward_negative_z() {
        let q = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), FRAC_PI_2);
        let v = q.rotate(Vec3::new(1.0, 0.0, 0.0));
        assert!(v.approx_eq(&Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn test_mat4_mul_applies_right_first() {
        let t = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        let s = Mat4::scale(2.0);
        let [x, y, z, _] = t.mul(&s).transform_point(Vec3::new(1.0, 1.0, 1.0));
        assert!(Vec3::new(x, y, z).approx_eq(&Vec3::new(3.0, 4.0, 5.0), 1e-6));
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let eye = Vec3::new(0.0, 0.0, 3.0);
        let view = Mat4::look_at(eye, Vec3::zero(), Vec3::new(0.0, 1.0, 0.0));
        let [x, y, z, _] = view.transform_point(eye);
        assert!(Vec3::new(x, y, z).approx_eq(&Vec3::zero(), 1e-6));
        let [_, _, z, _] = view.transform_point(Vec3::zero());
        assert!((z + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_perspective_maps_near_and_far_planes() {
        let p = Mat4::perspective(1.0, 1.5, 0.1, 10.0);
        let [_, _, z, w] = p.transform_point(Vec3::new(0.0, 0.0, -0.1));
        assert!((z / w + 1.0).abs() < 1e-4);
        let [_, _, z, w] = p.transform_point(Vec3::new(0.0, 0.0, -10.0));
        assert!((z / w - 1.0).abs() < 1e-4);
    }
}
