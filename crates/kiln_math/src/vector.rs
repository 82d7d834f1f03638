//! Free-standing vector helpers used by the shading code.

use crate::{Color, Vec3};

/// Components smaller than this count as zero in [`near_zero`].
const NEAR_ZERO_EPSILON: f64 = 1e-8;

/// Scale `v` to unit length.
///
/// The caller must not pass a zero vector; the result would be NaN.
#[inline]
pub fn unit_vector(v: Vec3) -> Vec3 {
    v / v.length()
}

/// Returns true if every component of `v` is close to zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.x.abs() < NEAR_ZERO_EPSILON && v.y.abs() < NEAR_ZERO_EPSILON && v.z.abs() < NEAR_ZERO_EPSILON
}

/// Reflect `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with normal `n`.
///
/// `etai_over_etat` is the ratio of refraction indices. Total internal
/// reflection is not detected here; callers check `ratio * sin_theta > 1`
/// first and reflect instead.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Channel accessors so colors read as colors.
pub trait ColorExt {
    fn r(&self) -> f64;
    fn g(&self) -> f64;
    fn b(&self) -> f64;
}

impl ColorExt for Color {
    #[inline]
    fn r(&self) -> f64 {
        self.x
    }

    #[inline]
    fn g(&self) -> f64 {
        self.y
    }

    #[inline]
    fn b(&self) -> f64 {
        self.z
    }
}
