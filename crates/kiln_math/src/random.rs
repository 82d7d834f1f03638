//! Random scalar and vector generators.
//!
//! Every generator takes its random source explicitly so that each render
//! task can own an independently seeded stream.

use crate::Vec3;
use rand::{Rng, RngCore};

/// Lower bound on the squared length accepted by [`random_unit_vector`].
///
/// Rejecting tiny samples keeps the normalization from blowing up to
/// infinity.
const MIN_UNIT_SAMPLE_LENGTH_SQUARED: f64 = 1e-160;

/// Uniform f64 in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform f64 in [min, max).
#[inline]
pub fn gen_range_f64(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}

/// Vector with each component uniform in [0, 1).
pub fn random_vector01(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng), gen_f64(rng), gen_f64(rng))
}

/// Vector uniform in the box [min, max)^3.
pub fn random_vector_in(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        gen_range_f64(rng, min, max),
        gen_range_f64(rng, min, max),
        gen_range_f64(rng, min, max),
    )
}

/// Uniformly distributed direction on the unit sphere.
///
/// Rejection sampling: draw in [-1, 1)^3 until the point lies inside the
/// unit ball (and not too close to the origin), then project it out.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vector_in(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        if MIN_UNIT_SAMPLE_LENGTH_SQUARED < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Unit direction in the hemisphere around `normal`.
pub fn random_on_hemisphere(rng: &mut dyn RngCore, normal: Vec3) -> Vec3 {
    let on_unit_sphere = random_unit_vector(rng);
    if on_unit_sphere.dot(normal) > 0.0 {
        on_unit_sphere
    } else {
        -on_unit_sphere
    }
}

/// Sample a random point in the unit square [-0.5, 0.5) x [-0.5, 0.5), z = 0.
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5, 0.0)
}
