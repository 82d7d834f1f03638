//! Core path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative path tracing bounded by the camera's max depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::{Camera, Color, Hittable, Interval, Ray, Sphere};
use kiln_math::{unit_vector, ColorExt};
use rand::RngCore;

/// Rays closer than this to their origin are ignored to avoid shadow acne.
const MIN_HIT_DISTANCE: f64 = 0.001;

/// Tone mapped components are clamped to this range before quantizing.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Compute the color seen by a ray.
///
/// Follows the ray through the scene, bouncing off surfaces and
/// accumulating attenuation until it escapes to the sky, gets absorbed
/// or runs out of depth. Bounces are walked in a loop, so stack use does
/// not grow with `depth`.
pub fn radiance(ray: &Ray, scene: &[Sphere<'_>], depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;

    for _ in 0..depth {
        let Some(rec) = scene.hit(&ray, Interval::new(MIN_HIT_DISTANCE, f64::INFINITY)) else {
            return throughput * sky_gradient(&ray);
        };

        match rec.material.scatter(&ray, &rec, rng) {
            Some(scatter) => {
                throughput *= scatter.attenuation;
                ray = scatter.scattered;
            }
            None => return Color::ZERO,
        }

        // A black path gathers nothing more
        if throughput == Color::ZERO {
            return Color::ZERO;
        }
    }

    // Out of bounces: no more light is gathered
    Color::ZERO
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = unit_vector(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    scene: &[Sphere<'_>],
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        // get_ray already jitters inside the pixel
        let ray = camera.get_ray(x, y, rng);
        pixel_color += radiance(&ray, scene, camera.max_depth, rng);
    }

    pixel_color * camera.pixel_samples_scale()
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize one linear color component to a byte.
#[inline]
fn to_byte(linear: f64) -> u32 {
    (256.0 * INTENSITY.clamp(linear_to_gamma(linear))) as u32
}

/// Convert a linear color to a packed `0xAARRGGBB` word with opaque alpha.
pub fn color_to_argb(color: Color) -> u32 {
    let r = to_byte(color.r());
    let g = to_byte(color.g());
    let b = to_byte(color.b());
    (0xFF << 24) | (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraConfig, Material};
    use kiln_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_depth_is_black() {
        let material = Material::lambertian(Color::ONE);
        let scene = [Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, &material)];
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(radiance(&ray, &scene, 0, &mut rng), Color::ZERO);

        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(radiance(&ray, &scene, 0, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_miss_returns_sky() {
        let mut rng = StdRng::seed_from_u64(0);

        let up = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(radiance(&up, &[], 5, &mut rng), Color::new(0.5, 0.7, 1.0));

        let down = Ray::new(Vec3::ZERO, Vec3::NEG_Y);
        assert_eq!(radiance(&down, &[], 5, &mut rng), Color::ONE);

        let level = Ray::new(Vec3::ZERO, Vec3::X);
        assert!((sky_gradient(&level) - Color::new(0.75, 0.85, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_single_bounce_is_black() {
        // With one bounce left the scattered ray has no depth to gather sky light
        let material = Material::lambertian(Color::ONE);
        let scene = [Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, &material)];
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(radiance(&ray, &scene, 1, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_mirror_attenuates_sky() {
        let material = Material::metal(Color::new(0.5, 0.5, 0.5), 0.0);
        let scene = [Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, &material)];
        let mut rng = StdRng::seed_from_u64(2);

        // Head-on hit reflects straight back along +z, a horizon sky sample
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let color = radiance(&ray, &scene, 2, &mut rng);
        assert!((color - Color::new(0.375, 0.425, 0.5)).length() < 1e-9);
    }

    #[test]
    fn test_deep_paths_run_on_small_stack() {
        // Camera inside a closed diffuse sphere: the path never escapes and
        // bounces until the depth runs out
        let result = std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(|| {
                let material = Material::lambertian(Color::new(0.5, 0.5, 0.5));
                let scene = [Sphere::new(Vec3::ZERO, 10.0, &material)];
                let mut rng = StdRng::seed_from_u64(4);
                let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
                radiance(&ray, &scene, 1_000_000, &mut rng)
            })
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(result, Color::ZERO);
    }

    #[test]
    fn test_absorbing_path_stops_early() {
        let material = Material::lambertian(Color::ZERO);
        let scene = [Sphere::new(Vec3::ZERO, 10.0, &material)];
        let mut rng = StdRng::seed_from_u64(5);

        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(radiance(&ray, &scene, u32::MAX, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_render_pixel_is_sample_average() {
        let camera = Camera::new(
            CameraConfig::default()
                .with_image(16, 1.0)
                .with_quality(8, 4),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        // Empty scene: every sample is a sky color, so the average stays in range
        let color = render_pixel(&camera, &[], 8, 0, &mut rng);
        assert!(color.x >= 0.5 && color.x <= 1.0);
        assert!(color.y >= 0.7 && color.y <= 1.0);
        assert!((color.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.25), 0.5);
        assert_eq!(linear_to_gamma(1.0), 1.0);
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-0.5), 0.0);
    }

    #[test]
    fn test_color_to_argb_layout() {
        assert_eq!(color_to_argb(Color::ZERO), 0xFF00_0000);
        assert_eq!(color_to_argb(Color::ONE), 0xFFFF_FFFF);
        assert_eq!(color_to_argb(Color::new(1.0, 0.0, 0.0)), 0xFFFF_0000);
        assert_eq!(color_to_argb(Color::new(0.0, 1.0, 0.0)), 0xFF00_FF00);
        assert_eq!(color_to_argb(Color::new(0.0, 0.0, 1.0)), 0xFF00_00FF);

        // 0.25 -> gamma 0.5 -> 128
        assert_eq!(color_to_argb(Color::new(0.25, 0.25, 0.25)), 0xFF80_8080);

        // Out of range values saturate
        assert_eq!(color_to_argb(Color::new(4.0, -1.0, f64::NAN)), 0xFFFF_0000);
    }
}
