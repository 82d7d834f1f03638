//! Surface materials and how they scatter light.

use crate::hittable::HitRecord;
use kiln_math::random::random_unit_vector;
use kiln_math::{near_zero, reflect, refract, unit_vector, Color, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Result of a successful scatter: the color filter and the outgoing ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// The closed set of surface models the integrator understands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Material {
    /// Ideal diffuse surface.
    Lambertian { albedo: Color },
    /// Mirror-like surface; `fuzz` in [0, 1] roughens the reflection.
    Metal { albedo: Color, fuzz: f64 },
    /// Clear refractive surface such as glass or water.
    Dielectric { refraction_index: f64 },
}

impl Material {
    pub fn lambertian(albedo: Color) -> Self {
        Self::Lambertian { albedo }
    }

    /// `fuzz` is expected in [0, 1] and is not checked.
    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Self::Metal { albedo, fuzz }
    }

    /// `refraction_index`: 1.0 = air, 1.33 = water, 1.5 = glass.
    pub fn dielectric(refraction_index: f64) -> Self {
        Self::Dielectric { refraction_index }
    }

    /// Scatter an incoming ray at a surface hit.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        match *self {
            Material::Lambertian { albedo } => {
                let direction = diffuse_direction(rec.normal, random_unit_vector(rng));
                Some(Scatter {
                    attenuation: albedo,
                    scattered: Ray::new(rec.p, direction),
                })
            }

            Material::Metal { albedo, fuzz } => {
                // Unit reflection keeps the fuzz radius independent of ray length
                let reflected = unit_vector(reflect(ray_in.direction(), rec.normal));
                let direction = unit_vector(reflected + fuzz * random_unit_vector(rng));

                // Perturbed below the surface: absorb
                if direction.dot(rec.normal) > 0.0 {
                    Some(Scatter {
                        attenuation: albedo,
                        scattered: Ray::new(rec.p, direction),
                    })
                } else {
                    None
                }
            }

            Material::Dielectric { refraction_index } => {
                let ratio = if rec.front_face {
                    1.0 / refraction_index
                } else {
                    refraction_index
                };

                let unit_direction = unit_vector(ray_in.direction());
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                let cannot_refract = ratio * sin_theta > 1.0;
                let direction = if cannot_refract {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, ratio)
                };

                Some(Scatter {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction),
                })
            }
        }
    }
}

/// Lambertian bounce direction, falling back to the normal when the random
/// unit vector almost cancels it.
#[inline]
fn diffuse_direction(normal: Vec3, random_unit: Vec3) -> Vec3 {
    let direction = normal + random_unit;
    if near_zero(direction) {
        normal
    } else {
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hit_at(p: Vec3, normal: Vec3, front_face: bool, material: &Material) -> HitRecord<'_> {
        HitRecord {
            p,
            normal,
            t: 1.0,
            front_face,
            material,
        }
    }

    #[test]
    fn test_degenerate_diffuse_falls_back_to_normal() {
        let normal = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(diffuse_direction(normal, Vec3::new(0.0, -1.0, 0.0)), normal);
        assert_eq!(
            diffuse_direction(normal, Vec3::new(1.0, 0.0, 0.0)),
            Vec3::new(1.0, 1.0, 0.0)
        );
    }

    #[test]
    fn test_lambertian_scatters_from_hit_point() {
        let material = Material::lambertian(Color::new(0.8, 0.3, 0.3));
        let rec = hit_at(Vec3::new(0.0, 0.0, -0.5), Vec3::Z, true, &material);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..100 {
            let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(scatter.attenuation, Color::new(0.8, 0.3, 0.3));
            assert_eq!(scatter.scattered.origin(), rec.p);
            // normal + unit vector never points into the surface
            assert!(scatter.scattered.direction().dot(rec.normal) >= 0.0);
        }
    }

    #[test]
    fn test_metal_without_fuzz_is_exact_mirror() {
        let material = Material::metal(Color::new(0.8, 0.8, 0.8), 0.0);
        let normal = Vec3::Y;
        let rec = hit_at(Vec3::ZERO, normal, true, &material);
        let incoming = Vec3::new(2.0, -1.0, 0.5);
        let ray = Ray::new(Vec3::new(-2.0, 1.0, -0.5), incoming);
        let mut rng = StdRng::seed_from_u64(2);

        let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = unit_vector(reflect(incoming, normal));
        assert!((scatter.scattered.direction() - expected).length() < 1e-12);
        assert_eq!(scatter.attenuation, Color::new(0.8, 0.8, 0.8));
    }

    #[test]
    fn test_metal_fuzz_independent_of_ray_length() {
        let material = Material::metal(Color::ONE, 0.5);
        let rec = hit_at(Vec3::ZERO, Vec3::Y, true, &material);
        let incoming = unit_vector(Vec3::new(1.0, -1.0, 0.0));
        let short = Ray::new(Vec3::new(-1.0, 1.0, 0.0), incoming);
        let long = Ray::new(Vec3::new(-1.0, 1.0, 0.0), incoming * 10.0);

        for seed in 0..50 {
            let mut short_rng = StdRng::seed_from_u64(seed);
            let mut long_rng = StdRng::seed_from_u64(seed);
            let a = material.scatter(&short, &rec, &mut short_rng);
            let b = material.scatter(&long, &rec, &mut long_rng);

            match (a, b) {
                (Some(a), Some(b)) => {
                    let diff = a.scattered.direction() - b.scattered.direction();
                    assert!(diff.length() < 1e-12, "seed {}: {:?}", seed, diff);
                }
                (None, None) => {}
                (a, b) => panic!("seed {}: absorbed once but not twice ({:?}, {:?})", seed, a, b),
            }
        }
    }

    #[test]
    fn test_fuzzy_metal_never_scatters_below_surface() {
        let material = Material::metal(Color::ONE, 1.0);
        let rec = hit_at(Vec3::ZERO, Vec3::Y, true, &material);
        // Grazing incidence: many fuzzed reflections end up below the surface
        let ray = Ray::new(Vec3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0));
        let mut rng = StdRng::seed_from_u64(3);

        let mut absorbed = 0;
        for _ in 0..200 {
            match material.scatter(&ray, &rec, &mut rng) {
                Some(scatter) => {
                    let direction = scatter.scattered.direction();
                    assert!(direction.dot(rec.normal) > 0.0);
                    assert!((direction.length() - 1.0).abs() < 1e-9);
                }
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_dielectric_head_on_passes_straight_through() {
        let material = Material::dielectric(1.5);
        let rec = hit_at(Vec3::new(0.0, 0.0, -0.5), Vec3::Z, true, &material);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0));
        let mut rng = StdRng::seed_from_u64(4);

        let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(scatter.attenuation, Color::ONE);
        assert!((scatter.scattered.direction() - Vec3::NEG_Z).length() < 1e-12);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Material::dielectric(1.5);
        // Leaving glass at a grazing angle: back face, normal flipped toward the ray origin
        let normal = Vec3::NEG_Y;
        let rec = hit_at(Vec3::ZERO, normal, false, &material);
        let incoming = unit_vector(Vec3::new(1.0, 0.2, 0.0));
        let ray = Ray::new(-incoming, incoming);
        let mut rng = StdRng::seed_from_u64(5);

        let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = reflect(incoming, normal);
        assert!((scatter.scattered.direction() - expected).length() < 1e-12);
        assert!(scatter.scattered.direction().y < 0.0);
    }

    #[test]
    fn test_material_json() {
        let json = r#"[
            {"type": "lambertian", "albedo": [0.1, 0.2, 0.5]},
            {"type": "metal", "albedo": [0.8, 0.6, 0.2], "fuzz": 1.0},
            {"type": "dielectric", "refraction_index": 1.5}
        ]"#;
        let materials: Vec<Material> = serde_json::from_str(json).unwrap();
        assert_eq!(
            materials,
            vec![
                Material::lambertian(Color::new(0.1, 0.2, 0.5)),
                Material::metal(Color::new(0.8, 0.6, 0.2), 1.0),
                Material::dielectric(1.5),
            ]
        );
    }
}
