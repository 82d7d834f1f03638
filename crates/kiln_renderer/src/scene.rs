//! Scene description loading.
//!
//! A scene file is JSON holding the camera settings, a material table and a
//! list of spheres referring to materials by index:
//!
//! ```json
//! {
//!   "camera": { "image_width": 400, "samples_per_pixel": 10 },
//!   "materials": [ { "type": "lambertian", "albedo": [0.8, 0.8, 0.0] } ],
//!   "spheres": [ { "center": [0.0, -100.5, -1.0], "radius": 100.0, "material": 0 } ]
//! }
//! ```

use crate::{CameraConfig, Color, Material, RenderError, Sphere};
use kiln_math::Point3;
use serde::{Deserialize, Serialize};

/// A sphere as written in a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereDescription {
    pub center: Point3,
    pub radius: f64,
    /// Index into the scene's material table
    pub material: usize,
}

/// Everything needed to render a frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub spheres: Vec<SphereDescription>,
}

impl SceneDescription {
    /// Parse a scene from JSON text.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let scene: Self = serde_json::from_str(json)?;
        log::debug!(
            "Parsed scene: {} materials, {} spheres",
            scene.materials.len(),
            scene.spheres.len()
        );
        Ok(scene)
    }

    /// Resolve material indices into spheres borrowing this scene's materials.
    pub fn build_spheres(&self) -> Result<Vec<Sphere<'_>>, RenderError> {
        self.spheres
            .iter()
            .enumerate()
            .map(|(i, sphere)| {
                let material = self.materials.get(sphere.material).ok_or_else(|| {
                    RenderError::InvalidScene(format!(
                        "sphere {} uses material {} but only {} are defined",
                        i,
                        sphere.material,
                        self.materials.len()
                    ))
                })?;

                if !(sphere.radius > 0.0 && sphere.radius.is_finite()) {
                    return Err(RenderError::InvalidScene(format!(
                        "sphere {} has radius {}, expected a positive finite value",
                        i, sphere.radius
                    )));
                }

                Ok(Sphere::new(sphere.center, sphere.radius, material))
            })
            .collect()
    }

    /// Built-in scene: a ground plane sphere, a diffuse center sphere, a
    /// glass sphere on the left and a fuzzy metal sphere on the right.
    pub fn demo() -> Self {
        let materials = vec![
            Material::lambertian(Color::new(0.8, 0.8, 0.0)),
            Material::lambertian(Color::new(0.1, 0.2, 0.5)),
            Material::dielectric(1.50),
            Material::metal(Color::new(0.8, 0.6, 0.2), 1.0),
        ];

        let spheres = vec![
            SphereDescription {
                center: Point3::new(0.0, -100.5, -1.0),
                radius: 100.0,
                material: 0,
            },
            SphereDescription {
                center: Point3::new(0.0, 0.0, -1.2),
                radius: 0.5,
                material: 1,
            },
            SphereDescription {
                center: Point3::new(-1.0, 0.0, -1.0),
                radius: 0.5,
                material: 2,
            },
            SphereDescription {
                center: Point3::new(1.0, 0.0, -1.0),
                radius: 0.5,
                material: 3,
            },
        ];

        Self {
            camera: CameraConfig::default(),
            materials,
            spheres,
        }
    }
}
