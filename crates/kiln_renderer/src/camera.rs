//! Camera configuration, ray generation and the camera registry.

use crate::RenderError;
use kiln_core::GrowArray;
use kiln_math::random::sample_square;
use kiln_math::{Point3, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of cameras a registry can hold.
pub const DEFAULT_CAMERA_CAPACITY: usize = 10;

/// User-facing camera settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Distance from the camera center to the viewport
    pub focal_length: f64,
    /// Image width in pixels
    pub image_width: i32,
    /// Viewport height in world units
    pub viewport_height: f64,
    /// Count of random samples for each pixel
    pub samples_per_pixel: i32,
    /// Maximum number of ray bounces into the scene
    pub max_depth: i32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            focal_length: 1.0,
            image_width: 400,
            viewport_height: 2.0,
            samples_per_pixel: 10,
            max_depth: 10,
        }
    }
}

impl CameraConfig {
    /// Set image width and aspect ratio.
    pub fn with_image(mut self, image_width: i32, aspect_ratio: f64) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: i32, max_depth: i32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, focal_length: f64, viewport_height: f64) -> Self {
        self.focal_length = focal_length;
        self.viewport_height = viewport_height;
        self
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.samples_per_pixel <= 0 {
            return Err(RenderError::InvalidConfiguration(format!(
                "samples_per_pixel must be positive, got {}",
                self.samples_per_pixel
            )));
        }
        if self.image_width <= 0 {
            return Err(RenderError::InvalidConfiguration(format!(
                "image_width must be positive, got {}",
                self.image_width
            )));
        }
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return Err(RenderError::InvalidConfiguration(format!(
                "aspect_ratio must be positive and finite, got {}",
                self.aspect_ratio
            )));
        }
        if self.max_depth < 0 {
            return Err(RenderError::InvalidConfiguration(format!(
                "max_depth must not be negative, got {}",
                self.max_depth
            )));
        }
        Ok(())
    }
}

/// Camera with its per-pixel ray-generation parameters precomputed.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,

    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    center: Point3,
    /// Location of pixel (0, 0)
    pixel00_loc: Point3,
    /// Offset to the pixel on the right
    pixel_delta_u: Vec3,
    /// Offset to the pixel below
    pixel_delta_v: Vec3,
    /// Color scale factor for a sum of pixel samples
    pixel_samples_scale: f64,
}

impl Camera {
    /// Validate `config` and derive the viewport.
    pub fn new(config: CameraConfig) -> Result<Self, RenderError> {
        config.validate()?;

        let image_width = config.image_width as u32;
        let image_height = ((config.image_width as f64 / config.aspect_ratio) as u32).max(1);
        let center = Point3::ZERO;

        // Viewport dimensions follow the integer resolution, not the requested ratio
        let viewport_height = config.viewport_height;
        let viewport_width = viewport_height * image_width as f64 / image_height as f64;

        // Across the horizontal and down the vertical viewport edges
        let viewport_u = Vec3::new(viewport_width, 0.0, 0.0);
        let viewport_v = Vec3::new(0.0, -viewport_height, 0.0);

        let pixel_delta_u = viewport_u / image_width as f64;
        let pixel_delta_v = viewport_v / image_height as f64;

        let viewport_upper_left = center
            - Vec3::new(0.0, 0.0, config.focal_length)
            - viewport_u / 2.0
            - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        Ok(Self {
            config,
            image_width,
            image_height,
            samples_per_pixel: config.samples_per_pixel as u32,
            max_depth: config.max_depth as u32,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            pixel_samples_scale: 1.0 / config.samples_per_pixel as f64,
        })
    }

    /// Generate a ray through a randomly jittered point of pixel (x, y).
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);
        let pixel_sample = self.pixel00_loc
            + (x as f64 + offset.x) * self.pixel_delta_u
            + (y as f64 + offset.y) * self.pixel_delta_v;

        Ray::new(self.center, pixel_sample - self.center)
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn pixel00_loc(&self) -> Point3 {
        self.pixel00_loc
    }

    pub fn pixel_delta_u(&self) -> Vec3 {
        self.pixel_delta_u
    }

    pub fn pixel_delta_v(&self) -> Vec3 {
        self.pixel_delta_v
    }

    /// 1 / samples_per_pixel.
    pub fn pixel_samples_scale(&self) -> f64 {
        self.pixel_samples_scale
    }
}

/// Opaque handle to a camera stored in a [`CameraRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraHandle(u32);

impl fmt::Display for CameraHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camera#{}", self.0)
    }
}

/// Bounded store of cameras addressed by handle.
///
/// Handles are never reused, not even after [`CameraRegistry::reset`].
#[derive(Debug)]
pub struct CameraRegistry {
    cameras: GrowArray<Camera>,
    capacity: usize,
    /// Handle value of `cameras[0]`
    first_handle: u32,
}

impl CameraRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            cameras: GrowArray::new(),
            capacity,
            first_handle: 0,
        }
    }

    /// Create a camera from `config` and return its handle.
    pub fn create_camera(&mut self, config: CameraConfig) -> Result<CameraHandle, RenderError> {
        if self.cameras.len() >= self.capacity {
            log::error!("Camera registry exhausted ({} cameras)", self.capacity);
            return Err(RenderError::ExhaustedRegistry {
                capacity: self.capacity,
            });
        }

        let camera = Camera::new(config)?;
        let handle = CameraHandle(self.first_handle + self.cameras.len() as u32);
        log::debug!(
            "Created {}: {}x{}, {} spp, depth {}",
            handle,
            camera.image_width,
            camera.image_height,
            camera.samples_per_pixel,
            camera.max_depth
        );
        self.cameras.push(camera)?;
        Ok(handle)
    }

    /// Look up a camera.
    pub fn get(&self, handle: CameraHandle) -> Result<&Camera, RenderError> {
        handle
            .0
            .checked_sub(self.first_handle)
            .and_then(|index| self.cameras.get(index as usize))
            .ok_or(RenderError::UnknownCamera(handle))
    }

    /// Generate a jittered ray through pixel (x, y) of the camera `handle`.
    pub fn generate_ray(
        &self,
        handle: CameraHandle,
        x: u32,
        y: u32,
        rng: &mut dyn RngCore,
    ) -> Result<Ray, RenderError> {
        Ok(self.get(handle)?.get_ray(x, y, rng))
    }

    /// Drop every camera. Previously issued handles become unknown.
    pub fn reset(&mut self) {
        self.first_handle += self.cameras.len() as u32;
        self.cameras.clear();
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CameraRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CAMERA_CAPACITY)
    }
}
