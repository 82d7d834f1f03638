//! Kiln renderer - tile-parallel CPU path tracing
//!
//! A Monte Carlo path tracer for spheres with diffuse, metal and glass
//! materials. Each frame is split into a 4x4 grid of tiles rendered on
//! their own worker threads into a shared packed-ARGB framebuffer.

mod camera;
mod error;
mod frame;
mod hittable;
mod material;
mod renderer;
mod scene;
mod sink;
mod sphere;
mod tile;

pub use camera::{Camera, CameraConfig, CameraHandle, CameraRegistry, DEFAULT_CAMERA_CAPACITY};
pub use error::RenderError;
pub use frame::{render_frame, render_tile, tile_seed, FrameStats, RenderTile};
pub use hittable::{HitRecord, Hittable};
pub use material::{Material, Scatter};
pub use renderer::{color_to_argb, linear_to_gamma, radiance, render_pixel, sky_gradient};
pub use scene::{SceneDescription, SphereDescription};
pub use sink::FramebufferSink;
pub use sphere::Sphere;
pub use tile::{Framebuffer, Tile, TileGrid, TileView, TILE_GRID_DIM};

/// Re-export the math types used throughout the renderer
pub use kiln_math::{Color, Interval, Point3, Ray, Vec3};
