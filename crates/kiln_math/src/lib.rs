// Re-export glam for convenience
pub use glam::*;

// Kiln math types
mod interval;
mod ray;
mod vector;
pub mod random;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{near_zero, reflect, refract, unit_vector, ColorExt};

/// 3-component vector used for positions, directions and colors.
pub type Vec3 = DVec3;

/// A position in world space.
pub type Point3 = DVec3;

/// Linear RGB color, one channel per component.
pub type Color = DVec3;
