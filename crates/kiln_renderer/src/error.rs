//! Error type for camera setup, scene loading and frame rendering.

use crate::camera::CameraHandle;
use kiln_core::PoolError;
use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid camera configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Camera registry is full ({capacity} cameras)")]
    ExhaustedRegistry { capacity: usize },

    #[error("Unknown camera handle: {0}")]
    UnknownCamera(CameraHandle),

    #[error("Framebuffer is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    FramebufferMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    #[error("Scene parse error: {0}")]
    SceneParse(#[from] serde_json::Error),

    #[error("Worker pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Allocation failed: {0}")]
    AllocationFailure(#[from] TryReserveError),
}
