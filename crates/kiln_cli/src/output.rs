//! PNG presentation sink.

use anyhow::{bail, Context, Result};
use image::{Rgba, RgbaImage};
use kiln_renderer::FramebufferSink;
use std::path::{Path, PathBuf};

/// Writes each submitted framebuffer to a PNG file, replacing the previous one.
pub struct PngSink {
    path: PathBuf,
}

impl PngSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Unpack a `0xAARRGGBB` word into RGBA channels.
fn argb_to_rgba(word: u32) -> Rgba<u8> {
    let [a, r, g, b] = word.to_be_bytes();
    Rgba([r, g, b, a])
}

/// Convert packed ARGB framebuffer bytes to an RGBA image.
fn to_rgba_image(width: u32, height: u32, byte_size: usize, bytes: &[u8]) -> Result<RgbaImage> {
    let expected = width as usize * height as usize * 4;
    if byte_size != expected || bytes.len() != expected {
        bail!(
            "Framebuffer of {}x{} should be {} bytes, got byte_size {} and {} bytes",
            width,
            height,
            expected,
            byte_size,
            bytes.len()
        );
    }

    let mut image = RgbaImage::new(width, height);
    for (pixel, word) in image.pixels_mut().zip(bytes.chunks_exact(4)) {
        *pixel = argb_to_rgba(u32::from_ne_bytes([word[0], word[1], word[2], word[3]]));
    }
    Ok(image)
}

impl FramebufferSink for PngSink {
    type Error = anyhow::Error;

    fn submit_framebuffer(&mut self, width: u32, height: u32, byte_size: usize, bytes: &[u8]) -> Result<()> {
        let image = to_rgba_image(width, height, byte_size, bytes)?;
        image
            .save(&self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        log::info!("Image saved as {}", self.path.display());
        Ok(())
    }
}
