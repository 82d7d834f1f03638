//! Presentation sink for finished frames.

/// Receives finished framebuffers.
///
/// `bytes` holds `height` rows of `width` packed `0xAARRGGBB` words in native
/// byte order, top row first, with a stride of `width * 4`.
pub trait FramebufferSink {
    type Error;

    fn submit_framebuffer(
        &mut self,
        width: u32,
        height: u32,
        byte_size: usize,
        bytes: &[u8],
    ) -> Result<(), Self::Error>;
}
