use std::path::Path;

use crate::core::buffer::PixelBuffer;
use crate::error::{Error, Result};
use crate::types::ColorLayout;

/// Decode PNG/JPEG/WebP (or any format `image` recognizes) into an 8-bit buffer.
///
/// Gray stays gray, gray+alpha becomes RGBA, 16-bit and float samples are reduced
/// to 8 bits.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes).map_err(|e| Error::DecodeFailure(e.to_string()))?;
    let (width, height) = (img.width(), img.height());
    let color = img.color();

    if color.has_alpha() {
        PixelBuffer::new(width, height, ColorLayout::Rgba, img.to_rgba8().into_raw())
    } else if color.channel_count() == 1 {
        PixelBuffer::new(width, height, ColorLayout::Gray, img.to_luma8().into_raw())
    } else {
        PixelBuffer::new(width, height, ColorLayout::Rgb, img.to_rgb8().into_raw())
    }
}

pub fn read_image(path: &Path) -> Result<PixelBuffer> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}
