use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::core::buffer::PixelBuffer;
use crate::error::{Error, Result};
use crate::types::ColorLayout;

/// Lossless PNG with the layout of `buffer`.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let color_type = match buffer.layout() {
        ColorLayout::Gray => ExtendedColorType::L8,
        ColorLayout::Rgb => ExtendedColorType::Rgb8,
        ColorLayout::Rgba => ExtendedColorType::Rgba8,
    };
    let mut out = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(&buffer.to_vec(), buffer.width(), buffer.height(), color_type)
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(out)
}
