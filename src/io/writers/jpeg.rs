use jpeg_encoder::{ColorType, Encoder};

use crate::core::buffer::PixelBuffer;
use crate::error::{Error, Result};
use crate::types::ColorLayout;

/// Encode as baseline JPEG. Alpha is dropped, gray stays single-channel.
pub fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> Result<Vec<u8>> {
    let cols = u16::try_from(buffer.width()).map_err(|_| Error::invalid("width", buffer.width()))?;
    let rows =
        u16::try_from(buffer.height()).map_err(|_| Error::invalid("height", buffer.height()))?;
    let color = buffer.color();
    let color_type = match color.layout() {
        ColorLayout::Gray => ColorType::Luma,
        _ => ColorType::Rgb,
    };

    let mut out = Vec::new();
    let encoder = Encoder::new(&mut out, quality.clamp(1, 100));
    encoder
        .encode(&color.to_vec(), cols, rows, color_type)
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(out)
}
