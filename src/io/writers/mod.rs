//! Encoders for output artifacts: lossless PNG through `image`, JPEG through
//! `jpeg-encoder`.
pub mod jpeg;
pub mod png;

use crate::core::buffer::PixelBuffer;
use crate::error::Result;
use crate::types::OutputFormat;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Encode `buffer` in `format`. `quality` only applies to JPEG.
pub fn encode(buffer: &PixelBuffer, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Png => encode_png(buffer),
        OutputFormat::Jpeg => encode_jpeg(buffer, quality),
    }
}
