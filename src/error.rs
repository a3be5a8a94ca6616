//! Crate-level error type and `Result` alias for structured error handling.
//! Every variant except `OptionalRefinementFailure` is terminal for the operation
//! that raised it; that one is absorbed inside the upscaler and never returned.
use thiserror::Error;

use crate::core::params::CropRect;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Alpha dimensions {alpha:?} do not match image dimensions {image:?}")]
    DimensionMismatch { image: (u32, u32), alpha: (u32, u32) },

    #[error("Invalid crop bounds {rect} for a {width}x{height} image")]
    InvalidCropBounds {
        rect: CropRect,
        width: u32,
        height: u32,
    },

    #[error("Scale must be 2, 4, or 8, got: {scale}")]
    UnsupportedScale { scale: u32 },

    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),

    #[error("Optional refinement failed: {0}")]
    OptionalRefinementFailure(String),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("{what} must be greater than 0")]
    ZeroSize { what: &'static str },

    #[error("File too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Unsupported image format: {0}. Only JPG, PNG, WEBP allowed")]
    UnsupportedFormat(String),

    #[error("Image not found: {handle}")]
    NotFound { handle: String },

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }

    pub(crate) fn invalid(arg: &'static str, value: impl ToString) -> Self {
        Error::InvalidArgument {
            arg,
            value: value.to_string(),
        }
    }
}

