use std::path::PathBuf;
use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Destination already exists: {path:?}. Use --force to overwrite")]
    DestinationExists { path: PathBuf },

    #[error("Input file has no usable name: {path:?}")]
    UnnamedInput { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] pixelmagic::Error),
}
