//! I/O layer: decoding uploaded bytes into pixel buffers, encoding outputs
//! (`writers`), and handle-based on-disk staging with retention cleanup.
pub mod decode;
pub use decode::{decode, read_image};

pub mod staging;
pub use staging::{Staging, StagingConfig, UploadedImage};

pub mod writers;
pub use writers::{encode, encode_jpeg, encode_png};
