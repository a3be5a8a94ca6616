//! Core building blocks: pixel buffers, operation parameters and the
//! transformation primitives. These are consumed by the high-level `api` module.
pub mod buffer;
pub mod params;
pub mod processing;
