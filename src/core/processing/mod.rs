//! Transformation pipeline. `filters`, `enhance` and the resampling half of
//! `resize` form the primitive layer; `crop`, `resize`, `upscale` and `matte`
//! are the operations built on it.
pub mod crop;
pub mod enhance;
pub mod filters;
pub mod matte;
pub mod resize;
pub mod upscale;
