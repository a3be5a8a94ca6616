#![doc = r#"
PixelMagic — raster image transformations for an image editing service.

This crate implements the pixel pipeline behind four operations: background
matte refinement, cropping, resizing under fit policies, and detail-preserving
upscaling. Every operation takes an in-memory `PixelBuffer` and returns a new one;
none holds state between calls, so any number may run in parallel.

Quick start: upscale an encoded image
-------------------------------------
```rust,no_run
use pixelmagic::{api::process_upscale, UpscaleSpec};

fn main() -> pixelmagic::Result<()> {
    let bytes = std::fs::read("photo.png")?;
    let upscaled = process_upscale(&bytes, &UpscaleSpec::new(4))?;
    std::fs::write("photo_4x.png", &upscaled.bytes)?;
    Ok(())
}
```

Working with buffers
--------------------
```rust
use pixelmagic::{crop, resize, CropRect, ColorLayout, FitMode, OutputFormat, PixelBuffer, ResizeSpec};

fn main() -> pixelmagic::Result<()> {
    let image = PixelBuffer::filled(100, 100, ColorLayout::Rgb, &[255, 255, 255])?;
    let cropped = crop(&image, CropRect::new(10, 10, 50, 50))?;
    assert_eq!(cropped.dimensions(), (50, 50));

    let spec = ResizeSpec::new(20, 10, FitMode::Cover, OutputFormat::Png, 90)?;
    assert_eq!(resize(&cropped, &spec)?.dimensions(), (20, 10));
    Ok(())
}
```

Background removal
------------------
Segmentation is delegated to an `AlphaEstimator`: any closure returning an
`AlphaChannel`, an `EmbeddedAlpha` reading the estimate from an RGBA image, or a
`PrecomputedMatte` loaded from disk. The estimate is then binarized, softened and
feathered by `refine`.

```rust
use pixelmagic::{remove_background, AlphaChannel, ColorLayout, PixelBuffer, SoftnessParams};

fn main() -> pixelmagic::Result<()> {
    let image = PixelBuffer::filled(8, 8, ColorLayout::Rgb, &[10, 20, 30])?;
    let oracle = |img: &PixelBuffer| -> pixelmagic::Result<AlphaChannel> {
        Ok(AlphaChannel::filled(img.width(), img.height(), 250))
    };
    let cutout = remove_background(&image, &oracle, SoftnessParams::new(2, 1))?;
    assert!(cutout.has_alpha());
    Ok(())
}
```

Error handling
--------------
All public functions return `pixelmagic::Result<T>`; match on `pixelmagic::Error`
to tell failure kinds apart, e.g. `InvalidCropBounds` or `UnsupportedScale`.

Useful modules
--------------
- [`api`] — byte-level and staged entry points.
- [`core`] — buffers, parameters and the processing primitives.
- [`io`] — decoding, PNG/JPEG writers and handle-based staging.
- [`types`] — enums (`FitMode`, `OutputFormat`, `UpscaleFactor`, `ColorLayout`).
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::buffer::{AlphaChannel, PixelBuffer};
pub use crate::core::params::{CropRect, ResizeSpec, SoftnessParams, UpscaleSpec};
pub use error::{Error, Result};
pub use types::{ColorLayout, FitMode, OutputFormat, UpscaleFactor};

// Operations
pub use crate::core::processing::crop::crop;
pub use crate::core::processing::matte::{
    AlphaEstimator, EmbeddedAlpha, PrecomputedMatte, refine, remove_background,
};
pub use crate::core::processing::resize::{fit_dimensions, resample, resize};
pub use crate::core::processing::upscale::{UnsharpMask, Upscaler, upscale};

// High-level API re-exports
pub use api::{
    EncodedImage, ProcessedImage, crop_staged, process_crop, process_remove_background,
    process_resize, process_upscale, remove_background_staged, resize_staged, upscale_staged,
};
pub use io::{Staging, StagingConfig, decode, encode};
