use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{FitMode, OutputFormat, UpscaleFactor};

/// Rectangle in pixel coordinates, origin at the top-left corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rectangle is non-empty and lies inside a `width x height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        self.width > 0
            && self.height > 0
            && right.is_some_and(|r| r <= width)
            && bottom.is_some_and(|b| b <= height)
    }
}

impl std::fmt::Display for CropRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Target box, layout policy and output encoding of a resize.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeSpec {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub mode: FitMode,
    #[serde(default)]
    pub format: OutputFormat,
    /// JPEG quality in [1, 100]; ignored for PNG
    #[serde(default = "default_quality")]
    pub quality: u8,
}

fn default_quality() -> u8 {
    90
}

impl ResizeSpec {
    pub fn new(
        width: u32,
        height: u32,
        mode: FitMode,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Self> {
        let spec = Self {
            width,
            height,
            mode,
            format,
            quality,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(Error::ZeroSize { what: "width" });
        }
        if self.height == 0 {
            return Err(Error::ZeroSize { what: "height" });
        }
        if !(1..=100).contains(&self.quality) {
            return Err(Error::invalid("quality", self.quality));
        }
        Ok(())
    }
}

/// Upscale request. `scale` stays a raw integer so that out-of-set values can be
/// reported as `UnsupportedScale` by the upscaler itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpscaleSpec {
    pub scale: u32,
}

impl UpscaleSpec {
    pub fn new(scale: u32) -> Self {
        Self { scale }
    }

    pub fn factor(&self) -> Result<UpscaleFactor> {
        UpscaleFactor::try_from(self.scale)
    }
}

impl Default for UpscaleSpec {
    fn default() -> Self {
        Self { scale: 2 }
    }
}

/// Edge controls of the matte refiner. Both knobs compose.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftnessParams {
    /// Drives the in-place edge smoothing radius
    #[serde(default)]
    pub softness: u32,
    /// Drives the outward edge expansion and fade
    #[serde(default)]
    pub feather: u32,
}

impl SoftnessParams {
    pub fn new(softness: u32, feather: u32) -> Self {
        Self { softness, feather }
    }
}
