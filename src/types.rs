//! Shared enums used across PixelMagic.
//! Includes `ColorLayout`, `FitMode`, `OutputFormat` and `UpscaleFactor`.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Channel layout of a `PixelBuffer`. Every sample is 8-bit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ColorLayout {
    Gray,
    Rgb,
    Rgba,
}

impl ColorLayout {
    pub fn channels(self) -> usize {
        match self {
            ColorLayout::Gray => 1,
            ColorLayout::Rgb => 3,
            ColorLayout::Rgba => 4,
        }
    }

    pub fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(ColorLayout::Gray),
            3 => Some(ColorLayout::Rgb),
            4 => Some(ColorLayout::Rgba),
            _ => None,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, ColorLayout::Rgba)
    }
}

impl std::fmt::Display for ColorLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorLayout::Gray => write!(f, "Gray"),
            ColorLayout::Rgb => write!(f, "RGB"),
            ColorLayout::Rgba => write!(f, "RGBA"),
        }
    }
}

/// Layout policy of the fit resizer.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Preserve aspect ratio and fit inside the target box
    #[default]
    #[value(alias = "fit")]
    #[serde(alias = "fit")]
    Contain,
    /// Preserve aspect ratio, cover the target box and center-crop the excess
    #[value(alias = "fill")]
    #[serde(alias = "fill")]
    Cover,
    /// Ignore aspect ratio
    Stretch,
}

impl std::fmt::Display for FitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitMode::Contain => write!(f, "Contain"),
            FitMode::Cover => write!(f, "Cover"),
            FitMode::Stretch => write!(f, "Stretch"),
        }
    }
}

#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    #[value(alias = "jpg")]
    #[serde(alias = "jpg")]
    Jpeg, // Lossy, drops alpha
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "PNG"),
            OutputFormat::Jpeg => write!(f, "JPEG"),
        }
    }
}

/// Closed set of integer upscale factors.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum UpscaleFactor {
    X2,
    X4,
    X8,
}

impl UpscaleFactor {
    pub fn get(self) -> u32 {
        match self {
            UpscaleFactor::X2 => 2,
            UpscaleFactor::X4 => 4,
            UpscaleFactor::X8 => 8,
        }
    }
}

impl TryFrom<u32> for UpscaleFactor {
    type Error = Error;

    fn try_from(scale: u32) -> Result<Self, Self::Error> {
        match scale {
            2 => Ok(UpscaleFactor::X2),
            4 => Ok(UpscaleFactor::X4),
            8 => Ok(UpscaleFactor::X8),
            _ => Err(Error::UnsupportedScale { scale }),
        }
    }
}

impl From<UpscaleFactor> for u32 {
    fn from(factor: UpscaleFactor) -> Self {
        factor.get()
    }
}

impl std::fmt::Display for UpscaleFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.get())
    }
}
