//! Matte refinement: turns a raw opacity estimate from a segmentation oracle into
//! a clean, edge-controlled alpha channel.
//!
//! The oracle is an `AlphaEstimator`; the refiner never depends on how the estimate
//! was produced. Refinement runs three passes over the whole alpha plane:
//!
//! 1. binarization: samples above 200 become 255, below 30 become 0;
//! 2. softness (when `softness > 0`): Gaussian blur with radius `softness * 0.3`;
//! 3. feather (when `feather > 0`): blur `feather * 0.5`, 3x3 dilation, then blur
//!    `feather * 0.25`, growing the silhouette outward with a gradual fade.
use ndarray::{Array2, ArrayView2, Zip};
use tracing::{debug, info};

use crate::core::buffer::{AlphaChannel, PixelBuffer};
use crate::core::params::SoftnessParams;
use crate::core::processing::filters::{gaussian_blur_plane, max_filter_3x3};
use crate::error::{Error, Result};
use crate::types::ColorLayout;

pub const OPAQUE_THRESHOLD: u8 = 200;
pub const TRANSPARENT_THRESHOLD: u8 = 30;
pub const SOFTNESS_RADIUS_FACTOR: f32 = 0.3;
pub const FEATHER_RADIUS_FACTOR: f32 = 0.5;

/// Source of raw per-pixel opacity estimates.
pub trait AlphaEstimator {
    fn estimate_alpha(&self, image: &PixelBuffer) -> Result<AlphaChannel>;
}

impl<F> AlphaEstimator for F
where
    F: Fn(&PixelBuffer) -> Result<AlphaChannel>,
{
    fn estimate_alpha(&self, image: &PixelBuffer) -> Result<AlphaChannel> {
        self(image)
    }
}

/// Reads the estimate already embedded in an RGBA image, e.g. one returned by a
/// segmentation service. Images without alpha are treated as fully opaque.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedAlpha;

impl AlphaEstimator for EmbeddedAlpha {
    fn estimate_alpha(&self, image: &PixelBuffer) -> Result<AlphaChannel> {
        Ok(image
            .alpha()
            .unwrap_or_else(|| AlphaChannel::filled(image.width(), image.height(), 255)))
    }
}

/// Oracle output computed out of band and loaded from disk.
///
/// RGBA mattes yield their alpha channel, gray mattes their samples and RGB mattes
/// their luma.
#[derive(Debug, Clone)]
pub struct PrecomputedMatte {
    matte: PixelBuffer,
}

impl PrecomputedMatte {
    pub fn new(matte: PixelBuffer) -> Self {
        Self { matte }
    }
}

impl AlphaEstimator for PrecomputedMatte {
    fn estimate_alpha(&self, _image: &PixelBuffer) -> Result<AlphaChannel> {
        match self.matte.layout() {
            ColorLayout::Rgba => self
                .matte
                .alpha()
                .ok_or_else(|| Error::invalid("matte", "missing alpha channel")),
            ColorLayout::Gray => Ok(AlphaChannel::from_array(self.matte.plane(0).to_owned())),
            ColorLayout::Rgb => {
                let view = self.matte.view();
                let (height, width, _) = view.dim();
                let luma = Array2::from_shape_fn((height, width), |(y, x)| {
                    let l = 0.299 * f32::from(view[[y, x, 0]])
                        + 0.587 * f32::from(view[[y, x, 1]])
                        + 0.114 * f32::from(view[[y, x, 2]]);
                    l.round().clamp(0.0, 255.0) as u8
                });
                Ok(AlphaChannel::from_array(luma))
            }
        }
    }
}

fn binarize(alpha: ArrayView2<'_, u8>) -> Array2<u8> {
    let mut out = alpha.to_owned();
    Zip::from(&mut out).par_for_each(|v| {
        if *v > OPAQUE_THRESHOLD {
            *v = 255;
        } else if *v < TRANSPARENT_THRESHOLD {
            *v = 0;
        }
    });
    out
}

fn soften(alpha: Array2<u8>, softness: u32) -> Array2<u8> {
    if softness == 0 {
        return alpha;
    }
    let radius = softness as f32 * SOFTNESS_RADIUS_FACTOR;
    debug!("Softening alpha edges with radius {}", radius);
    gaussian_blur_plane(alpha.view(), radius)
}

pub(crate) fn feather_with(alpha: Array2<u8>, feather: u32, dilate: bool) -> Array2<u8> {
    if feather == 0 {
        return alpha;
    }
    let radius = feather as f32 * FEATHER_RADIUS_FACTOR;
    debug!("Feathering alpha edges with radius {}", radius);
    let blurred = gaussian_blur_plane(alpha.view(), radius);
    let expanded = if dilate {
        max_filter_3x3(blurred.view())
    } else {
        blurred
    };
    gaussian_blur_plane(expanded.view(), radius * 0.5)
}

/// Refine `raw_alpha` for `image`. Only the dimensions of `image` are consulted.
pub fn refine(
    image: &PixelBuffer,
    raw_alpha: &AlphaChannel,
    params: SoftnessParams,
) -> Result<AlphaChannel> {
    if raw_alpha.dimensions() != image.dimensions() {
        return Err(Error::DimensionMismatch {
            image: image.dimensions(),
            alpha: raw_alpha.dimensions(),
        });
    }
    let alpha = binarize(raw_alpha.view());
    let alpha = soften(alpha, params.softness);
    let alpha = feather_with(alpha, params.feather, true);
    Ok(AlphaChannel::from_array(alpha))
}

/// Estimate, refine and attach a matte to `image`, producing RGBA.
pub fn remove_background(
    image: &PixelBuffer,
    oracle: &dyn AlphaEstimator,
    params: SoftnessParams,
) -> Result<PixelBuffer> {
    info!(
        "Removing background of {}x{} image (softness={}, feather={})",
        image.width(),
        image.height(),
        params.softness,
        params.feather
    );
    let raw = oracle.estimate_alpha(image)?;
    let refined = refine(image, &raw, params)?;
    image.with_alpha(&refined)
}
