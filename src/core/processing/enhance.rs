//! Linear enhancements that blend an image with a degenerate version of itself,
//! plus the unsharp mask used by the upscaler.
//!
//! `out = degenerate + factor * (image - degenerate)`, clamped and truncated. A factor
//! of 1.0 is the identity, larger factors push away from the degenerate image.
use ndarray::{Array3, Zip};

use crate::core::buffer::PixelBuffer;
use crate::core::processing::filters::{gaussian_blur, smooth_3x3, truncate_u8};
use crate::error::{Error, Result};
use crate::types::ColorLayout;

fn blend(degenerate: &PixelBuffer, image: &PixelBuffer, factor: f32) -> Result<PixelBuffer> {
    let mut out = Array3::<u8>::zeros(image.view().dim());
    Zip::from(&mut out)
        .and(&degenerate.view())
        .and(&image.view())
        .par_for_each(|o, &d, &v| {
            let d = f32::from(d);
            *o = truncate_u8(d + factor * (f32::from(v) - d));
        });
    PixelBuffer::from_array(out)
}

/// Sharpness enhancement against the 3x3 smoothed image.
pub fn sharpness(image: &PixelBuffer, factor: f32) -> Result<PixelBuffer> {
    let smoothed = image.map_planes(smooth_3x3);
    blend(&smoothed, image, factor)
}

/// Rounded mean luma (`0.299 R + 0.587 G + 0.114 B`) over all pixels.
pub fn mean_luma(image: &PixelBuffer) -> u8 {
    let view = image.view();
    let (height, width, _) = view.dim();
    if height == 0 || width == 0 {
        return 0;
    }
    let total: f64 = match image.layout() {
        ColorLayout::Gray => view.iter().map(|&v| f64::from(v)).sum(),
        ColorLayout::Rgb | ColorLayout::Rgba => view
            .outer_iter()
            .map(|row| {
                row.outer_iter()
                    .map(|px| {
                        0.299 * f64::from(px[0]) + 0.587 * f64::from(px[1]) + 0.114 * f64::from(px[2])
                    })
                    .sum::<f64>()
            })
            .sum(),
    };
    (total / (height * width) as f64).round().clamp(0.0, 255.0) as u8
}

/// Contrast enhancement against a flat image of the mean luma.
pub fn contrast(image: &PixelBuffer, factor: f32) -> Result<PixelBuffer> {
    let mean = f32::from(mean_luma(image));
    let mut out = Array3::<u8>::zeros(image.view().dim());
    Zip::from(&mut out)
        .and(&image.view())
        .par_for_each(|o, &v| *o = truncate_u8(mean + factor * (f32::from(v) - mean)));
    PixelBuffer::from_array(out)
}

/// `image + amount * (image - blur(image, radius))`, clamped to [0, 255] and truncated.
///
/// Fails with `OptionalRefinementFailure` on unusable parameters, a shape
/// disagreement between the image and its blur, or non-finite intermediates.
pub fn unsharp_mask(image: &PixelBuffer, radius: f32, amount: f32) -> Result<PixelBuffer> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(Error::OptionalRefinementFailure(format!(
            "unusable blur radius {radius}"
        )));
    }
    if !amount.is_finite() {
        return Err(Error::OptionalRefinementFailure(format!(
            "unusable amount {amount}"
        )));
    }
    let blurred = gaussian_blur(image, radius);
    if blurred.view().dim() != image.view().dim() {
        return Err(Error::OptionalRefinementFailure(format!(
            "blurred shape {:?} differs from image shape {:?}",
            blurred.view().dim(),
            image.view().dim()
        )));
    }

    let mut sharpened = Array3::<f32>::zeros(image.view().dim());
    Zip::from(&mut sharpened)
        .and(&image.view())
        .and(&blurred.view())
        .par_for_each(|s, &v, &b| {
            let v = f32::from(v);
            *s = v + amount * (v - f32::from(b));
        });
    if sharpened.iter().any(|v| !v.is_finite()) {
        return Err(Error::OptionalRefinementFailure(
            "non-finite value in sharpened image".to_string(),
        ));
    }
    PixelBuffer::from_array(sharpened.mapv(truncate_u8))
}
