use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use tracing::{debug, info};

use crate::core::buffer::{AlphaChannel, PixelBuffer};
use crate::core::params::{CropRect, ResizeSpec};
use crate::core::processing::crop::crop;
use crate::error::{Error, Result};
use crate::types::{ColorLayout, FitMode, OutputFormat};

fn lanczos_options() -> ResizeOptions {
    ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3))
}

fn pixel_type(layout: ColorLayout) -> PixelType {
    match layout {
        ColorLayout::Gray => PixelType::U8,
        ColorLayout::Rgb => PixelType::U8x3,
        ColorLayout::Rgba => PixelType::U8x4,
    }
}

/// Lanczos3 resample of every channel to `target_width x target_height`.
pub fn resample(image: &PixelBuffer, target_width: u32, target_height: u32) -> Result<PixelBuffer> {
    if target_width == 0 || target_height == 0 {
        return Err(Error::ZeroSize {
            what: "target dimensions",
        });
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::ZeroSize {
            what: "source dimensions",
        });
    }
    let pixel_type = pixel_type(image.layout());
    let src_image =
        Image::from_vec_u8(image.width(), image.height(), image.to_vec(), pixel_type)
            .map_err(Error::external)?;
    let mut dst_image = Image::new(target_width, target_height, pixel_type);
    let mut resizer = Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &lanczos_options())
        .map_err(Error::external)?;

    PixelBuffer::new(
        target_width,
        target_height,
        image.layout(),
        dst_image.into_vec(),
    )
}

/// Lanczos3 resample of an opacity map. Alpha is treated as plain samples.
pub fn resample_alpha(
    alpha: &AlphaChannel,
    target_width: u32,
    target_height: u32,
) -> Result<AlphaChannel> {
    let resampled = resample(&alpha.clone().into_buffer(), target_width, target_height)?;
    AlphaChannel::from_buffer(resampled)
}

fn scaled(len: u32, scale: f64) -> u32 {
    (f64::from(len) * scale).round() as u32
}

/// Dimensions an image is resampled to before any cropping, per fit policy.
///
/// Contain never exceeds the target box; Cover never falls short of it.
/// Contain scales by `min(tw/sw, th/sh)` in both directions, so a source smaller
/// than the box is enlarged to fit it rather than left at its own size.
pub fn fit_dimensions(
    source: (u32, u32),
    target: (u32, u32),
    mode: FitMode,
) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (target_w, target_h) = target;
    let scale_x = f64::from(target_w) / f64::from(src_w);
    let scale_y = f64::from(target_h) / f64::from(src_h);

    match mode {
        FitMode::Contain => {
            let scale = scale_x.min(scale_y);
            (
                scaled(src_w, scale).clamp(1, target_w),
                scaled(src_h, scale).clamp(1, target_h),
            )
        }
        FitMode::Cover => {
            let scale = scale_x.max(scale_y);
            (
                scaled(src_w, scale).max(target_w),
                scaled(src_h, scale).max(target_h),
            )
        }
        FitMode::Stretch => (target_w, target_h),
    }
}

/// Resize `image` under the layout policy of `spec`.
///
/// For JPEG output any alpha channel is dropped so the result is ready to encode.
pub fn resize(image: &PixelBuffer, spec: &ResizeSpec) -> Result<PixelBuffer> {
    spec.validate()?;
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(Error::ZeroSize {
            what: "source dimensions",
        });
    }

    let (new_w, new_h) = fit_dimensions((src_w, src_h), (spec.width, spec.height), spec.mode);
    info!(
        "Resizing {}x{} -> {}x{} ({} into {}x{})",
        src_w, src_h, new_w, new_h, spec.mode, spec.width, spec.height
    );
    let mut resized = resample(image, new_w, new_h)?;

    if spec.mode == FitMode::Cover {
        let left = (new_w - spec.width) / 2;
        let top = (new_h - spec.height) / 2;
        debug!("Center crop offset: left={}, top={}", left, top);
        resized = crop(&resized, CropRect::new(left, top, spec.width, spec.height))?;
    }

    if spec.format == OutputFormat::Jpeg && resized.has_alpha() {
        debug!("Dropping alpha channel for JPEG output");
        resized = resized.color();
    }
    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32, layout: ColorLayout) -> PixelBuffer {
        let channels = layout.channels();
        let mut samples = Vec::with_capacity(width as usize * height as usize * channels);
        for y in 0..height {
            for x in 0..width {
                let v = if (x / 4 + y / 4) % 2 == 0 { 230 } else { 20 };
                for c in 0..channels {
                    samples.push(if c == 3 { 255 } else { v });
                }
            }
        }
        PixelBuffer::new(width, height, layout, samples).unwrap()
    }

    fn spec(width: u32, height: u32, mode: FitMode) -> ResizeSpec {
        ResizeSpec::new(width, height, mode, OutputFormat::Png, 90).unwrap()
    }

    #[test]
    fn contain_fits_inside_target_and_keeps_aspect() {
        let cases = [((200, 100), (50, 50)), ((90, 160), (64, 64)), ((33, 17), (100, 40))];
        for (source, target) in cases {
            let (w, h) = fit_dimensions(source, target, FitMode::Contain);
            assert!(w <= target.0 && h <= target.1, "{source:?} into {target:?}");
            assert!(w == target.0 || h == target.1);
            let expected_h = f64::from(w) * f64::from(source.1) / f64::from(source.0);
            assert!((expected_h - f64::from(h)).abs() <= 1.0);
        }
        assert_eq!(fit_dimensions((200, 100), (50, 50), FitMode::Contain), (50, 25));
    }

    #[test]
    fn contain_enlarges_small_sources() {
        assert_eq!(fit_dimensions((20, 10), (100, 100), FitMode::Contain), (100, 50));
    }

    #[test]
    fn cover_always_covers_target() {
        for (source, target) in [((200, 100), (50, 50)), ((3, 7), (10, 10)), ((640, 480), (37, 91))] {
            let (w, h) = fit_dimensions(source, target, FitMode::Cover);
            assert!(w >= target.0 && h >= target.1);
        }
    }

    #[test]
    fn cover_output_matches_target_exactly() {
        let image = checker(120, 80, ColorLayout::Rgb);
        for (w, h) in [(50, 50), (30, 70), (121, 13)] {
            let out = resize(&image, &spec(w, h, FitMode::Cover)).unwrap();
            assert_eq!(out.dimensions(), (w, h));
        }
    }

    #[test]
    fn stretch_ignores_aspect() {
        let image = checker(40, 10, ColorLayout::Rgb);
        let out = resize(&image, &spec(10, 40, FitMode::Stretch)).unwrap();
        assert_eq!(out.dimensions(), (10, 40));
    }

    #[test]
    fn resample_keeps_uniform_color() {
        let image = PixelBuffer::filled(16, 16, ColorLayout::Rgb, &[10, 100, 200]).unwrap();
        let out = resample(&image, 7, 23).unwrap();
        assert_eq!(out.dimensions(), (7, 23));
        assert_eq!(out.pixel(3, 11), vec![10, 100, 200]);
    }

    #[test]
    fn jpeg_target_drops_alpha() {
        let image = checker(32, 32, ColorLayout::Rgba);
        let jpeg = ResizeSpec::new(16, 16, FitMode::Stretch, OutputFormat::Jpeg, 80).unwrap();
        assert_eq!(resize(&image, &jpeg).unwrap().layout(), ColorLayout::Rgb);
        let png = spec(16, 16, FitMode::Stretch);
        assert_eq!(resize(&image, &png).unwrap().layout(), ColorLayout::Rgba);
    }

    #[test]
    fn zero_target_is_rejected() {
        let image = checker(8, 8, ColorLayout::Gray);
        assert!(matches!(resample(&image, 0, 4), Err(Error::ZeroSize { .. })));
    }
}
