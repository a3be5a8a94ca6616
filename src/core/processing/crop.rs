use ndarray::s;
use tracing::debug;

use crate::core::buffer::PixelBuffer;
use crate::core::params::CropRect;
use crate::error::{Error, Result};

/// Exact rectangular sub-grid of `image`; channel layout is unchanged.
///
/// The rectangle is validated before any pixel is touched.
pub fn crop(image: &PixelBuffer, rect: CropRect) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    if !rect.fits_within(width, height) {
        return Err(Error::InvalidCropBounds {
            rect,
            width,
            height,
        });
    }
    debug!("Cropping {}x{} image to {}", width, height, rect);

    let (x, y) = (rect.x as usize, rect.y as usize);
    let (w, h) = (rect.width as usize, rect.height as usize);
    let region = image.view().slice(s![y..y + h, x..x + w, ..]).to_owned();
    PixelBuffer::from_array(region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorLayout;

    fn numbered(width: u32, height: u32) -> PixelBuffer {
        let samples = (0..width * height)
            .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 7])
            .collect();
        PixelBuffer::new(width, height, ColorLayout::Rgb, samples).unwrap()
    }

    #[test]
    fn full_rect_is_identity() {
        let image = numbered(13, 9);
        assert_eq!(crop(&image, CropRect::new(0, 0, 13, 9)).unwrap(), image);
    }

    #[test]
    fn crop_extracts_exact_region() {
        let image = numbered(20, 10);
        let out = crop(&image, CropRect::new(3, 2, 5, 4)).unwrap();
        assert_eq!(out.dimensions(), (5, 4));
        for y in 0..4 {
            for x in 0..5 {
                assert_eq!(out.pixel(x, y), image.pixel(x + 3, y + 2));
            }
        }
    }

    #[test]
    fn out_of_bounds_rect_is_rejected() {
        let image = numbered(10, 10);
        for rect in [
            CropRect::new(1, 0, 10, 10),
            CropRect::new(0, 5, 4, 6),
            CropRect::new(10, 0, 1, 1),
            CropRect::new(u32::MAX, 0, 1, 1),
        ] {
            assert!(matches!(
                crop(&image, rect),
                Err(Error::InvalidCropBounds { .. })
            ));
        }
    }

    #[test]
    fn alpha_layout_is_preserved() {
        let image = PixelBuffer::filled(4, 4, ColorLayout::Rgba, &[1, 2, 3, 4]).unwrap();
        let out = crop(&image, CropRect::new(1, 1, 2, 2)).unwrap();
        assert_eq!(out.layout(), ColorLayout::Rgba);
        assert_eq!(out.pixel(1, 1), vec![1, 2, 3, 4]);
    }
}
