//! Neighborhood filters over 8-bit planes: Gaussian smoothing, 3x3 dilation and
//! the 3x3 smoothing kernel used by the sharpness enhancement.
//!
//! Borders replicate the nearest edge sample. Lanes are processed in parallel.
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Zip, s};

use crate::core::buffer::PixelBuffer;

/// Largest kernel radius in standard deviations.
const KERNEL_SPAN: f32 = 3.0;

pub(crate) fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Clamp to [0, 255] and drop the fraction, as 8-bit image blends do.
pub(crate) fn truncate_u8(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Normalized 1-D Gaussian kernel of odd length `2 * ceil(3 sigma) + 1`.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * KERNEL_SPAN).ceil().max(1.0) as usize;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let d = i as f32 - radius as f32;
            (-d * d / denom).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    kernel
}

fn convolve_lane(src: ArrayView1<'_, f32>, mut dst: ArrayViewMut1<'_, f32>, kernel: &[f32]) {
    let len = src.len();
    let radius = kernel.len() / 2;
    for i in 0..len {
        let mut acc = 0.0;
        for (k, w) in kernel.iter().enumerate() {
            let j = (i + k).saturating_sub(radius).min(len - 1);
            acc += w * src[j];
        }
        dst[i] = acc;
    }
}

/// Separable Gaussian blur of one plane with standard deviation `sigma`.
/// A non-positive (or NaN) `sigma` returns the plane unchanged.
pub fn gaussian_blur_plane(plane: ArrayView2<'_, u8>, sigma: f32) -> Array2<u8> {
    if !(sigma > 0.0) || plane.is_empty() {
        return plane.to_owned();
    }
    let kernel = gaussian_kernel(sigma);
    let src = plane.mapv(f32::from);

    let mut horizontal = Array2::<f32>::zeros(src.dim());
    Zip::from(horizontal.rows_mut())
        .and(src.rows())
        .par_for_each(|dst, row| convolve_lane(row, dst, &kernel));

    let mut vertical = Array2::<f32>::zeros(src.dim());
    Zip::from(vertical.columns_mut())
        .and(horizontal.columns())
        .par_for_each(|dst, column| convolve_lane(column, dst, &kernel));

    vertical.mapv(to_u8)
}

/// Gaussian blur applied to every channel of `buffer`.
pub fn gaussian_blur(buffer: &PixelBuffer, sigma: f32) -> PixelBuffer {
    buffer.map_planes(|plane| gaussian_blur_plane(plane, sigma))
}

/// 3x3 max filter (morphological dilation).
pub fn max_filter_3x3(plane: ArrayView2<'_, u8>) -> Array2<u8> {
    let (height, width) = plane.dim();
    Array2::from_shape_fn((height, width), |(y, x)| {
        let rows = y.saturating_sub(1)..=(y + 1).min(height - 1);
        let mut max = 0u8;
        for yy in rows {
            for xx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                max = max.max(plane[[yy, xx]]);
            }
        }
        max
    })
}

/// 3x3 smoothing with kernel `[1 1 1; 1 5 1; 1 1 1] / 13`. Border pixels are copied.
pub fn smooth_3x3(plane: ArrayView2<'_, u8>) -> Array2<u8> {
    let (height, width) = plane.dim();
    let mut out = plane.to_owned();
    if height < 3 || width < 3 {
        return out;
    }
    Zip::indexed(out.slice_mut(s![1..height - 1, 1..width - 1])).par_for_each(|(y, x), v| {
        let (y, x) = (y + 1, x + 1);
        let mut acc = 4 * u32::from(plane[[y, x]]);
        for yy in y - 1..=y + 1 {
            for xx in x - 1..=x + 1 {
                acc += u32::from(plane[[yy, xx]]);
            }
        }
        *v = ((acc + 6) / 13) as u8;
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        for sigma in [0.3, 1.0, 2.5] {
            let kernel = gaussian_kernel(sigma);
            assert_eq!(kernel.len() % 2, 1);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
            let n = kernel.len();
            for i in 0..n / 2 {
                assert!((kernel[i] - kernel[n - 1 - i]).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn blur_keeps_constant_planes() {
        let plane = Array2::from_elem((7, 9), 128u8);
        assert_eq!(gaussian_blur_plane(plane.view(), 1.5), plane);
    }

    #[test]
    fn blur_with_zero_sigma_is_identity() {
        let plane = array![[0u8, 255, 0], [255, 0, 255]];
        assert_eq!(gaussian_blur_plane(plane.view(), 0.0), plane);
    }

    #[test]
    fn blur_spreads_a_point() {
        let mut plane = Array2::<u8>::zeros((9, 9));
        plane[[4, 4]] = 255;
        let blurred = gaussian_blur_plane(plane.view(), 1.0);
        assert!(blurred[[4, 4]] < 255);
        assert!(blurred[[4, 5]] > 0);
        assert_eq!(blurred[[4, 5]], blurred[[4, 3]]);
        assert_eq!(blurred[[3, 4]], blurred[[5, 4]]);
        assert_eq!(blurred[[0, 0]], 0);
    }

    #[test]
    fn max_filter_grows_by_one_pixel() {
        let mut plane = Array2::<u8>::zeros((5, 5));
        plane[[2, 2]] = 200;
        let dilated = max_filter_3x3(plane.view());
        for y in 0..5 {
            for x in 0..5 {
                let inside = (1..=3).contains(&y) && (1..=3).contains(&x);
                assert_eq!(dilated[[y, x]], if inside { 200 } else { 0 });
            }
        }
    }

    #[test]
    fn max_filter_clamps_at_corners() {
        let plane = array![[9u8, 0], [0, 0]];
        assert_eq!(max_filter_3x3(plane.view()), array![[9u8, 9], [9, 9]]);
    }

    #[test]
    fn smooth_copies_border_and_averages_interior() {
        let mut plane = Array2::<u8>::zeros((3, 3));
        plane[[1, 1]] = 130;
        let smoothed = smooth_3x3(plane.view());
        assert_eq!(smoothed[[1, 1]], 50);
        assert_eq!(smoothed[[0, 0]], 0);
    }
}
