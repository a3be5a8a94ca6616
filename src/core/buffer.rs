//! In-memory pixel buffers shared by every transformation.
//!
//! `PixelBuffer` holds interleaved 8-bit samples as an `Array3<u8>` shaped
//! `(height, width, channels)`; `AlphaChannel` is its single-channel opacity
//! counterpart shaped `(height, width)`. Operations take buffers by reference and
//! always return freshly allocated outputs.
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis, concatenate, s};

use crate::error::{Error, Result};
use crate::types::ColorLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    layout: ColorLayout,
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Wrap interleaved row-major samples.
    pub fn new(width: u32, height: u32, layout: ColorLayout, samples: Vec<u8>) -> Result<Self> {
        let shape = (height as usize, width as usize, layout.channels());
        let expected = shape.0 * shape.1 * shape.2;
        if samples.len() != expected {
            return Err(Error::invalid(
                "samples",
                format!("{} (expected {expected})", samples.len()),
            ));
        }
        let data = Array3::from_shape_vec(shape, samples).map_err(Error::external)?;
        Ok(Self { layout, data })
    }

    /// Buffer where every pixel equals `pixel`.
    pub fn filled(width: u32, height: u32, layout: ColorLayout, pixel: &[u8]) -> Result<Self> {
        if pixel.len() != layout.channels() {
            return Err(Error::invalid("pixel", format!("{pixel:?} for {layout}")));
        }
        let samples = pixel
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * pixel.len())
            .collect();
        Self::new(width, height, layout, samples)
    }

    /// Wrap an existing `(height, width, channels)` array.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        let channels = data.dim().2;
        let layout = ColorLayout::from_channels(channels)
            .ok_or_else(|| Error::invalid("channels", channels))?;
        Ok(Self { layout, data })
    }

    pub fn width(&self) -> u32 {
        self.data.dim().1 as u32
    }

    pub fn height(&self) -> u32 {
        self.data.dim().0 as u32
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn layout(&self) -> ColorLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn has_alpha(&self) -> bool {
        self.layout.has_alpha()
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Samples of the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Vec<u8> {
        self.data
            .slice(s![y as usize, x as usize, ..])
            .iter()
            .copied()
            .collect()
    }

    /// Interleaved row-major samples.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }

    /// Single channel `index` as a plane.
    pub fn plane(&self, index: usize) -> ArrayView2<'_, u8> {
        self.data.index_axis(Axis(2), index)
    }

    /// Apply a shape-preserving plane filter to every channel.
    pub fn map_planes<F>(&self, filter: F) -> PixelBuffer
    where
        F: Fn(ArrayView2<'_, u8>) -> Array2<u8>,
    {
        let mut data = Array3::zeros(self.data.dim());
        for (channel, mut out) in data.axis_iter_mut(Axis(2)).enumerate() {
            out.assign(&filter(self.plane(channel)));
        }
        PixelBuffer {
            layout: self.layout,
            data,
        }
    }

    /// Alpha-free color planes. Gray stays gray; RGBA drops its alpha.
    pub fn color(&self) -> PixelBuffer {
        match self.layout {
            ColorLayout::Rgba => PixelBuffer {
                layout: ColorLayout::Rgb,
                data: self.data.slice(s![.., .., 0..3]).to_owned(),
            },
            _ => self.clone(),
        }
    }

    /// Three-channel RGB rendition: gray is replicated, alpha is dropped.
    pub fn to_rgb(&self) -> PixelBuffer {
        match self.layout {
            ColorLayout::Rgb => self.clone(),
            ColorLayout::Rgba => self.color(),
            ColorLayout::Gray => {
                let (height, width, _) = self.data.dim();
                let data = Array3::from_shape_fn((height, width, 3), |(y, x, _)| {
                    self.data[[y, x, 0]]
                });
                PixelBuffer {
                    layout: ColorLayout::Rgb,
                    data,
                }
            }
        }
    }

    /// The embedded alpha channel, if any.
    pub fn alpha(&self) -> Option<AlphaChannel> {
        self.has_alpha()
            .then(|| AlphaChannel::from_array(self.plane(3).to_owned()))
    }

    /// Split into alpha-free color planes and the optional alpha channel.
    pub fn split_alpha(&self) -> (PixelBuffer, Option<AlphaChannel>) {
        (self.color(), self.alpha())
    }

    /// RGBA buffer made of this buffer's color and `alpha` as the fourth channel.
    /// Any existing alpha is replaced.
    pub fn with_alpha(&self, alpha: &AlphaChannel) -> Result<PixelBuffer> {
        if alpha.dimensions() != self.dimensions() {
            return Err(Error::DimensionMismatch {
                image: self.dimensions(),
                alpha: alpha.dimensions(),
            });
        }
        let rgb = self.to_rgb();
        let alpha_view = alpha.view().insert_axis(Axis(2));
        let data = concatenate(Axis(2), &[rgb.data.view(), alpha_view]).map_err(Error::external)?;
        Ok(PixelBuffer {
            layout: ColorLayout::Rgba,
            data,
        })
    }
}

/// Single-channel opacity map: 0 is fully transparent, 255 fully opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaChannel {
    data: Array2<u8>,
}

impl AlphaChannel {
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(Error::invalid(
                "samples",
                format!("{} (expected {expected})", samples.len()),
            ));
        }
        let data = Array2::from_shape_vec((height as usize, width as usize), samples)
            .map_err(Error::external)?;
        Ok(Self { data })
    }

    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            data: Array2::from_elem((height as usize, width as usize), value),
        }
    }

    pub fn from_array(data: Array2<u8>) -> Self {
        Self { data }
    }

    /// Interpret a single-channel buffer as alpha.
    pub fn from_buffer(buffer: PixelBuffer) -> Result<Self> {
        if buffer.layout() != ColorLayout::Gray {
            return Err(Error::invalid("layout", buffer.layout()));
        }
        Ok(Self {
            data: buffer.into_array().index_axis_move(Axis(2), 0),
        })
    }

    pub fn into_buffer(self) -> PixelBuffer {
        PixelBuffer {
            layout: ColorLayout::Gray,
            data: self.data.insert_axis(Axis(2)),
        }
    }

    pub fn width(&self) -> u32 {
        self.data.dim().1 as u32
    }

    pub fn height(&self) -> u32 {
        self.data.dim().0 as u32
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[[y as usize, x as usize]]
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.data.view()
    }

    pub fn into_array(self) -> Array2<u8> {
        self.data
    }

    pub fn samples(&self) -> impl Iterator<Item = u8> + '_ {
        self.data.iter().copied()
    }
}
