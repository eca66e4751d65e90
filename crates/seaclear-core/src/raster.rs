//! Raster representation for the enhancement pipeline.
//!
//! Every stage consumes a `Raster` by reference and returns a new one.
//! Samples are `f32`, three channels per pixel in R, G, B order.

use image::{ImageBuffer, Rgb, Rgb32FImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// BT.601 luma weights in R, G, B order.
pub const LUMA_BT601: [f32; 3] = [0.299, 0.587, 0.114];

/// Supported bit depths for source images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitDepth {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit floating point.
    F32,
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8 => write!(f, "8-bit"),
            Self::U16 => write!(f, "16-bit"),
            Self::F32 => write!(f, "32-bit float"),
        }
    }
}

/// A color channel. The index is the sample position inside a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Position of this channel inside a `[f32; 3]` pixel.
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Three-channel floating-point image, row-major.
///
/// Values are nominally in `[0, 1]`. Stages are allowed to leave that range
/// (gray world, unsharp masking); conversion to 8-bit clamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data, `width * height` entries in R, G, B order.
    pub pixels: Vec<[f32; 3]>,
}

impl Raster {
    /// A raster where every pixel has the same value.
    pub fn filled(width: u32, height: u32, rgb: [f32; 3]) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgb; (width as usize) * (height as usize)],
        }
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [f32; 3]) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> [f32; 3] {
        self.pixels[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Apply `f` to every pixel, producing a new raster of the same shape.
    pub fn map(&self, f: impl Fn([f32; 3]) -> [f32; 3]) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&px| f(px)).collect(),
        }
    }

    /// Mean of each channel, accumulated in `f64`.
    ///
    /// Returns zeros for an empty raster.
    pub fn channel_means(&self) -> [f64; 3] {
        if self.pixels.is_empty() {
            return [0.0; 3];
        }

        let mut sum = [0.0_f64; 3];
        for px in &self.pixels {
            for c in 0..3 {
                sum[c] += px[c] as f64;
            }
        }

        let n = self.pixels.len() as f64;
        [sum[0] / n, sum[1] / n, sum[2] / n]
    }

    /// Stretch all samples linearly so the global minimum maps to 0 and the
    /// global maximum to 1.
    ///
    /// A constant raster has no range to stretch and maps to all zeros,
    /// matching the usual min-max normalization convention.
    pub fn normalize_min_max(&self) -> Self {
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for px in &self.pixels {
            for &v in px {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }

        let range = hi - lo;
        let scale = if range > f32::EPSILON { 1.0 / range } else { 0.0 };
        self.map(|px| [(px[0] - lo) * scale, (px[1] - lo) * scale, (px[2] - lo) * scale])
    }

    /// Every sample clamped into `[0, 1]`.
    pub fn clamped(&self) -> Self {
        self.map(|px| [px[0].clamp(0.0, 1.0), px[1].clamp(0.0, 1.0), px[2].clamp(0.0, 1.0)])
    }

    pub fn from_rgb32f(image: &Rgb32FImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.pixels().map(|p| p.0).collect(),
        }
    }

    pub fn to_rgb32f(&self) -> Rgb32FImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| Rgb(self.get(x, y)))
    }

    /// Convert to 8-bit RGB for display or export. Samples are clamped to
    /// `[0, 1]` and rounded.
    pub fn to_rgb8(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| {
            let px = self.get(x, y);
            Rgb([to_u8(px[0]), to_u8(px[1]), to_u8(px[2])])
        })
    }
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
