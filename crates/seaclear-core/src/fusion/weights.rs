//! Per-branch weight maps for multi-scale fusion.
//!
//! Each enhanced input gets three maps:
//! - **Laplacian contrast**: absolute Laplacian of the luma, high on edges
//!   and texture.
//! - **Saliency**: frequency-tuned saliency (Achanta et al. 2009), high on
//!   regions whose color stands out from the image average.
//! - **Saturation**: spread of the channels around their own mean, high on
//!   strongly colored pixels.
//!
//! The maps are summed per branch and normalized across branches so the
//! weights of all branches add up to 1 at every pixel.
//!
//! # Reference
//! - Ancuti et al. (2018), "Color Balance and Fusion for Underwater Image
//!   Enhancement", section IV-B

use image::{ImageBuffer, Luma};
use imageproc::filter::filter3x3;
use palette::{FromColor, Lab, LinSrgb, Srgb};

use crate::error::PipelineError;
use crate::fusion::pyramid::Grid;
use crate::raster::{LUMA_BT601, Raster};

type GrayF32 = ImageBuffer<Luma<f32>, Vec<f32>>;

/// 3×3 aperture Laplacian (second-derivative Sobel sum).
const LAPLACIAN_3X3: [f32; 9] = [2.0, 0.0, 2.0, 0.0, -8.0, 0.0, 2.0, 0.0, 2.0];

/// Peak Lab distances below this are rounding noise of a flat image.
const MIN_SALIENCY_PEAK: f32 = 1e-3;

/// A single-channel `f32` map with the same layout as a [`Raster`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMap {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f32>,
}

impl WeightMap {
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            values: vec![value; (width as usize) * (height as usize)],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }

    /// Grayscale preview scaled so the largest weight is white.
    pub fn to_raster(&self) -> Raster {
        let peak = self.max();
        let scale = if peak > 0.0 { 1.0 / peak } else { 0.0 };
        Raster {
            width: self.width,
            height: self.height,
            pixels: self.values.iter().map(|&v| [v * scale; 3]).collect(),
        }
    }

    pub(crate) fn to_grid(&self) -> Grid<1> {
        Grid::new(
            self.width as usize,
            self.height as usize,
            self.values.iter().map(|&v| [v]).collect(),
        )
    }
}

/// The three weight maps of one fusion input.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchWeights {
    pub laplacian: WeightMap,
    pub saliency: WeightMap,
    pub saturation: WeightMap,
}

impl BranchWeights {
    pub fn compute(image: &Raster) -> Self {
        Self {
            laplacian: laplacian_contrast_weight(image),
            saliency: saliency_weight(image),
            saturation: saturation_weight(image),
        }
    }
}

/// Per-pixel BT.601 luma as a grayscale image.
fn luma_plane(image: &Raster) -> GrayF32 {
    ImageBuffer::from_fn(image.width, image.height, |x, y| {
        let px = image.get(x, y);
        Luma([px[0] * LUMA_BT601[0] + px[1] * LUMA_BT601[1] + px[2] * LUMA_BT601[2]])
    })
}

/// Absolute 3×3 Laplacian of the luma.
pub fn laplacian_contrast_weight(image: &Raster) -> WeightMap {
    if image.is_empty() {
        return WeightMap::filled(image.width, image.height, 0.0);
    }

    let gray = luma_plane(image);
    let response: Vec<f32> = filter3x3(&gray, &LAPLACIAN_3X3).into_raw();
    WeightMap {
        width: image.width,
        height: image.height,
        values: response.into_iter().map(f32::abs).collect(),
    }
}

/// Frequency-tuned saliency, scaled to `[0, 1]`.
///
/// ```text
/// S(x, y) = ‖ mean(Lab) − blur(Lab)(x, y) ‖
/// ```
///
/// The blur is the 5-tap binomial filter, which removes fine texture and
/// noise while keeping region-level color differences.
pub fn saliency_weight(image: &Raster) -> WeightMap {
    if image.is_empty() {
        return WeightMap::filled(image.width, image.height, 0.0);
    }

    let lab: Vec<[f32; 3]> = image.pixels.iter().map(|&px| to_lab(px)).collect();

    let n = lab.len() as f64;
    let mut sum = [0.0_f64; 3];
    for px in &lab {
        for c in 0..3 {
            sum[c] += px[c] as f64;
        }
    }
    let mean = [(sum[0] / n) as f32, (sum[1] / n) as f32, (sum[2] / n) as f32];

    let blurred = Grid::new(image.width as usize, image.height as usize, lab).blur();
    let values: Vec<f32> = blurred
        .data
        .iter()
        .map(|px| {
            let dl = px[0] - mean[0];
            let da = px[1] - mean[1];
            let db = px[2] - mean[2];
            (dl * dl + da * da + db * db).sqrt()
        })
        .collect();

    let peak = values.iter().copied().fold(0.0, f32::max);
    let scale = if peak > MIN_SALIENCY_PEAK { 1.0 / peak } else { 0.0 };
    WeightMap {
        width: image.width,
        height: image.height,
        values: values.into_iter().map(|v| v * scale).collect(),
    }
}

fn to_lab(px: [f32; 3]) -> [f32; 3] {
    let linear: LinSrgb = Srgb::new(
        px[0].clamp(0.0, 1.0),
        px[1].clamp(0.0, 1.0),
        px[2].clamp(0.0, 1.0),
    )
    .into_linear();
    let lab: Lab = Lab::from_color(linear);
    [lab.l, lab.a, lab.b]
}

/// Standard deviation of each pixel's channels around their own mean.
///
/// ```text
/// m = (R + G + B) / 3
/// W = sqrt(((R − m)² + (G − m)² + (B − m)²) / 3)
/// ```
pub fn saturation_weight(image: &Raster) -> WeightMap {
    WeightMap {
        width: image.width,
        height: image.height,
        values: image
            .pixels
            .iter()
            .map(|px| {
                let m = (px[0] + px[1] + px[2]) / 3.0;
                let dr = px[0] - m;
                let dg = px[1] - m;
                let db = px[2] - m;
                ((dr * dr + dg * dg + db * db) / 3.0).sqrt()
            })
            .collect(),
    }
}

/// Aggregate the three maps of one branch by summation.
pub fn weights_merged(maps: &BranchWeights) -> WeightMap {
    let values = maps
        .laplacian
        .values
        .iter()
        .zip(&maps.saliency.values)
        .zip(&maps.saturation.values)
        .map(|((l, s), sat)| l + s + sat)
        .collect();
    WeightMap {
        width: maps.laplacian.width,
        height: maps.laplacian.height,
        values,
    }
}

/// Normalize aggregated weights across branches.
///
/// ```text
/// W̄_k = (W_k + δ) / (Σ_k W_k + K × δ)
/// ```
///
/// With `δ > 0` the result is well defined everywhere and sums to 1 per
/// pixel. All maps must share the same dimensions.
pub fn normalize_weights(weights: &[WeightMap], delta: f32) -> Result<Vec<WeightMap>, PipelineError> {
    let first = weights.first().ok_or(PipelineError::EmptyInput)?;
    let dims = first.dimensions();
    for w in weights {
        if w.dimensions() != dims {
            return Err(PipelineError::DimensionMismatch {
                expected: dims,
                found: w.dimensions(),
            });
        }
    }

    let k = weights.len() as f32;
    let mut totals = vec![k * delta; first.values.len()];
    for w in weights {
        for (t, v) in totals.iter_mut().zip(&w.values) {
            *t += v;
        }
    }

    Ok(weights
        .iter()
        .map(|w| WeightMap {
            width: w.width,
            height: w.height,
            values: w
                .values
                .iter()
                .zip(&totals)
                .map(|(v, t)| (v + delta) / t)
                .collect(),
        })
        .collect())
}
