//! Power-law gamma correction.

use crate::raster::Raster;

/// Apply `out = in^gamma` to every channel.
///
/// `gamma < 1` brightens, `gamma > 1` darkens, `gamma = 1` is a no-op.
/// Negative samples (possible after compensation) are treated as 0 so the
/// power stays real. `gamma` must be positive; the pipeline validates it.
pub fn gamma_correction(image: &Raster, gamma: f32) -> Raster {
    if (gamma - 1.0).abs() < 1e-7 {
        return image.clone();
    }

    image.map(|px| {
        [
            px[0].max(0.0).powf(gamma),
            px[1].max(0.0).powf(gamma),
            px[2].max(0.0).powf(gamma),
        ]
    })
}
