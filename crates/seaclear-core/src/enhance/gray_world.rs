//! Gray-world white balance.
//!
//! Assumes the average reflectance of a scene is neutral gray and scales
//! each channel so its mean matches the average of all three channel means.

use crate::raster::Raster;

/// Channel means below this are treated as absent and left unscaled.
const MIN_CHANNEL_MEAN: f64 = 1e-10;

/// Rescale every channel by `gray / mean(c)`.
///
/// `gray` is the mean of the three channel means, so after the call the
/// channel means are equal. Values may exceed `[0, 1]`; the caller clamps
/// before display.
///
/// Applying this twice is not guaranteed to be idempotent in general: the
/// second pass only becomes a no-op when the first one equalized the means
/// exactly (up to rounding).
pub fn gray_world(image: &Raster) -> Raster {
    if image.is_empty() {
        return image.clone();
    }

    let means = image.channel_means();
    let gray = (means[0] + means[1] + means[2]) / 3.0;

    let mut gains = [1.0_f32; 3];
    for c in 0..3 {
        if means[c] > MIN_CHANNEL_MEAN {
            gains[c] = (gray / means[c]) as f32;
        }
    }

    image.map(|px| [px[0] * gains[0], px[1] * gains[1], px[2] * gains[2]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_image_is_unchanged() {
        let image = Raster::filled(4, 4, [0.4, 0.4, 0.4]);
        let result = gray_world(&image);
        for px in &result.pixels {
            for c in 0..3 {
                assert!((px[c] - 0.4).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_cast_is_neutralized() {
        let image = Raster::from_fn(4, 3, |x, y| {
            let t = (x + y) as f32 / 6.0;
            [0.1 + 0.1 * t, 0.3 + 0.2 * t, 0.6 + 0.3 * t]
        });
        let means = gray_world(&image).channel_means();
        assert!((means[0] - means[1]).abs() < 1e-4);
        assert!((means[1] - means[2]).abs() < 1e-4);
    }

    #[test]
    fn test_missing_channel_is_left_alone() {
        let image = Raster::filled(2, 2, [0.0, 0.5, 0.7]);
        let result = gray_world(&image);
        assert!(result.pixels.iter().all(|px| px[0] == 0.0));
    }

    #[test]
    fn test_second_pass_is_noop_once_means_are_equal() {
        let image = Raster::from_fn(5, 5, |x, y| [0.05 * x as f32, 0.3, 0.1 + 0.02 * y as f32]);
        let once = gray_world(&image);
        let twice = gray_world(&once);
        for (a, b) in once.pixels.iter().zip(&twice.pixels) {
            for c in 0..3 {
                assert!((a[c] - b[c]).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_empty_image() {
        let image = Raster::filled(0, 0, [0.0; 3]);
        assert!(gray_world(&image).is_empty());
    }
}
