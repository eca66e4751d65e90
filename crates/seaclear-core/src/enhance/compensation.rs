//! Channel compensation for underwater color loss.
//!
//! Water absorbs red light first, then blue. Before a global white balance
//! the attenuated channel is pulled toward the green channel, which is the
//! best preserved one underwater.
//!
//! # Reference
//! - Ancuti et al. (2018), "Color Balance and Fusion for Underwater Image
//!   Enhancement", eq. (4)

use crate::raster::{Channel, Raster};

/// Compensate `channel` using the green channel.
///
/// For every pixel:
///
/// ```text
/// out[c] = in[c] + alpha × (mean(G) − mean(c)) × (1 − in[c]) × in[G]
/// ```
///
/// Only the target channel changes. `alpha = 0.0` produces no change, and so
/// does compensating green itself. Input is expected to be normalized to
/// `[0, 1]`; `alpha` is conventionally within `[0, 2]`.
pub fn comp_for_channel(channel: Channel, image: &Raster, alpha: f32) -> Raster {
    if alpha.abs() < 1e-7 || channel == Channel::Green {
        return image.clone();
    }

    let means = image.channel_means();
    let c = channel.index();
    let g = Channel::Green.index();
    let mean_diff = (means[g] - means[c]) as f32;

    image.map(|px| {
        let mut out = px;
        out[c] = px[c] + alpha * mean_diff * (1.0 - px[c]) * px[g];
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn two_by_two() -> Raster {
        Raster {
            width: 2,
            height: 2,
            pixels: vec![
                [0.1, 0.6, 0.3],
                [0.2, 0.8, 0.5],
                [0.05, 0.4, 0.7],
                [0.3, 0.9, 0.2],
            ],
        }
    }

    #[test]
    fn test_alpha_zero_is_identity() {
        let image = two_by_two();
        assert_eq!(comp_for_channel(Channel::Red, &image, 0.0), image);
        assert_eq!(comp_for_channel(Channel::Blue, &image, 0.0), image);
    }

    #[test]
    fn test_red_matches_closed_form() {
        let image = two_by_two();
        let mean_r = (0.1 + 0.2 + 0.05 + 0.3) / 4.0;
        let mean_g = (0.6 + 0.8 + 0.4 + 0.9) / 4.0;

        let result = comp_for_channel(Channel::Red, &image, 1.0);
        for (out, px) in result.pixels.iter().zip(&image.pixels) {
            let expected = px[0] + (mean_g - mean_r) * (1.0 - px[0]) * px[1];
            assert!(
                (out[0] - expected).abs() < EPSILON,
                "red {:.8} vs expected {:.8}",
                out[0],
                expected
            );
            assert_eq!(out[1], px[1]);
            assert_eq!(out[2], px[2]);
        }
    }

    #[test]
    fn test_blue_only_touches_blue() {
        let image = two_by_two();
        let result = comp_for_channel(Channel::Blue, &image, 1.5);
        for (out, px) in result.pixels.iter().zip(&image.pixels) {
            assert_eq!(out[0], px[0]);
            assert_eq!(out[1], px[1]);
        }
        assert_ne!(result, image);
    }

    #[test]
    fn test_green_channel_is_identity() {
        let image = two_by_two();
        assert_eq!(comp_for_channel(Channel::Green, &image, 2.0), image);
    }

    #[test]
    fn test_weak_red_is_raised() {
        let image = Raster::filled(3, 3, [0.1, 0.7, 0.4]);
        let result = comp_for_channel(Channel::Red, &image, 1.0);
        assert!(result.pixels.iter().all(|px| px[0] > 0.1));
    }
}
