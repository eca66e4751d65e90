//! Unsharp masking.

use imageproc::filter::gaussian_blur_f32;

use crate::raster::Raster;

/// Gaussian blur of every channel. `sigma <= 0` returns a copy.
pub fn gaussian_blur(image: &Raster, sigma: f32) -> Raster {
    if sigma <= 0.0 || image.is_empty() {
        return image.clone();
    }
    Raster::from_rgb32f(&gaussian_blur_f32(&image.to_rgb32f(), sigma))
}

/// Sharpen by boosting the difference between the image and its blur.
///
/// ```text
/// blurred = GaussianBlur(in, sigma)
/// out     = in + strength × (in − blurred)
/// ```
///
/// `strength = 0.0` or `sigma <= 0` produces no change. The result is not
/// clamped; values outside `[0, 1]` are clamped on conversion to 8-bit.
pub fn unsharp_mask(image: &Raster, sigma: f32, strength: f32) -> Raster {
    if strength.abs() < 1e-7 || sigma <= 0.0 {
        return image.clone();
    }

    let blurred = gaussian_blur(image, sigma);
    let pixels = image
        .pixels
        .iter()
        .zip(&blurred.pixels)
        .map(|(px, bl)| {
            [
                px[0] + strength * (px[0] - bl[0]),
                px[1] + strength * (px[1] - bl[1]),
                px[2] + strength * (px[2] - bl[2]),
            ]
        })
        .collect();

    Raster {
        width: image.width,
        height: image.height,
        pixels,
    }
}
