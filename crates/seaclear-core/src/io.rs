//! Image file loading and saving.

use std::path::Path;

use image::{ColorType, DynamicImage};

use crate::error::PipelineError;
use crate::raster::{BitDepth, Raster};

/// A decoded source image.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Pixels scaled to `[0, 1]` by the full range of the source format.
    pub raster: Raster,
    /// Original bit depth of the file.
    pub bit_depth: BitDepth,
}

/// Load an image from disk.
///
/// Supports the formats the `image` crate decodes (PNG, JPEG, BMP, TIFF, ...).
/// Alpha is dropped and grayscale is expanded to three channels.
pub fn load_image(path: &Path) -> Result<SourceImage, PipelineError> {
    let img = image::open(path).map_err(PipelineError::Decode)?;
    tracing::debug!("decoded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(to_source(&img))
}

/// Decode an in-memory encoded image.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, PipelineError> {
    let img = image::load_from_memory(bytes).map_err(PipelineError::Decode)?;
    Ok(to_source(&img))
}

fn to_source(img: &DynamicImage) -> SourceImage {
    let bit_depth = match img.color() {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => BitDepth::U8,
        ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16 => BitDepth::U16,
        ColorType::Rgb32F | ColorType::Rgba32F => BitDepth::F32,
        _ => BitDepth::U8,
    };

    SourceImage {
        raster: Raster::from_rgb32f(&img.to_rgb32f()),
        bit_depth,
    }
}

/// Write a raster as 8-bit RGB. The format follows the file extension.
///
/// Samples outside `[0, 1]` are clamped.
pub fn save_image(raster: &Raster, path: &Path) -> Result<(), PipelineError> {
    raster.to_rgb8().save(path).map_err(PipelineError::Encode)?;
    tracing::info!("saved {}x{} result to {}", raster.width, raster.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage};

    fn encode_png(img: &RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("png encoding");
        bytes
    }

    #[test]
    fn test_decode_scales_to_unit_range() {
        let img = RgbImage::from_fn(2, 1, |x, _| if x == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 51, 102]) });
        let source = decode_image(&encode_png(&img)).expect("decodes");
        assert_eq!(source.bit_depth, BitDepth::U8);
        assert_eq!(source.raster.dimensions(), (2, 1));
        assert_eq!(source.raster.pixels[0], [0.0, 0.0, 0.0]);
        assert!((source.raster.pixels[1][0] - 1.0).abs() < 1e-6);
        assert!((source.raster.pixels[1][1] - 0.2).abs() < 1e-6);
        assert!((source.raster.pixels[1][2] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(PipelineError::Decode(_))
        ));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = Path::new("/nonexistent/seaclear/missing.png");
        assert!(load_image(path).is_err());
    }
}
