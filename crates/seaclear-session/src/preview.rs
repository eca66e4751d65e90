//! Preview stage selection and display conversion.

use image::RgbImage;
use image::imageops::{self, FilterType};

use seaclear_core::{Raster, Stage, StageToggles};

/// Default preview width in pixels.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 640;

const GAMMA_SHARPEN_GROUP: [Stage; 3] = [Stage::Gamma, Stage::Sharpened, Stage::GammaSharpened];

const WEIGHT_MAP_GROUP: [Stage; 6] = [
    Stage::LaplacianWeightGamma,
    Stage::SaliencyWeightGamma,
    Stage::SaturationWeightGamma,
    Stage::LaplacianWeightSharpened,
    Stage::SaliencyWeightSharpened,
    Stage::SaturationWeightSharpened,
];

/// Stages the user can pick for the given toggles, in pipeline order.
///
/// "Original" and "Final Result" are always offered; every other group
/// appears only while its checkbox is on. The last entry is the default
/// selection.
pub fn preview_choices(toggles: StageToggles) -> Vec<Stage> {
    let mut choices = vec![Stage::Original];
    if toggles.precompensation {
        choices.push(Stage::PreCompensated);
    }
    if toggles.white_balance {
        choices.push(Stage::WhiteBalanced);
    }
    if toggles.gamma_sharpen {
        choices.extend(GAMMA_SHARPEN_GROUP);
        if toggles.fusion {
            choices.extend(WEIGHT_MAP_GROUP);
        }
    }
    choices.push(Stage::Final);
    choices
}

/// Convert a raster to 8-bit and scale it to `width`, keeping the aspect
/// ratio.
pub fn display_image(raster: &Raster, width: u32) -> RgbImage {
    let rgb = raster.to_rgb8();
    if raster.width == 0 || raster.height == 0 || width == 0 || raster.width == width {
        return rgb;
    }

    let scale = width as f64 / raster.width as f64;
    let height = ((raster.height as f64 * scale).round() as u32).max(1);
    imageops::resize(&rgb, width, height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_toggles_offers_original_and_final() {
        assert_eq!(
            preview_choices(StageToggles::default()),
            vec![Stage::Original, Stage::Final]
        );
    }

    #[test]
    fn test_all_toggles_offer_every_stage_in_order() {
        assert_eq!(preview_choices(StageToggles::all()), Stage::all().to_vec());
    }

    #[test]
    fn test_weight_maps_need_gamma_sharpen() {
        let toggles = StageToggles {
            white_balance: true,
            fusion: true,
            ..StageToggles::default()
        };
        assert_eq!(
            preview_choices(toggles),
            vec![Stage::Original, Stage::WhiteBalanced, Stage::Final]
        );
    }

    #[test]
    fn test_display_scales_to_width() {
        let raster = Raster::filled(320, 240, [0.5, 0.25, 1.0]);
        let img = display_image(&raster, DEFAULT_PREVIEW_WIDTH);
        assert_eq!(img.dimensions(), (640, 480));
        assert_eq!(img.get_pixel(10, 10).0, [128, 64, 255]);
    }

    #[test]
    fn test_display_keeps_matching_width() {
        let raster = Raster::filled(640, 10, [0.0; 3]);
        assert_eq!(display_image(&raster, 640).dimensions(), (640, 10));
    }
}
