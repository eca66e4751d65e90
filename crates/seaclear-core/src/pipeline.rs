//! Pipeline orchestration: runs the enabled stages and records every
//! intermediate for preview.
//!
//! Stage order:
//! 1. Min-max normalization (always)
//! 2. Red then blue channel compensation
//! 3. Gray-world white balance
//! 4. Gamma correction and unsharp masking
//! 5. Weight maps and multi-scale fusion of the gamma and sharpened branches
//!
//! Each call returns a fresh [`StageOutputs`]; nothing is kept between calls.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::enhance::{comp_for_channel, gamma_correction, gray_world, unsharp_mask};
use crate::error::PipelineError;
use crate::fusion::{BranchWeights, multi_scale_fusion, normalize_weights, weights_merged};
use crate::params::{PipelineParams, StageToggles};
use crate::raster::{Channel, Raster};

/// A point in the pipeline whose raster can be previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Normalized input.
    Original,
    /// After red/blue channel compensation.
    PreCompensated,
    /// After gray-world white balance.
    WhiteBalanced,
    /// Gamma branch.
    Gamma,
    /// Sharpened branch (unsharp mask of the white-balanced image).
    Sharpened,
    /// Gamma followed by unsharp masking.
    GammaSharpened,
    LaplacianWeightGamma,
    SaliencyWeightGamma,
    SaturationWeightGamma,
    LaplacianWeightSharpened,
    SaliencyWeightSharpened,
    SaturationWeightSharpened,
    /// Output of the last enabled stage.
    Final,
}

impl Stage {
    /// Human-readable label for stage pickers.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::PreCompensated => "After White Balance Pre-comp",
            Self::WhiteBalanced => "After White Balance",
            Self::Gamma => "After Gamma",
            Self::Sharpened => "After Sharpening",
            Self::GammaSharpened => "After Gamma + Sharpening",
            Self::LaplacianWeightGamma => "Laplacian Contrast Weight Map (Gamma)",
            Self::SaliencyWeightGamma => "Saliency Weight Map (Gamma)",
            Self::SaturationWeightGamma => "Saturation Weight Map (Gamma)",
            Self::LaplacianWeightSharpened => "Laplacian Contrast Weight Map (Sharpening)",
            Self::SaliencyWeightSharpened => "Saliency Weight Map (Sharpening)",
            Self::SaturationWeightSharpened => "Saturation Weight Map (Sharpening)",
            Self::Final => "Final Result",
        }
    }

    /// Every stage in pipeline order.
    pub fn all() -> &'static [Self] {
        const ALL: [Stage; 13] = [
            Stage::Original,
            Stage::PreCompensated,
            Stage::WhiteBalanced,
            Stage::Gamma,
            Stage::Sharpened,
            Stage::GammaSharpened,
            Stage::LaplacianWeightGamma,
            Stage::SaliencyWeightGamma,
            Stage::SaturationWeightGamma,
            Stage::LaplacianWeightSharpened,
            Stage::SaliencyWeightSharpened,
            Stage::SaturationWeightSharpened,
            Stage::Final,
        ];
        &ALL
    }

    /// Look a stage up by its [`label`](Self::label).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.label() == label)
    }
}

/// Rasters produced by one pipeline run, keyed by stage.
///
/// Weight maps are stored as grayscale rasters scaled to `[0, 1]`.
#[derive(Debug, Clone, Default)]
pub struct StageOutputs {
    rasters: BTreeMap<Stage, Raster>,
    summary: String,
}

impl StageOutputs {
    pub fn get(&self, stage: Stage) -> Option<&Raster> {
        self.rasters.get(&stage)
    }

    /// The raster of the last enabled stage.
    pub fn final_result(&self) -> Option<&Raster> {
        self.get(Stage::Final)
    }

    /// Stages present in this run, in pipeline order.
    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.rasters.keys().copied()
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.rasters.contains_key(&stage)
    }

    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }

    /// Description of the stages that ran and their parameters.
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

/// Run the enabled stages over `source`.
///
/// `source` is min-max normalized first. Parameters are validated up front,
/// so a failure leaves no partial output behind.
pub fn process(
    source: &Raster,
    params: &PipelineParams,
    toggles: StageToggles,
) -> Result<StageOutputs, PipelineError> {
    params.validate()?;

    let mut rasters = BTreeMap::new();
    let mut summary = String::from("Process:");

    let mut current = source.normalize_min_max();
    rasters.insert(Stage::Original, current.clone());

    if toggles.precompensation {
        current = comp_for_channel(Channel::Red, &current, params.alpha_red);
        current = comp_for_channel(Channel::Blue, &current, params.alpha_blue);
        tracing::debug!("channel compensation applied");
        let _ = write!(
            summary,
            "\nWB pre-comp: red={}, blue={}",
            params.alpha_red, params.alpha_blue
        );
        rasters.insert(Stage::PreCompensated, current.clone());
    }

    if toggles.white_balance {
        current = gray_world(&current);
        tracing::debug!("gray-world white balance applied");
        summary.push_str("\nWB: gray world");
        rasters.insert(Stage::WhiteBalanced, current.clone());
    }

    if toggles.gamma_sharpen {
        let gamma = gamma_correction(&current, params.gamma);
        let sharpened = unsharp_mask(&current, params.sigma, params.strength);
        let chained = unsharp_mask(&gamma, params.sigma, params.strength);
        tracing::debug!("gamma and sharpening branches computed");
        let _ = write!(
            summary,
            "\nGamma: {}\nSharpening: sigma={} strength={}",
            params.gamma, params.sigma, params.strength
        );

        rasters.insert(Stage::Gamma, gamma.clone());
        rasters.insert(Stage::Sharpened, sharpened.clone());
        rasters.insert(Stage::GammaSharpened, chained.clone());
        current = chained;

        if toggles.fusion {
            current = fuse_branches(gamma, sharpened, params, &mut rasters)?;
            let _ = write!(
                summary,
                "\nFusion: levels={} regularization={}",
                params.fusion.levels, params.fusion.regularization
            );
        }
    }

    rasters.insert(Stage::Final, current);
    tracing::info!("{summary}");

    Ok(StageOutputs { rasters, summary })
}

fn fuse_branches(
    gamma: Raster,
    sharpened: Raster,
    params: &PipelineParams,
    rasters: &mut BTreeMap<Stage, Raster>,
) -> Result<Raster, PipelineError> {
    let gamma_maps = BranchWeights::compute(&gamma);
    let sharp_maps = BranchWeights::compute(&sharpened);

    rasters.insert(Stage::LaplacianWeightGamma, gamma_maps.laplacian.to_raster());
    rasters.insert(Stage::SaliencyWeightGamma, gamma_maps.saliency.to_raster());
    rasters.insert(Stage::SaturationWeightGamma, gamma_maps.saturation.to_raster());
    rasters.insert(Stage::LaplacianWeightSharpened, sharp_maps.laplacian.to_raster());
    rasters.insert(Stage::SaliencyWeightSharpened, sharp_maps.saliency.to_raster());
    rasters.insert(Stage::SaturationWeightSharpened, sharp_maps.saturation.to_raster());

    let weights = normalize_weights(
        &[weights_merged(&gamma_maps), weights_merged(&sharp_maps)],
        params.fusion.regularization,
    )?;
    tracing::debug!("fusing branches over up to {} levels", params.fusion.levels);
    multi_scale_fusion(&[gamma, sharpened], &weights, params.fusion.levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(size: u32) -> Raster {
        Raster::from_fn(size, size, |x, y| {
            let t = x as f32 / size as f32;
            let s = y as f32 / size as f32;
            [0.05 + 0.2 * t, 0.3 + 0.4 * s, 0.4 + 0.3 * t * s]
        })
    }

    #[test]
    fn test_no_stages_yields_original_and_final() {
        let outputs = process(&scene(8), &PipelineParams::default(), StageToggles::default())
            .expect("valid params");
        let stages: Vec<Stage> = outputs.stages().collect();
        assert_eq!(stages, vec![Stage::Original, Stage::Final]);
        assert_eq!(outputs.get(Stage::Original), outputs.final_result());
    }

    #[test]
    fn test_all_stages_recorded() {
        let outputs = process(&scene(24), &PipelineParams::default(), StageToggles::all())
            .expect("valid params");
        for stage in Stage::all() {
            assert!(outputs.contains(*stage), "missing {}", stage.label());
        }
        let fin = outputs.final_result().expect("final present");
        assert_eq!(fin.dimensions(), (24, 24));
        assert!(fin.pixels.iter().all(|px| px.iter().all(|v| v.is_finite())));
    }

    #[test]
    fn test_gamma_sharpen_without_fusion_ends_on_chain() {
        let toggles = StageToggles {
            gamma_sharpen: true,
            ..StageToggles::default()
        };
        let outputs = process(&scene(16), &PipelineParams::default(), toggles).expect("valid params");
        assert_eq!(outputs.final_result(), outputs.get(Stage::GammaSharpened));
        assert!(!outputs.contains(Stage::SaliencyWeightGamma));
    }

    #[test]
    fn test_fusion_toggle_alone_is_inert() {
        let toggles = StageToggles {
            fusion: true,
            ..StageToggles::default()
        };
        let outputs = process(&scene(16), &PipelineParams::default(), toggles).expect("valid params");
        assert_eq!(outputs.len(), 2);
    }

    #[test]
    fn test_invalid_gamma_fails_before_running() {
        let params = PipelineParams {
            gamma: -1.0,
            ..PipelineParams::default()
        };
        assert!(matches!(
            process(&scene(8), &params, StageToggles::all()),
            Err(PipelineError::InvalidParameter { name: "gamma", .. })
        ));
    }

    #[test]
    fn test_summary_lists_enabled_stages() {
        let toggles = StageToggles {
            white_balance: true,
            gamma_sharpen: true,
            ..StageToggles::default()
        };
        let outputs = process(&scene(16), &PipelineParams::default(), toggles).expect("valid params");
        let summary = outputs.summary();
        assert!(summary.starts_with("Process:"));
        assert!(summary.contains("gray world"));
        assert!(summary.contains("Gamma: 1.2"));
        assert!(!summary.contains("pre-comp"));
    }

    #[test]
    fn test_stage_labels_round_trip() {
        for stage in Stage::all() {
            assert_eq!(Stage::from_label(stage.label()), Some(*stage));
        }
        assert_eq!(Stage::from_label("Nope"), None);
    }
}
