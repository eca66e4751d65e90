//! Parameter structs that drive the enhancement pipeline.
//!
//! `PipelineParams` holds every tunable scalar; `StageToggles` decides which
//! stages run. Both are plain data shared between the UI and the pipeline.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Tuning for the multi-scale fusion step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionParams {
    /// Requested pyramid depth. Capped by the image size at run time.
    pub levels: u32,
    /// Regularization added to every weight before normalization so that
    /// pixels where all maps vanish fall back to an even blend.
    pub regularization: f32,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            levels: 5,
            regularization: 0.1,
        }
    }
}

/// Every tunable scalar of the pipeline.
///
/// No cross-field invariants. The UI limits each value to its slider range;
/// the pipeline only rejects values a stage cannot evaluate (see
/// [`PipelineParams::validate`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Red channel pre-compensation strength. Default: 1.0.
    pub alpha_red: f32,
    /// Blue channel pre-compensation strength. Default: 0.0 (off).
    pub alpha_blue: f32,
    /// Gamma exponent. `< 1` brightens, `> 1` darkens. Default: 1.2.
    pub gamma: f32,
    /// Unsharp mask blur radius in pixels. Default: 5.
    pub sigma: f32,
    /// Unsharp mask weight. 0.0 = no sharpening. Default: 1.0.
    pub strength: f32,
    /// Multi-scale fusion settings.
    #[serde(default)]
    pub fusion: FusionParams,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            alpha_red: 1.0,
            alpha_blue: 0.0,
            gamma: 1.2,
            sigma: 5.0,
            strength: 1.0,
            fusion: FusionParams::default(),
        }
    }
}

impl PipelineParams {
    /// Reject values that would turn samples into NaN or infinity.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let finite = [
            ("alpha_red", self.alpha_red),
            ("alpha_blue", self.alpha_blue),
            ("sigma", self.sigma),
            ("strength", self.strength),
            ("fusion.regularization", self.fusion.regularization),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(PipelineError::InvalidParameter { name, value });
            }
        }

        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(PipelineError::InvalidParameter {
                name: "gamma",
                value: self.gamma,
            });
        }

        if self.fusion.regularization <= 0.0 {
            return Err(PipelineError::InvalidParameter {
                name: "fusion.regularization",
                value: self.fusion.regularization,
            });
        }

        Ok(())
    }
}

/// Which optional stages run. Mirrors the checkboxes of the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageToggles {
    /// Red/blue channel compensation before white balance.
    pub precompensation: bool,
    /// Gray-world white balance.
    pub white_balance: bool,
    /// Gamma correction followed by unsharp masking.
    pub gamma_sharpen: bool,
    /// Weight maps and multi-scale fusion of the gamma and sharpened
    /// branches. Only takes effect together with `gamma_sharpen`.
    pub fusion: bool,
}

impl StageToggles {
    /// All optional stages enabled.
    pub const fn all() -> Self {
        Self {
            precompensation: true,
            white_balance: true,
            gamma_sharpen: true,
            fusion: true,
        }
    }

    /// Whether fusion will actually run.
    pub const fn fusion_active(&self) -> bool {
        self.gamma_sharpen && self.fusion
    }
}
