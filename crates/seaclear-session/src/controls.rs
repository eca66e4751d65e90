//! Slider and checkbox definitions.
//!
//! Sliders hold integers; each real parameter is `position / divisor`:
//!
//! | slider      | range    | default | divisor | value range |
//! |-------------|----------|---------|---------|-------------|
//! | alpha red   | 0..=20   | 10      | 10      | 0.0 – 2.0   |
//! | alpha blue  | 0..=20   | 0       | 10      | 0.0 – 2.0   |
//! | gamma       | 1..=50   | 12      | 10      | 0.1 – 5.0   |
//! | sigma       | 0..=30   | 5       | 1       | 0 – 30 px   |
//! | strength    | 0..=300  | 100     | 100     | 0.0 – 3.0   |

use serde::{Deserialize, Serialize};

use seaclear_core::{PipelineParams, StageToggles};

/// Integer range and scaling of one slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderSpec {
    pub min: i32,
    pub max: i32,
    pub default: i32,
    pub divisor: i32,
}

impl SliderSpec {
    pub fn clamp(&self, position: i32) -> i32 {
        position.clamp(self.min, self.max)
    }

    /// Real parameter value for a slider position (clamped to the range).
    pub fn to_value(&self, position: i32) -> f32 {
        self.clamp(position) as f32 / self.divisor as f32
    }

    /// Text shown next to the slider.
    pub fn label(&self, position: i32) -> String {
        if self.divisor == 1 {
            self.clamp(position).to_string()
        } else {
            format!("{:?}", self.to_value(position))
        }
    }
}

/// Identifies a parameter slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SliderId {
    AlphaRed,
    AlphaBlue,
    Gamma,
    Sigma,
    Strength,
}

impl SliderId {
    pub const fn spec(self) -> SliderSpec {
        match self {
            Self::AlphaRed => SliderSpec { min: 0, max: 20, default: 10, divisor: 10 },
            Self::AlphaBlue => SliderSpec { min: 0, max: 20, default: 0, divisor: 10 },
            Self::Gamma => SliderSpec { min: 1, max: 50, default: 12, divisor: 10 },
            Self::Sigma => SliderSpec { min: 0, max: 30, default: 5, divisor: 1 },
            Self::Strength => SliderSpec { min: 0, max: 300, default: 100, divisor: 100 },
        }
    }

    pub fn all() -> &'static [Self] {
        const ALL: [SliderId; 5] = [
            SliderId::AlphaRed,
            SliderId::AlphaBlue,
            SliderId::Gamma,
            SliderId::Sigma,
            SliderId::Strength,
        ];
        &ALL
    }

    /// Write `value` into the matching parameter field.
    pub fn apply(self, params: &mut PipelineParams, value: f32) {
        match self {
            Self::AlphaRed => params.alpha_red = value,
            Self::AlphaBlue => params.alpha_blue = value,
            Self::Gamma => params.gamma = value,
            Self::Sigma => params.sigma = value,
            Self::Strength => params.strength = value,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::AlphaRed => 0,
            Self::AlphaBlue => 1,
            Self::Gamma => 2,
            Self::Sigma => 3,
            Self::Strength => 4,
        }
    }
}

/// Current integer position of every slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderPositions([i32; 5]);

impl Default for SliderPositions {
    fn default() -> Self {
        let mut positions = [0; 5];
        for id in SliderId::all() {
            positions[id.slot()] = id.spec().default;
        }
        Self(positions)
    }
}

impl SliderPositions {
    pub fn get(&self, id: SliderId) -> i32 {
        self.0[id.slot()]
    }

    /// Store a clamped position and return the value it maps to.
    pub fn set(&mut self, id: SliderId, position: i32) -> f32 {
        let spec = id.spec();
        self.0[id.slot()] = spec.clamp(position);
        spec.to_value(position)
    }

    /// Parameters matching these positions.
    pub fn to_params(&self) -> PipelineParams {
        let mut params = PipelineParams::default();
        for id in SliderId::all() {
            id.apply(&mut params, id.spec().to_value(self.get(*id)));
        }
        params
    }
}

/// Identifies a stage checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToggleId {
    Precompensation,
    WhiteBalance,
    GammaSharpen,
    Fusion,
}

impl ToggleId {
    pub fn set(self, toggles: &mut StageToggles, enabled: bool) {
        match self {
            Self::Precompensation => toggles.precompensation = enabled,
            Self::WhiteBalance => toggles.white_balance = enabled,
            Self::GammaSharpen => toggles.gamma_sharpen = enabled,
            Self::Fusion => toggles.fusion = enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamma_slider_divides_by_ten() {
        let spec = SliderId::Gamma.spec();
        assert_eq!(spec.to_value(12), 1.2);
        assert_eq!(spec.to_value(10), 1.0);
        assert_eq!(spec.to_value(25), 2.5);
    }

    #[test]
    fn test_strength_slider_divides_by_hundred() {
        let spec = SliderId::Strength.spec();
        assert_eq!(spec.to_value(100), 1.0);
        assert_eq!(spec.to_value(35), 0.35);
    }

    #[test]
    fn test_sigma_slider_is_unscaled() {
        assert_eq!(SliderId::Sigma.spec().to_value(7), 7.0);
        assert_eq!(SliderId::Sigma.spec().label(7), "7");
    }

    #[test]
    fn test_positions_are_clamped_to_range() {
        let mut positions = SliderPositions::default();
        assert_eq!(positions.set(SliderId::Gamma, 0), 0.1);
        assert_eq!(positions.get(SliderId::Gamma), 1);
        assert_eq!(positions.set(SliderId::AlphaRed, 99), 2.0);
        assert_eq!(positions.get(SliderId::AlphaRed), 20);
    }

    #[test]
    fn test_labels_match_value_text() {
        assert_eq!(SliderId::AlphaRed.spec().label(10), "1.0");
        assert_eq!(SliderId::Gamma.spec().label(12), "1.2");
        assert_eq!(SliderId::Strength.spec().label(35), "0.35");
    }

    #[test]
    fn test_default_positions_match_default_params() {
        assert_eq!(SliderPositions::default().to_params(), PipelineParams::default());
    }

    #[test]
    fn test_toggle_ids_set_fields() {
        let mut toggles = StageToggles::default();
        ToggleId::WhiteBalance.set(&mut toggles, true);
        ToggleId::Fusion.set(&mut toggles, true);
        assert!(toggles.white_balance);
        assert!(toggles.fusion);
        assert!(!toggles.gamma_sharpen);
    }
}
