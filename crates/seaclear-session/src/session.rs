//! Session state owned by the front end.
//!
//! A `Session` holds the loaded image, the slider positions, the stage
//! toggles, and the result bundle of the last run. Every pipeline run
//! replaces the bundle wholesale.

use std::path::{Path, PathBuf};

use image::RgbImage;

use seaclear_core::{
    PipelineParams, Raster, SourceImage, Stage, StageOutputs, StageToggles, load_image, process,
    save_image,
};

use crate::controls::{SliderId, SliderPositions, ToggleId};
use crate::error::SessionError;
use crate::preview::{DEFAULT_PREVIEW_WIDTH, display_image, preview_choices};

/// Runtime configuration for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Width previews are scaled to.
    pub preview_width: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            preview_width: DEFAULT_PREVIEW_WIDTH,
        }
    }
}

/// The image the session is working on.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub source: SourceImage,
}

#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    image: Option<LoadedImage>,
    sliders: SliderPositions,
    params: PipelineParams,
    toggles: StageToggles,
    outputs: Option<StageOutputs>,
    selected: Option<Stage>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn toggles(&self) -> StageToggles {
        self.toggles
    }

    /// Result bundle of the last successful run.
    pub fn outputs(&self) -> Option<&StageOutputs> {
        self.outputs.as_ref()
    }

    /// Load a new source image.
    ///
    /// On failure the previous image and results stay in place and a
    /// diagnostic is logged.
    pub fn load_image(&mut self, path: &Path) -> Result<&LoadedImage, SessionError> {
        let source = match load_image(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("no image selected, or it could not be read: {e}");
                return Err(e.into());
            }
        };

        tracing::info!(
            "loaded {} ({}x{}, {})",
            path.display(),
            source.raster.width,
            source.raster.height,
            source.bit_depth
        );
        self.outputs = None;
        Ok(self.image.insert(LoadedImage {
            path: path.to_path_buf(),
            source,
        }))
    }

    /// Run the pipeline on the loaded image.
    ///
    /// Returns `Ok(None)` without doing anything when no image is loaded.
    pub fn process(&mut self) -> Result<Option<&StageOutputs>, SessionError> {
        let Some(image) = &self.image else {
            tracing::debug!("process requested without an image");
            return Ok(None);
        };

        let outputs = process(&image.source.raster, &self.params, self.toggles)?;
        self.selected = None;
        Ok(Some(self.outputs.insert(outputs)))
    }

    pub fn slider_position(&self, id: SliderId) -> i32 {
        self.sliders.get(id)
    }

    pub fn slider_label(&self, id: SliderId) -> String {
        id.spec().label(self.sliders.get(id))
    }

    /// Move a slider. The position is clamped to its range; returns the
    /// parameter value now in effect.
    pub fn set_slider(&mut self, id: SliderId, position: i32) -> f32 {
        let value = self.sliders.set(id, position);
        id.apply(&mut self.params, value);
        value
    }

    pub fn set_toggle(&mut self, id: ToggleId, enabled: bool) {
        id.set(&mut self.toggles, enabled);
    }

    /// Stages the preview picker offers for the current toggles.
    pub fn preview_choices(&self) -> Vec<Stage> {
        preview_choices(self.toggles)
    }

    /// Pick the stage to preview. It must be among the current choices.
    pub fn select_preview(&mut self, stage: Stage) -> Result<(), SessionError> {
        if !self.preview_choices().contains(&stage) {
            return Err(SessionError::UnavailableStage(stage));
        }
        self.selected = Some(stage);
        Ok(())
    }

    /// The selected stage, falling back to the last choice ("Final Result")
    /// when nothing valid is selected.
    pub fn selected_stage(&self) -> Stage {
        let choices = self.preview_choices();
        match self.selected {
            Some(stage) if choices.contains(&stage) => stage,
            _ => choices.last().copied().unwrap_or(Stage::Final),
        }
    }

    /// Raster of the selected stage, if the last run produced it.
    pub fn selected_raster(&self) -> Option<&Raster> {
        self.outputs.as_ref()?.get(self.selected_stage())
    }

    /// Display-ready version of the loaded image.
    pub fn source_preview(&self) -> Option<RgbImage> {
        let image = self.image.as_ref()?;
        Some(display_image(&image.source.raster, self.config.preview_width))
    }

    /// Display-ready version of the selected stage.
    pub fn preview(&self) -> Option<RgbImage> {
        self.selected_raster()
            .map(|raster| display_image(raster, self.config.preview_width))
    }

    /// Write the final result of the last run. The format follows the
    /// extension of `path`.
    pub fn save_result(&self, path: &Path) -> Result<(), SessionError> {
        let result = self
            .outputs
            .as_ref()
            .and_then(StageOutputs::final_result)
            .ok_or(SessionError::NoResult)?;
        save_image(result, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_without_image_is_noop() {
        let mut session = Session::default();
        assert!(matches!(session.process(), Ok(None)));
        assert!(session.outputs().is_none());
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut session = Session::default();
        assert!(session.load_image(Path::new("/nonexistent/seaclear.png")).is_err());
        assert!(session.image().is_none());
    }

    #[test]
    fn test_slider_updates_params() {
        let mut session = Session::default();
        assert_eq!(session.set_slider(SliderId::Gamma, 25), 2.5);
        assert_eq!(session.params().gamma, 2.5);
        assert_eq!(session.slider_label(SliderId::Gamma), "2.5");
        session.set_slider(SliderId::Strength, 50);
        assert_eq!(session.params().strength, 0.5);
    }

    #[test]
    fn test_selection_falls_back_when_toggle_removed() {
        let mut session = Session::default();
        session.set_toggle(ToggleId::WhiteBalance, true);
        session
            .select_preview(Stage::WhiteBalanced)
            .expect("white balance is offered");
        assert_eq!(session.selected_stage(), Stage::WhiteBalanced);

        session.set_toggle(ToggleId::WhiteBalance, false);
        assert_eq!(session.selected_stage(), Stage::Final);
    }

    #[test]
    fn test_unavailable_stage_is_rejected() {
        let mut session = Session::default();
        assert!(matches!(
            session.select_preview(Stage::Gamma),
            Err(SessionError::UnavailableStage(Stage::Gamma))
        ));
    }

    #[test]
    fn test_save_before_process_fails() {
        let session = Session::default();
        assert!(matches!(
            session.save_result(Path::new("out.png")),
            Err(SessionError::NoResult)
        ));
    }
}
