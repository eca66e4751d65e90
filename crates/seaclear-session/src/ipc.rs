//! Message contracts between a session and its UI.
//!
//! Both enums use `#[serde(tag = "type", content = "data")]`, so a message
//! looks like `{"type": "SetSlider", "data": {"slider": "Gamma", "position": 12}}`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use seaclear_core::{PipelineParams, Stage, StageToggles};

use crate::controls::{SliderId, ToggleId};
use crate::error::SessionError;
use crate::session::Session;

/// One slider as the UI shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderState {
    pub slider: SliderId,
    pub position: i32,
    pub label: String,
}

/// Messages from the session to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionToUi {
    /// Full state snapshot, sent on request.
    Initialize {
        params: PipelineParams,
        toggles: StageToggles,
        sliders: Vec<SliderState>,
        choices: Vec<Stage>,
        selected: Stage,
    },

    /// A new image was loaded successfully.
    ImageLoaded {
        path: String,
        width: u32,
        height: u32,
        /// Human-readable bit depth description.
        bit_depth: String,
    },

    /// A slider moved; `label` is the value text to display.
    SliderChanged { slider: SliderId, position: i32, label: String },

    /// The preview picker contents changed.
    ChoicesUpdated { choices: Vec<Stage>, selected: Stage },

    /// The pipeline finished.
    Processed { stages: Vec<Stage>, summary: String },

    /// The final result was written to disk.
    Saved { path: String },

    /// Something failed. The session state is unchanged.
    Error { message: String },
}

/// Messages from the UI to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToSession {
    /// Request a state snapshot.
    RequestState,

    /// Load a new source image.
    LoadImage { path: String },

    /// Move a slider to an integer position.
    SetSlider { slider: SliderId, position: i32 },

    /// Check or uncheck a stage.
    SetToggle { toggle: ToggleId, enabled: bool },

    /// Choose which stage the preview shows.
    SelectPreview { stage: Stage },

    /// Run the pipeline.
    Process,

    /// Save the final result.
    SaveResult { path: String },
}

impl Session {
    /// Apply one UI message and return the replies.
    ///
    /// Failures never propagate; they are reported as [`SessionToUi::Error`].
    pub fn handle(&mut self, message: UiToSession) -> Vec<SessionToUi> {
        match message {
            UiToSession::RequestState => vec![self.snapshot()],
            UiToSession::LoadImage { path } => match self.load_image(Path::new(&path)) {
                Ok(loaded) => vec![SessionToUi::ImageLoaded {
                    path,
                    width: loaded.source.raster.width,
                    height: loaded.source.raster.height,
                    bit_depth: loaded.source.bit_depth.to_string(),
                }],
                Err(e) => vec![error_reply(&e)],
            },
            UiToSession::SetSlider { slider, position } => {
                self.set_slider(slider, position);
                vec![SessionToUi::SliderChanged {
                    slider,
                    position: self.slider_position(slider),
                    label: self.slider_label(slider),
                }]
            }
            UiToSession::SetToggle { toggle, enabled } => {
                let before = self.toggles();
                self.set_toggle(toggle, enabled);
                if self.toggles() == before {
                    return Vec::new();
                }
                vec![self.choices_reply()]
            }
            UiToSession::SelectPreview { stage } => match self.select_preview(stage) {
                Ok(()) => vec![self.choices_reply()],
                Err(e) => vec![error_reply(&e)],
            },
            UiToSession::Process => match self.process() {
                Ok(Some(outputs)) => {
                    let reply = SessionToUi::Processed {
                        stages: outputs.stages().collect(),
                        summary: outputs.summary().to_string(),
                    };
                    vec![reply, self.choices_reply()]
                }
                Ok(None) => Vec::new(),
                Err(e) => vec![error_reply(&e)],
            },
            UiToSession::SaveResult { path } => match self.save_result(Path::new(&path)) {
                Ok(()) => vec![SessionToUi::Saved { path }],
                Err(e) => vec![error_reply(&e)],
            },
        }
    }

    /// Decode a JSON message, apply it, and encode the replies.
    pub fn handle_json(&mut self, json: &str) -> Result<Vec<String>, SessionError> {
        let message: UiToSession = serde_json::from_str(json)?;
        self.handle(message)
            .iter()
            .map(|reply| serde_json::to_string(reply).map_err(SessionError::from))
            .collect()
    }

    fn snapshot(&self) -> SessionToUi {
        SessionToUi::Initialize {
            params: self.params().clone(),
            toggles: self.toggles(),
            sliders: SliderId::all()
                .iter()
                .map(|&slider| SliderState {
                    slider,
                    position: self.slider_position(slider),
                    label: self.slider_label(slider),
                })
                .collect(),
            choices: self.preview_choices(),
            selected: self.selected_stage(),
        }
    }

    fn choices_reply(&self) -> SessionToUi {
        SessionToUi::ChoicesUpdated {
            choices: self.preview_choices(),
            selected: self.selected_stage(),
        }
    }
}

fn error_reply(error: &SessionError) -> SessionToUi {
    tracing::warn!("{error}");
    SessionToUi::Error {
        message: error.to_string(),
    }
}
