use seaclear_core::{PipelineError, Stage};

/// Errors surfaced to the front end.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("nothing has been processed yet")]
    NoResult,
    #[error("stage \"{}\" is not available with the current toggles", .0.label())]
    UnavailableStage(Stage),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
}
