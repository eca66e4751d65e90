/// Errors produced by the enhancement pipeline and its image I/O.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },
    #[error("dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch { expected: (u32, u32), found: (u32, u32) },
    #[error("got {weights} weight maps for {inputs} inputs")]
    CountMismatch { inputs: usize, weights: usize },
    #[error("no input rasters supplied")]
    EmptyInput,
}
