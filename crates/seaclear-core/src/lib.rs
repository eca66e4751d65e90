//! Seaclear Core: domain layer for underwater image enhancement.
//!
//! This crate contains the raster model, the enhancement stages (channel
//! compensation, gray-world white balance, gamma, unsharp masking), the
//! fusion weight maps and pyramid blending, and the pipeline that chains
//! them. No UI or framework dependencies.

pub mod enhance;
pub mod error;
pub mod fusion;
pub mod io;
pub mod params;
pub mod pipeline;
pub mod raster;

// Re-exports for convenience.
pub use error::PipelineError;
pub use io::{SourceImage, load_image, save_image};
pub use params::{FusionParams, PipelineParams, StageToggles};
pub use pipeline::{Stage, StageOutputs, process};
pub use raster::{BitDepth, Channel, Raster};
