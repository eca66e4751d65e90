//! Seaclear Session: the state a front end keeps around the pipeline.
//!
//! Owns the loaded image, slider positions, stage toggles, preview
//! selection, and the results of the last run. Front ends drive it either
//! directly or through the JSON messages in [`ipc`].

pub mod controls;
pub mod error;
pub mod ipc;
pub mod preview;
pub mod session;

pub use controls::{SliderId, SliderPositions, SliderSpec, ToggleId};
pub use error::SessionError;
pub use ipc::{SessionToUi, SliderState, UiToSession};
pub use preview::{DEFAULT_PREVIEW_WIDTH, display_image, preview_choices};
pub use session::{LoadedImage, Session, SessionConfig};
