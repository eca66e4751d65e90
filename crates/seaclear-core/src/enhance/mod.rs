//! Enhancement stages: channel compensation, white balance, gamma, and sharpening.

pub mod compensation;
pub mod gamma;
pub mod gray_world;
pub mod sharpen;

pub use compensation::comp_for_channel;
pub use gamma::gamma_correction;
pub use gray_world::gray_world;
pub use sharpen::{gaussian_blur, unsharp_mask};
