//! Android SDK signing toolchain.
//!
//! - [`detection`] - Locating `apksigner`
//! - [`credentials`] - Keystore and key pair configuration
//! - [`apksigner`] - The [`ApksignerTool`] signing collaborator

mod apksigner;
pub mod credentials;
pub mod detection;

pub use apksigner::{APKSIGNER_TIMEOUT, ApksignerTool};
pub use credentials::SigningCredentials;
