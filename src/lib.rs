//! Concurrent batch signing of Android APKs.
//!
//! This library finds every `.apk` directly inside a directory and signs them
//! all at once through a signing collaborator:
//! - [`signer`] - discovery, the [`ApkSigner`] seam and the batch operation
//! - [`toolchain`] - the Android SDK `apksigner` collaborator
//! - [`settings`] - where to look and how long to wait
//!
//! It can be used both as a CLI tool (`sign_apks`) and as a library dependency
//! from a build runner.

pub mod cli;
pub mod error;
pub mod settings;
pub mod signer;
pub mod toolchain;

// Re-export commonly used types
pub use error::{CliError, FileFailure, Result, SignError, SignerError};
pub use settings::{Settings, SettingsBuilder};
pub use signer::{ApkSigner, BatchSigner, SignedArtifact, sign_all};
pub use toolchain::{ApksignerTool, SigningCredentials};
