//! APK batch signing.
//!
//! # Overview
//!
//! The batch signer:
//! 1. Lists the entries directly inside a directory
//! 2. Keeps the ones with the (case-sensitive) extension `.apk`
//! 3. Fails with [`SignerError::NoCandidates`](crate::SignerError::NoCandidates) if none remain
//! 4. Signs each candidate concurrently through an [`ApkSigner`]
//! 5. Returns once every signing call has settled
//!
//! # Module Organization
//!
//! - [`candidates`] - Directory scan and extension filter
//! - [`batch`] - Scatter/gather over a task set, optional deadline
//! - [`checksum`] - SHA-256 of signed artifacts
//! - [`collaborator`] - The [`ApkSigner`] trait

mod batch;
pub mod candidates;
mod checksum;
mod collaborator;

pub use batch::{BatchSigner, SignedArtifact, sign_all};
pub use candidates::PackageFile;
pub use collaborator::ApkSigner;
