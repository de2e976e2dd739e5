//! The signing collaborator seam.

use crate::error::SignError;
use std::future::Future;
use std::path::Path;

/// Something that can sign a single APK in place.
///
/// The batch signer calls [`ApkSigner::sign`] once per discovered file, from
/// several tasks at the same time, so implementations must be safe to share
/// across threads. Every call targets a distinct file.
pub trait ApkSigner: Send + Sync {
    /// Signs the package at `apk`, rewriting it in place.
    fn sign(&self, apk: &Path) -> impl Future<Output = Result<(), SignError>> + Send;
}
