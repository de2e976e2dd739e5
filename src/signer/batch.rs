//! Concurrent batch signing.
//!
//! [`BatchSigner`] scans a directory for candidates, spawns one task per APK
//! on a [`JoinSet`] and waits for every task to settle before returning.
//! Failures do not short-circuit the batch: every in-flight call runs to
//! completion and all failures are reported together.

use super::candidates::{self, PackageFile};
use super::checksum::calculate_sha256;
use super::collaborator::ApkSigner;
use crate::error::{ErrorExt, FileFailure, Result, SignError, SignerError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{Id, JoinSet};

/// A package that was signed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedArtifact {
    /// Path of the signed APK
    pub path: PathBuf,
    /// Size in bytes after signing
    pub size: u64,
    /// Hex-encoded SHA-256 after signing
    pub checksum: String,
}

/// Signs every `.apk` directly inside `directory` through `signer`.
///
/// Fails with [`SignerError::NoCandidates`] without calling the signer when
/// there is nothing to sign, and with [`SignerError::SigningFailure`] when any
/// file fails. Returns only after every signing call has settled.
///
/// # Examples
///
/// ```no_run
/// use apk_batch_signer::signer::sign_all;
/// use apk_batch_signer::toolchain::ApksignerTool;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # async fn example() -> apk_batch_signer::Result<()> {
/// let tool = Arc::new(ApksignerTool::from_env()?);
/// sign_all(Path::new("apks"), tool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn sign_all<S: ApkSigner + 'static>(directory: &Path, signer: Arc<S>) -> Result<()> {
    BatchSigner::new(signer).sign_all(directory).await
}

/// Batch signer with an optional deadline across the whole batch.
pub struct BatchSigner<S> {
    signer: Arc<S>,
    deadline: Option<Duration>,
}

impl<S> std::fmt::Debug for BatchSigner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchSigner")
            .field("signer", &"<ApkSigner>")
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl<S: ApkSigner + 'static> BatchSigner<S> {
    /// Creates a batch signer with no deadline.
    pub fn new(signer: Arc<S>) -> Self {
        Self {
            signer,
            deadline: None,
        }
    }

    /// Aborts the batch with [`SignerError::DeadlineExceeded`] if it has not
    /// settled within `deadline`.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Signs every candidate in `directory`.
    pub async fn sign_all(&self, directory: &Path) -> Result<()> {
        self.sign_candidates(directory).await.map(|_| ())
    }

    /// Signs every candidate in `directory` and reports size and checksum of
    /// each signed file.
    pub async fn run(&self, directory: &Path) -> Result<Vec<SignedArtifact>> {
        let signed = self.sign_candidates(directory).await?;

        let mut artifacts = Vec::with_capacity(signed.len());
        for package in signed {
            let path = package.into_path();
            let size = tokio::fs::metadata(&path)
                .await
                .fs_context("reading signed APK metadata", &path)?
                .len();
            let checksum = calculate_sha256(&path).await?;
            artifacts.push(SignedArtifact {
                path,
                size,
                checksum,
            });
        }

        Ok(artifacts)
    }

    async fn sign_candidates(&self, directory: &Path) -> Result<Vec<PackageFile>> {
        let candidates = candidates::discover(directory).await?;

        let mut tasks = JoinSet::new();
        let mut paths = HashMap::with_capacity(candidates.len());
        for package in &candidates {
            let signer = Arc::clone(&self.signer);
            let path = package.path().to_path_buf();
            log::debug!("Signing {}", path.display());
            let handle = tasks.spawn({
                let path = path.clone();
                async move { signer.sign(&path).await }
            });
            paths.insert(handle.id(), path);
        }

        let failures = match self.deadline {
            None => settle(&mut tasks, &paths).await,
            Some(after) => {
                let settled = tokio::time::timeout(after, settle(&mut tasks, &paths)).await;
                match settled {
                    Ok(failures) => failures,
                    Err(_elapsed) => {
                        tasks.abort_all();
                        return Err(SignerError::DeadlineExceeded {
                            directory: directory.to_path_buf(),
                            after,
                        });
                    }
                }
            }
        };

        if failures.is_empty() {
            log::info!("Signed {} APK file(s) in {}", candidates.len(), directory.display());
            Ok(candidates)
        } else {
            Err(SignerError::SigningFailure { failures })
        }
    }
}

/// Waits for every task to finish and returns the ones that failed.
async fn settle(
    tasks: &mut JoinSet<std::result::Result<(), SignError>>,
    paths: &HashMap<Id, PathBuf>,
) -> Vec<FileFailure> {
    let mut failures = Vec::new();

    while let Some(joined) = tasks.join_next_with_id().await {
        let (id, outcome) = match joined {
            Ok((id, outcome)) => (id, outcome),
            Err(join_error) => (join_error.id(), Err(SignError::Aborted(join_error.to_string()))),
        };
        let path = paths.get(&id).cloned().unwrap_or_default();

        match outcome {
            Ok(()) => log::info!("✓ Signed {}", path.display()),
            Err(error) => {
                log::warn!("✗ Failed to sign {}: {}", path.display(), error);
                failures.push(FileFailure { path, error });
            }
        }
    }

    failures
}
