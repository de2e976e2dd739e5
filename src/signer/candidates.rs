//! Candidate discovery.
//!
//! Lists the entries directly inside a directory and keeps the ones whose
//! extension is exactly `apk`. The match is case-sensitive: `app.APK` is not
//! a candidate.

use crate::error::{Result, SignerError};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Extension (without the dot) that marks a signing candidate
pub const APK_EXTENSION: &str = "apk";

/// A single `.apk` file discovered in the scanned directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PackageFile {
    path: PathBuf,
}

impl PackageFile {
    /// Path of the package, joined onto the scanned directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consumes the reference and returns its path
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Returns true when `name` has the extension `apk`, compared byte for byte.
///
/// Dotfiles such as `.apk` have no extension and never match.
pub fn is_apk(name: &OsStr) -> bool {
    Path::new(name).extension() == Some(OsStr::new(APK_EXTENSION))
}

/// Scans `directory` (non-recursively) for `.apk` entries.
///
/// The returned set is sorted so that log output is stable; callers must not
/// rely on any particular order. Returns [`SignerError::NoCandidates`] when
/// nothing matches and [`SignerError::DirectoryAccess`] when the directory
/// cannot be listed.
pub async fn discover(directory: &Path) -> Result<Vec<PackageFile>> {
    let access_error = |source| SignerError::DirectoryAccess {
        directory: directory.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(directory).await.map_err(access_error)?;
    let mut candidates = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(access_error)? {
        let name = entry.file_name();
        if is_apk(&name) {
            candidates.push(PackageFile {
                path: directory.join(name),
            });
        } else {
            log::trace!("Skipping {}", entry.path().display());
        }
    }

    if candidates.is_empty() {
        return Err(SignerError::NoCandidates {
            directory: directory.to_path_buf(),
        });
    }

    candidates.sort();
    log::info!(
        "Found {} APK file(s) to sign in {}",
        candidates.len(),
        directory.display()
    );

    Ok(candidates)
}
