//! Settings for a signing run.

use crate::error::{CliError, ErrorExt, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Conventional name of the directory holding the APKs to sign
pub const DEFAULT_APKS_DIR: &str = "apks";

/// Resolved settings for one signing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    root: PathBuf,
    apks_dir: PathBuf,
    deadline: Option<Duration>,
}

impl Settings {
    /// Absolute project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory that is scanned for `.apk` files
    pub fn apks_directory(&self) -> PathBuf {
        self.root.join(&self.apks_dir)
    }

    /// Deadline for the whole batch, if any
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use apk_batch_signer::SettingsBuilder;
/// use std::time::Duration;
///
/// # fn example() -> apk_batch_signer::Result<()> {
/// let settings = SettingsBuilder::new()
///     .root("/work/uiautomator2-server")
///     .deadline(Duration::from_secs(600))
///     .build()?;
/// assert!(settings.apks_directory().ends_with("apks"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    root: Option<PathBuf>,
    apks_dir: Option<PathBuf>,
    deadline: Option<Duration>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project root.
    ///
    /// Default: the current working directory
    pub fn root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the APK directory, relative to the root.
    ///
    /// Default: `apks`
    pub fn apks_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.apks_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets a deadline for the whole batch.
    ///
    /// Default: None (wait for every signing call)
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builds the settings, resolving the root to an absolute path.
    ///
    /// # Errors
    ///
    /// Returns an error if the APK directory name is empty, the deadline is
    /// zero, or the current directory cannot be determined.
    pub fn build(self) -> Result<Settings> {
        let apks_dir = self.apks_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_APKS_DIR));
        if apks_dir.as_os_str().is_empty() {
            return Err(CliError::InvalidArguments {
                reason: "APK directory cannot be empty".to_string(),
            }
            .into());
        }

        if self.deadline == Some(Duration::ZERO) {
            return Err(CliError::InvalidArguments {
                reason: "deadline must be greater than zero".to_string(),
            }
            .into());
        }

        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir().fs_context("reading current directory", Path::new("."))?,
        };
        let root = root
            .absolutize()
            .fs_context("resolving project root", &root)?
            .into_owned();

        Ok(Settings {
            root,
            apks_dir,
            deadline: self.deadline,
        })
    }
}
