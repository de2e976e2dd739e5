//! Signing through the Android SDK `apksigner` tool.

use super::credentials::SigningCredentials;
use super::detection::{locate_apksigner, sdk_roots_from_env};
use crate::error::{Result, SignError};
use crate::signer::ApkSigner;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::OnceCell;

/// Timeout for a single `apksigner sign` invocation (5 minutes)
pub const APKSIGNER_TIMEOUT: Duration = Duration::from_secs(300);

/// Environment variable holding an explicit apksigner path
pub const APKSIGNER_PATH_VAR: &str = "APK_SIGNER_APKSIGNER";

/// [`ApkSigner`] backed by `apksigner sign`.
///
/// The executable is located on the first call and reused afterwards, so
/// constructing the tool never fails because the SDK is missing; that only
/// surfaces once there is something to sign.
#[derive(Debug)]
pub struct ApksignerTool {
    explicit_path: Option<PathBuf>,
    sdk_roots: Vec<PathBuf>,
    credentials: SigningCredentials,
    timeout: Duration,
    resolved: OnceCell<PathBuf>,
}

impl ApksignerTool {
    /// Creates a tool that signs with `credentials`, searching `PATH` and the
    /// Android SDK named by the environment for `apksigner`.
    pub fn new(credentials: SigningCredentials) -> Self {
        Self {
            explicit_path: None,
            sdk_roots: sdk_roots_from_env(),
            credentials,
            timeout: APKSIGNER_TIMEOUT,
            resolved: OnceCell::new(),
        }
    }

    /// Creates a tool configured entirely from environment variables.
    ///
    /// Honors `APK_SIGNER_APKSIGNER` plus the credential variables described
    /// in [`SigningCredentials`].
    pub fn from_env() -> Result<Self> {
        let credentials = SigningCredentials::from_env()?;
        let mut tool = Self::new(credentials);
        if let Some(path) = std::env::var_os(APKSIGNER_PATH_VAR).filter(|v| !v.is_empty()) {
            tool = tool.apksigner(path);
        }
        Ok(tool)
    }

    /// Uses the apksigner at `path` instead of searching for one.
    pub fn apksigner(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Replaces the Android SDK roots searched for build-tools.
    pub fn sdk_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.sdk_roots = roots;
        self
    }

    /// Sets the per-invocation timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The credentials this tool signs with.
    pub fn credentials(&self) -> &SigningCredentials {
        &self.credentials
    }

    async fn binary(&self) -> std::result::Result<&Path, SignError> {
        self.resolved
            .get_or_try_init(|| async {
                locate_apksigner(self.explicit_path.as_deref(), &self.sdk_roots)
            })
            .await
            .map(PathBuf::as_path)
    }

    /// Arguments passed to apksigner for `apk`.
    pub fn sign_args(&self, apk: &Path) -> Vec<String> {
        let mut args = vec!["sign".to_string()];
        args.extend(self.credentials.args());
        args.push(apk.display().to_string());
        args
    }
}

impl ApkSigner for ApksignerTool {
    async fn sign(&self, apk: &Path) -> std::result::Result<(), SignError> {
        let binary = self.binary().await?;
        self.credentials.ensure_present().await?;

        let args = self.sign_args(apk);
        let command = format!("{} {}", binary.display(), args.join(" "));
        log::debug!("Running: {}", command);

        let child = Command::new(binary)
            .args(&args)
            .envs(self.credentials.child_env())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SignError::Spawn {
                command: command.clone(),
                source,
            })?;

        // Dropping the timed-out future drops the child, which kills it.
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) if output.status.success() => Ok(()),
            Ok(Ok(output)) => Err(SignError::Failed {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
            Ok(Err(source)) => Err(SignError::Spawn { command, source }),
            Err(_elapsed) => Err(SignError::TimedOut {
                command,
                after: self.timeout,
            }),
        }
    }
}
