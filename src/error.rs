//! Error types for APK batch signing.
//!
//! [`SignerError`] is what a batch operation returns to its caller,
//! [`SignError`] is what a single signing collaborator call returns, and
//! [`CliError`] covers argument and configuration problems.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for batch signing operations
pub type Result<T> = std::result::Result<T, SignerError>;

/// Main error type for batch signing
#[derive(Error, Debug)]
pub enum SignerError {
    /// The scanned directory contained no `.apk` entries
    #[error("There are no .apk files available for signing in '{}'", directory.display())]
    NoCandidates {
        /// Directory that was scanned
        directory: PathBuf,
    },

    /// The directory could not be enumerated
    #[error("Cannot read APK directory '{}': {source}", directory.display())]
    DirectoryAccess {
        /// Directory that was scanned
        directory: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// One or more files failed to sign
    #[error("{}", describe_failures(failures))]
    SigningFailure {
        /// Every file that failed, in the order the failures settled
        failures: Vec<FileFailure>,
    },

    /// The whole batch ran past its deadline
    #[error(
        "Signing APKs in '{}' did not finish within {} seconds",
        directory.display(),
        after.as_secs()
    )]
    DeadlineExceeded {
        /// Directory being signed
        directory: PathBuf,
        /// Configured deadline
        after: Duration,
    },

    /// IO errors outside of directory enumeration
    #[error("IO error while {operation} '{}': {source}", path.display())]
    Io {
        /// What was being done
        operation: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),
}

/// A single file that failed to sign.
#[derive(Debug)]
pub struct FileFailure {
    /// The APK that failed
    pub path: PathBuf,
    /// Why it failed
    pub error: SignError,
}

fn describe_failures(failures: &[FileFailure]) -> String {
    match failures {
        [single] => format!("Failed to sign '{}': {}", single.path.display(), single.error),
        _ => {
            let mut message = format!("Failed to sign {} APK files:", failures.len());
            for failure in failures {
                message.push_str(&format!("\n  • {}: {}", failure.path.display(), failure.error));
            }
            message
        }
    }
}

/// Errors from one call into a signing collaborator
#[derive(Error, Debug)]
pub enum SignError {
    /// The signing tool could not be located
    #[error("{tool} not found: {reason}")]
    ToolNotFound {
        /// Tool name
        tool: String,
        /// What was searched
        reason: String,
    },

    /// A key, certificate or keystore file does not exist
    #[error("Signing credential not found: {}", path.display())]
    MissingCredential {
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// The tool could not be started
    #[error("Failed to execute {command}: {source}")]
    Spawn {
        /// Command that failed to start
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and reported failure
    #[error("{command} exited with {}: {}", describe_code(*code), stderr.trim())]
    Failed {
        /// Command that failed
        command: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The tool did not finish in time and was killed
    #[error("{command} timed out after {} seconds", after.as_secs())]
    TimedOut {
        /// Command that timed out
        command: String,
        /// Timeout that elapsed
        after: Duration,
    },

    /// The signing task panicked or was cancelled
    #[error("Signing task aborted: {0}")]
    Aborted(String),
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// A required setting was not provided
    #[error("Missing required setting: {setting}")]
    MissingSetting {
        /// Setting name
        setting: String,
    },
}

impl SignerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Self::NoCandidates { directory } => vec![format!(
                "Place the .apk files to sign in '{}' (the extension match is case-sensitive)",
                directory.display()
            )],
            Self::DirectoryAccess { directory, .. } => vec![
                format!("Create '{}' or point APK_SIGNER_ROOT at the project root", directory.display()),
                "Check the directory permissions".to_string(),
            ],
            Self::SigningFailure { failures } => {
                let mut suggestions = Vec::new();
                if failures
                    .iter()
                    .any(|f| matches!(f.error, SignError::ToolNotFound { .. }))
                {
                    suggestions.push(
                        "Install the Android SDK build-tools and set ANDROID_HOME, or set APK_SIGNER_APKSIGNER"
                            .to_string(),
                    );
                }
                if failures
                    .iter()
                    .any(|f| matches!(f.error, SignError::MissingCredential { .. }))
                {
                    suggestions.push(
                        "Set APK_SIGNER_KEYSTORE or APK_SIGNER_KEY/APK_SIGNER_CERT to existing files"
                            .to_string(),
                    );
                }
                suggestions.push("Re-run with RUST_LOG=debug to see the apksigner command lines".to_string());
                suggestions
            }
            Self::DeadlineExceeded { .. } => {
                vec!["Raise the deadline with APK_SIGNER_DEADLINE_SECS or --deadline-secs".to_string()]
            }
            Self::Io { .. } | Self::Cli(_) => {
                vec!["Check the error message above for specific details".to_string()]
            }
        }
    }

    /// Whether fixing the environment and re-running can succeed
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Cli(_))
    }
}

/// Attaches the operation and path to I/O errors.
pub trait ErrorExt<T> {
    /// Wraps an I/O error as [`SignerError::Io`]
    fn fs_context(self, operation: &'static str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, operation: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| SignerError::Io {
            operation,
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_candidates_message_names_directory() {
        let err = SignerError::NoCandidates {
            directory: PathBuf::from("/work/apks"),
        };
        assert!(err.to_string().contains("/work/apks"));
        assert!(err.recovery_suggestions()[0].contains("/work/apks"));
    }

    #[test]
    fn single_failure_names_file() {
        let err = SignerError::SigningFailure {
            failures: vec![FileFailure {
                path: PathBuf::from("a.apk"),
                error: SignError::Failed {
                    command: "apksigner sign".to_string(),
                    code: Some(1),
                    stderr: "bad key\n".to_string(),
                },
            }],
        };
        assert_eq!(
            err.to_string(),
            "Failed to sign 'a.apk': apksigner sign exited with exit code 1: bad key"
        );
    }

    #[test]
    fn multiple_failures_are_listed() {
        let failure = |name: &str| FileFailure {
            path: PathBuf::from(name),
            error: SignError::Aborted("panicked".to_string()),
        };
        let err = SignerError::SigningFailure {
            failures: vec![failure("a.apk"), failure("b.apk")],
        };
        let message = err.to_string();
        assert!(message.starts_with("Failed to sign 2 APK files:"));
        assert!(message.contains("a.apk"));
        assert!(message.contains("b.apk"));
    }

    #[test]
    fn missing_tool_suggests_sdk_install() {
        let err = SignerError::SigningFailure {
            failures: vec![FileFailure {
                path: PathBuf::from("a.apk"),
                error: SignError::ToolNotFound {
                    tool: "apksigner".to_string(),
                    reason: "not on PATH".to_string(),
                },
            }],
        };
        assert!(err.recovery_suggestions()[0].contains("ANDROID_HOME"));
    }

    #[test]
    fn fs_context_wraps_io_error() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = result.fs_context("reading", Path::new("x.apk")).unwrap_err();
        assert!(matches!(err, SignerError::Io { operation: "reading", .. }));
    }
}
