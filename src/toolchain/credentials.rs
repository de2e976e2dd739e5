//! Key material handed to `apksigner`.
//!
//! Credentials are read from the environment:
//! - `APK_SIGNER_KEYSTORE`: keystore path, with `APK_SIGNER_KEYSTORE_PASSWORD`,
//!   `APK_SIGNER_KEY_ALIAS` and optionally `APK_SIGNER_KEY_PASSWORD`
//! - `APK_SIGNER_KEY` + `APK_SIGNER_CERT`: PKCS#8 private key and X.509 certificate
//!
//! With neither set, the Android debug keystore (`~/.android/debug.keystore`)
//! is used with its well-known alias and password.
//!
//! Passwords never appear on the command line. They are passed to the child
//! process through environment variables and referenced as `env:<NAME>`.

use crate::error::{CliError, SignError};
use std::path::{Path, PathBuf};

/// Alias of the key inside the Android debug keystore
pub const DEBUG_KEY_ALIAS: &str = "androiddebugkey";

/// Store and key password of the Android debug keystore
pub const DEBUG_KEYSTORE_PASSWORD: &str = "android";

const CHILD_KEYSTORE_PASS_VAR: &str = "APK_SIGNER_CHILD_KS_PASS";
const CHILD_KEY_PASS_VAR: &str = "APK_SIGNER_CHILD_KEY_PASS";

/// Key material for one signing run.
#[derive(Clone, PartialEq, Eq)]
pub enum SigningCredentials {
    /// A JKS or PKCS#12 keystore
    Keystore {
        /// Keystore file
        path: PathBuf,
        /// Key alias inside the keystore
        alias: String,
        /// Keystore password
        store_password: String,
        /// Key password
        key_password: String,
    },
    /// A PKCS#8 private key with its X.509 certificate
    KeyPair {
        /// `.pk8` private key
        key: PathBuf,
        /// `.x509.pem` certificate
        cert: PathBuf,
    },
}

impl std::fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keystore { path, alias, .. } => f
                .debug_struct("Keystore")
                .field("path", path)
                .field("alias", alias)
                .field("store_password", &"<redacted>")
                .field("key_password", &"<redacted>")
                .finish(),
            Self::KeyPair { key, cert } => f
                .debug_struct("KeyPair")
                .field("key", key)
                .field("cert", cert)
                .finish(),
        }
    }
}

impl SigningCredentials {
    /// The Android debug keystore under `home`.
    pub fn debug_keystore(home: &Path) -> Self {
        Self::Keystore {
            path: home.join(".android").join("debug.keystore"),
            alias: DEBUG_KEY_ALIAS.to_string(),
            store_password: DEBUG_KEYSTORE_PASSWORD.to_string(),
            key_password: DEBUG_KEYSTORE_PASSWORD.to_string(),
        }
    }

    /// Reads credentials from the process environment.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
    }

    /// Reads credentials through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let missing = |setting: &str| CliError::MissingSetting {
            setting: setting.to_string(),
        };

        if let Some(path) = lookup("APK_SIGNER_KEYSTORE") {
            let store_password =
                lookup("APK_SIGNER_KEYSTORE_PASSWORD").ok_or_else(|| missing("APK_SIGNER_KEYSTORE_PASSWORD"))?;
            let alias = lookup("APK_SIGNER_KEY_ALIAS").ok_or_else(|| missing("APK_SIGNER_KEY_ALIAS"))?;
            let key_password = lookup("APK_SIGNER_KEY_PASSWORD").unwrap_or_else(|| store_password.clone());
            return Ok(Self::Keystore {
                path: PathBuf::from(path),
                alias,
                store_password,
                key_password,
            });
        }

        match (lookup("APK_SIGNER_KEY"), lookup("APK_SIGNER_CERT")) {
            (Some(key), Some(cert)) => Ok(Self::KeyPair {
                key: PathBuf::from(key),
                cert: PathBuf::from(cert),
            }),
            (Some(_), None) => Err(missing("APK_SIGNER_CERT")),
            (None, Some(_)) => Err(missing("APK_SIGNER_KEY")),
            (None, None) => {
                let home = dirs::home_dir().ok_or_else(|| CliError::InvalidArguments {
                    reason: "cannot locate the home directory for the debug keystore; \
                             set APK_SIGNER_KEYSTORE or APK_SIGNER_KEY/APK_SIGNER_CERT"
                        .to_string(),
                })?;
                Ok(Self::debug_keystore(&home))
            }
        }
    }

    /// Files that must exist before `apksigner` is started.
    pub fn files(&self) -> Vec<&Path> {
        match self {
            Self::Keystore { path, .. } => vec![path.as_path()],
            Self::KeyPair { key, cert } => vec![key.as_path(), cert.as_path()],
        }
    }

    /// Fails with [`SignError::MissingCredential`] for the first file that does not exist.
    pub async fn ensure_present(&self) -> Result<(), SignError> {
        for path in self.files() {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                return Err(SignError::MissingCredential {
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }

    /// Signer arguments for `apksigner sign`, without the input file.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Keystore { path, alias, .. } => vec![
                "--ks".to_string(),
                path.display().to_string(),
                "--ks-key-alias".to_string(),
                alias.clone(),
                "--ks-pass".to_string(),
                format!("env:{CHILD_KEYSTORE_PASS_VAR}"),
                "--key-pass".to_string(),
                format!("env:{CHILD_KEY_PASS_VAR}"),
            ],
            Self::KeyPair { key, cert } => vec![
                "--key".to_string(),
                key.display().to_string(),
                "--cert".to_string(),
                cert.display().to_string(),
            ],
        }
    }

    /// Environment the child process needs for the `env:` password references.
    pub fn child_env(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Keystore {
                store_password,
                key_password,
                ..
            } => vec![
                (CHILD_KEYSTORE_PASS_VAR, store_password.as_str()),
                (CHILD_KEY_PASS_VAR, key_password.as_str()),
            ],
            Self::KeyPair { .. } => Vec::new(),
        }
    }
}
