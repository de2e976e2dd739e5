//! Locating the `apksigner` executable.
//!
//! Search order:
//! 1. An explicitly configured path
//! 2. `apksigner` on `PATH`
//! 3. The newest `build-tools/<version>/apksigner` under `ANDROID_HOME`,
//!    then `ANDROID_SDK_ROOT`

use crate::error::SignError;
use std::path::{Path, PathBuf};

/// Executable name of the signer inside an SDK build-tools directory
#[cfg(windows)]
pub const APKSIGNER_BINARY: &str = "apksigner.bat";

/// Executable name of the signer inside an SDK build-tools directory
#[cfg(not(windows))]
pub const APKSIGNER_BINARY: &str = "apksigner";

/// Environment variables that may point at an Android SDK, in priority order
pub const SDK_ROOT_VARS: [&str; 2] = ["ANDROID_HOME", "ANDROID_SDK_ROOT"];

/// Android SDK roots named by the environment, in priority order.
pub fn sdk_roots_from_env() -> Vec<PathBuf> {
    SDK_ROOT_VARS
        .iter()
        .filter_map(|var| std::env::var_os(var))
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Finds `apksigner`, returning [`SignError::ToolNotFound`] with the places
/// that were searched when it is nowhere to be found.
pub fn locate_apksigner(explicit: Option<&Path>, sdk_roots: &[PathBuf]) -> Result<PathBuf, SignError> {
    if let Some(path) = explicit {
        if path.is_file() {
            log::debug!("Using configured apksigner at: {}", path.display());
            return Ok(path.to_path_buf());
        }
        return Err(SignError::ToolNotFound {
            tool: "apksigner".to_string(),
            reason: format!("configured path {} is not a file", path.display()),
        });
    }

    match which::which(APKSIGNER_BINARY) {
        Ok(path) => {
            log::debug!("Found apksigner on PATH at: {}", path.display());
            return Ok(path);
        }
        Err(e) => log::debug!("apksigner not found in PATH: {}", e),
    }

    for root in sdk_roots {
        if let Some(path) = newest_build_tools_signer(root) {
            log::debug!("Found apksigner in Android SDK at: {}", path.display());
            return Ok(path);
        }
        log::debug!("No build-tools apksigner under {}", root.display());
    }

    let searched = if sdk_roots.is_empty() {
        format!("not on PATH and none of {} is set", SDK_ROOT_VARS.join(", "))
    } else {
        let roots: Vec<_> = sdk_roots.iter().map(|r| r.display().to_string()).collect();
        format!("not on PATH and not under build-tools in {}", roots.join(", "))
    };

    Err(SignError::ToolNotFound {
        tool: "apksigner".to_string(),
        reason: searched,
    })
}

/// Picks the highest build-tools version that ships an apksigner.
fn newest_build_tools_signer(sdk_root: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(sdk_root.join("build-tools")).ok()?;

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|dir| dir.join(APKSIGNER_BINARY).is_file())
        .max_by_key(|dir| {
            dir.file_name()
                .map(|name| version_key(&name.to_string_lossy()))
                .unwrap_or_default()
        })
        .map(|dir| dir.join(APKSIGNER_BINARY))
}

/// Numeric ordering key for build-tools directory names such as `34.0.0` or
/// `35.0.0-rc1`.
fn version_key(name: &str) -> Vec<u64> {
    name.split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect()
}
