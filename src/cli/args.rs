//! Command line argument parsing.
//!
//! Every option is optional and can also be set through the environment, so
//! `sign_apks` with no arguments signs `./apks` with the default credentials.

use crate::error::Result;
use crate::settings::{DEFAULT_APKS_DIR, Settings, SettingsBuilder};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Sign every Android APK in a directory
#[derive(Parser, Debug)]
#[command(
    name = "sign_apks",
    version,
    about = "Sign every Android APK in a directory",
    long_about = "Signs every .apk file directly inside <ROOT>/apks concurrently using the Android SDK apksigner.

Credentials come from the environment:
  APK_SIGNER_KEYSTORE, APK_SIGNER_KEYSTORE_PASSWORD, APK_SIGNER_KEY_ALIAS, APK_SIGNER_KEY_PASSWORD
  or APK_SIGNER_KEY + APK_SIGNER_CERT (PKCS#8 key and X.509 certificate)
Without either, ~/.android/debug.keystore is used.

Usage:
  sign_apks
  sign_apks --root ../uiautomator2-server --deadline-secs 600

Exit code 0 = every APK was signed."
)]
pub struct Args {
    /// Project root containing the APK directory (default: current directory)
    #[arg(long, env = "APK_SIGNER_ROOT", value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// APK directory, relative to the root
    #[arg(long, env = "APK_SIGNER_APKS_DIR", value_name = "DIR", default_value = DEFAULT_APKS_DIR)]
    pub apks_dir: PathBuf,

    /// Give up on the whole batch after this many seconds
    #[arg(long, env = "APK_SIGNER_DEADLINE_SECS", value_name = "SECS")]
    pub deadline_secs: Option<u64>,

    /// Path to the apksigner executable (default: PATH, then ANDROID_HOME build-tools)
    #[arg(long, env = "APK_SIGNER_APKSIGNER", value_name = "PATH")]
    pub apksigner: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Builds run settings from the arguments.
    pub fn settings(&self) -> Result<Settings> {
        let mut builder = SettingsBuilder::new().apks_dir(&self.apks_dir);
        if let Some(root) = &self.root {
            builder = builder.root(root);
        }
        if let Some(secs) = self.deadline_secs {
            builder = builder.deadline(Duration::from_secs(secs));
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn maps_arguments_to_settings() {
        let args = Args::try_parse_from([
            "sign_apks",
            "--root",
            "/work/project",
            "--apks-dir",
            "build/apks",
            "--deadline-secs",
            "30",
        ])
        .unwrap();
        let settings = args.settings().unwrap();

        assert_eq!(settings.apks_directory(), PathBuf::from("/work/project/build/apks"));
        assert_eq!(settings.deadline(), Some(Duration::from_secs(30)));
    }
}
