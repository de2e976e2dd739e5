//! Command line interface and build-runner entry points.
//!
//! [`run`] is the standalone entry point used by the `sign_apks` binary.
//! [`sign_apks_task`] is the same operation for a build runner that wants the
//! error back instead of a process exit code.

mod args;

pub use args::Args;

use crate::error::Result;
use crate::settings::Settings;
use crate::signer::{ApkSigner, BatchSigner, SignedArtifact};
use crate::toolchain::ApksignerTool;
use std::sync::Arc;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let settings = args.settings()?;

    let mut tool = ApksignerTool::from_env()?;
    if let Some(path) = &args.apksigner {
        tool = tool.apksigner(path);
    }

    let artifacts = sign_with(&settings, Arc::new(tool)).await?;
    for artifact in &artifacts {
        println!("✓ {} ({} bytes)", artifact.path.display(), artifact.size);
        println!("  SHA256: {}", artifact.checksum);
    }

    Ok(0)
}

/// Signs the APKs described by `settings` with an apksigner configured from
/// the environment.
pub async fn sign_apks_task(settings: &Settings) -> Result<Vec<SignedArtifact>> {
    let tool = ApksignerTool::from_env()?;
    sign_with(settings, Arc::new(tool)).await
}

/// Signs the APKs described by `settings` through `signer`.
pub async fn sign_with<S: ApkSigner + 'static>(
    settings: &Settings,
    signer: Arc<S>,
) -> Result<Vec<SignedArtifact>> {
    let mut batch = BatchSigner::new(signer);
    if let Some(deadline) = settings.deadline() {
        batch = batch.deadline(deadline);
    }

    batch.run(&settings.apks_directory()).await
}
