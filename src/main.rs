//! sign_apks - signs every Android APK in `./apks` concurrently.
//!
//! Exit code 0 means every APK was signed; any failure exits with 1.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = match apk_batch_signer::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  → {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
