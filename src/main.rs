//! Universal APK export step.
//!
//! Converts Android App Bundles into universal APKs with bundletool and
//! publishes the produced paths to the pipeline environment.

use std::process;
use universal_apk_exporter::cli;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{} failed: {}", e.stage(), e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
