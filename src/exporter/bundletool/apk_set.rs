//! Universal APK extraction from an APK set.
//!
//! An `.apks` file is a zip archive. In universal mode bundletool stores the
//! single all-configurations variant as `universal.apk` at its root.

use crate::exporter::error::{Error, ErrorExt, Result};
use std::path::Path;

/// Archive entry holding the universal variant.
pub const UNIVERSAL_APK_ENTRY: &str = "universal.apk";

/// Copies the universal APK out of `apk_set` into `destination`.
pub async fn extract_universal_apk(apk_set: &Path, destination: &Path) -> Result<()> {
    let apk_set = apk_set.to_path_buf();
    let destination = destination.to_path_buf();

    // zip is synchronous; keep it off the async workers
    tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&apk_set).fs_context("opening APK set", &apk_set)?;
        let mut archive = zip::ZipArchive::new(file)?;

        let mut entry = match archive.by_name(UNIVERSAL_APK_ENTRY) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(Error::MissingUniversalApk(apk_set.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut out = std::fs::File::create(&destination)
            .fs_context("creating universal APK", &destination)?;
        std::io::copy(&mut entry, &mut out).fs_context("extracting universal APK", &destination)?;

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("APK set extraction task panicked: {}", e)))?
}
