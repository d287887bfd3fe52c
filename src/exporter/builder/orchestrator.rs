//! Per-bundle export orchestration.
//!
//! This module provides the [`Exporter`] that turns one bundle into one
//! universal APK in the deploy directory.

use crate::{
    exporter::{
        builder::{ExportedApk, LocalKeystore, SigningConfig},
        error::{Context, ErrorExt, Result},
        traits::PackagingTool,
        utils::{fs, http::ArtifactFetcher},
    },
    source::ArtifactSource,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::checksum::calculate_sha256;

/// Exports bundles to universal APKs with a single packaging tool.
///
/// Every export runs in its own temporary working directory which holds
/// downloaded inputs and the intermediate APK set. The directory is removed
/// when the export ends, whether it succeeded or not.
///
/// # Examples
///
/// ```no_run
/// use std::{path::Path, sync::Arc};
/// use universal_apk_exporter::exporter::{
///     ArtifactFetcher, Bundletool, Exporter, SigningConfig,
/// };
///
/// # async fn example(tool: Bundletool, fetcher: Arc<ArtifactFetcher>) -> universal_apk_exporter::exporter::Result<()> {
/// let exporter = Exporter::new(tool, fetcher);
/// let apk = exporter
///     .export_universal_apk("app.aab", Path::new("deploy"), &SigningConfig::Unsigned)
///     .await?;
/// println!("{} ({} bytes)", apk.path.display(), apk.size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Exporter<T> {
    tool: T,
    fetcher: Arc<ArtifactFetcher>,
    temp_root: Option<PathBuf>,
}

impl<T: PackagingTool> Exporter<T> {
    pub fn new(tool: T, fetcher: Arc<ArtifactFetcher>) -> Self {
        Self {
            tool,
            fetcher,
            temp_root: None,
        }
    }

    /// Places working directories under `root` instead of the system temp dir.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Exports `bundle` to `<output_dir>/<bundle stem>.apk`.
    ///
    /// # Process
    ///
    /// 1. Create a scoped working directory
    /// 2. Resolve the bundle (and keystore, when signing) to local files
    /// 3. Build the APK set with the packaging tool
    /// 4. Extract the universal variant and copy it to `output_dir`
    /// 5. Checksum the result
    pub async fn export_universal_apk(
        &self,
        bundle: &str,
        output_dir: &Path,
        signing: &SigningConfig,
    ) -> Result<ExportedApk> {
        let source = ArtifactSource::parse(bundle)?;
        let stem = output_stem(&source)?;

        let work_dir = self.create_work_dir()?;
        log::debug!("Working directory for {bundle}: {}", work_dir.path().display());

        let bundle_path = source.resolve(&self.fetcher, work_dir.path()).await?;

        let keystore = match signing {
            SigningConfig::Signed(credentials) => {
                let keystore_dir = work_dir.path().join("keystore");
                let path = ArtifactSource::parse(credentials.location())?
                    .resolve(&self.fetcher, &keystore_dir)
                    .await?;
                Some(LocalKeystore::new(path, credentials))
            }
            SigningConfig::Unsigned => None,
        };

        log::info!(
            "Building {} APK set from {} with {}",
            if keystore.is_some() { "signed" } else { "unsigned" },
            bundle_path.display(),
            self.tool.describe()
        );
        let apk_set = work_dir.path().join(format!("{stem}.apks"));
        self.tool
            .build_apk_set(&bundle_path, &apk_set, keystore.as_ref())
            .await?;

        let universal = work_dir.path().join(format!("{stem}-universal.apk"));
        self.tool.extract_universal(&apk_set, &universal).await?;

        let apk_path = output_dir.join(apk_name(&stem));
        fs::copy_file(&universal, &apk_path).await?;

        let size = tokio::fs::metadata(&apk_path)
            .await
            .fs_context("reading exported APK metadata", &apk_path)?
            .len();
        let checksum = calculate_sha256(&apk_path).await?;

        if let Err(e) = work_dir.close() {
            log::warn!("Failed to remove working directory: {e}");
        }

        Ok(ExportedApk {
            bundle: bundle.to_string(),
            path: apk_path,
            size,
            checksum,
        })
    }

    fn create_work_dir(&self) -> Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("universal-apk-");
        match &self.temp_root {
            Some(root) => builder
                .tempdir_in(root)
                .fs_context("creating working directory", root),
            None => builder
                .tempdir()
                .fs_context("creating working directory", &std::env::temp_dir()),
        }
    }
}

/// File name of the APK exported from `bundle`, e.g. `app.apk` for `ci/app.aab`.
pub fn apk_file_name(bundle: &str) -> Result<String> {
    let source = ArtifactSource::parse(bundle)?;
    Ok(apk_name(&output_stem(&source)?))
}

fn apk_name(stem: &str) -> String {
    format!("{stem}.apk")
}

fn output_stem(source: &ArtifactSource) -> Result<String> {
    source
        .file_name()
        .and_then(|name| Some(Path::new(&name).file_stem()?.to_string_lossy().into_owned()))
        .filter(|stem| !stem.is_empty())
        .context("bundle path has no file name")
}
