//! bundletool integration.
//!
//! bundletool performs the actual bundle to APK set conversion and signing.
//! It is treated as a black box and driven as a subprocess.
//!
//! # Module Organization
//!
//! - `resolver` - version resolution and jar download
//! - `command` - `build-apks` invocation
//! - `apk_set` - universal APK extraction from the produced `.apks`

mod apk_set;
mod command;
mod resolver;

pub use apk_set::{UNIVERSAL_APK_ENTRY, extract_universal_apk};
pub use command::{build_apks_args, redact_args};
pub use resolver::{DEFAULT_API_URL, DEFAULT_DOWNLOAD_URL, ToolHandle, ToolResolver, VersionSpec};

use super::builder::{LocalKeystore, locate_java};
use super::error::Result;
use super::traits::{PackagingTool, ToolProvider};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A resolved bundletool jar plus the Java runtime that runs it.
#[derive(Debug, Clone)]
pub struct Bundletool {
    handle: ToolHandle,
    java: PathBuf,
}

impl Bundletool {
    pub fn new(handle: ToolHandle, java: PathBuf) -> Self {
        Self { handle, java }
    }

    pub fn handle(&self) -> &ToolHandle {
        &self.handle
    }
}

#[async_trait]
impl PackagingTool for Bundletool {
    fn describe(&self) -> String {
        format!("bundletool {}", self.handle.version())
    }

    async fn build_apk_set(
        &self,
        bundle: &Path,
        apk_set: &Path,
        keystore: Option<&LocalKeystore<'_>>,
    ) -> Result<()> {
        command::run_build_apks(&self.java, self.handle.path(), bundle, apk_set, keystore).await
    }

    async fn extract_universal(&self, apk_set: &Path, destination: &Path) -> Result<()> {
        extract_universal_apk(apk_set, destination).await
    }
}

/// Provides [`Bundletool`] instances: downloads the jar and locates Java.
#[derive(Debug, Clone)]
pub struct BundletoolProvider {
    resolver: ToolResolver,
}

impl BundletoolProvider {
    pub fn new(resolver: ToolResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl ToolProvider for BundletoolProvider {
    type Tool = Bundletool;

    async fn provide(&self, version: &VersionSpec) -> Result<Bundletool> {
        let handle = self.resolver.resolve(version).await?;
        let java = locate_java().await?;
        log::info!("bundletool path created at: {}", handle.path().display());
        Ok(Bundletool::new(handle, java))
    }
}
