//! Seams between the export logic and the external packaging tool.
//!
//! The pipeline only talks to bundletool through these traits, so the
//! export flow can run against an in-process fake.

use super::bundletool::VersionSpec;
use super::builder::LocalKeystore;
use super::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// An external tool able to turn a bundle into an APK set.
#[async_trait]
pub trait PackagingTool: Send + Sync {
    /// Human readable identification, e.g. `bundletool 1.17.2`.
    fn describe(&self) -> String;

    /// Builds an APK set at `apk_set` from `bundle`.
    ///
    /// The set is signed with `keystore` when given, otherwise it is left
    /// to the tool's unsigned/debug behaviour.
    async fn build_apk_set(
        &self,
        bundle: &Path,
        apk_set: &Path,
        keystore: Option<&LocalKeystore<'_>>,
    ) -> Result<()>;

    /// Writes the universal variant contained in `apk_set` to `destination`.
    async fn extract_universal(&self, apk_set: &Path, destination: &Path) -> Result<()>;
}

/// Acquires a [`PackagingTool`] for a requested version.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    type Tool: PackagingTool;

    async fn provide(&self, version: &VersionSpec) -> Result<Self::Tool>;
}
