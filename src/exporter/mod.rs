//! Bundle to universal APK export.
//!
//! This module holds the export core: parsing the bundle list, building
//! the signing configuration, acquiring bundletool and running per-bundle
//! exports.
//!
//! # Example
//!
//! ```no_run
//! use std::{path::Path, sync::Arc};
//! use universal_apk_exporter::exporter::{
//!     ArtifactFetcher, BundletoolProvider, Exporter, SigningConfig, ToolProvider,
//!     ToolResolver, VersionSpec, parse_path_list,
//! };
//!
//! # async fn example() -> universal_apk_exporter::exporter::Result<()> {
//! let fetcher = Arc::new(ArtifactFetcher::new(reqwest::Client::new(), "/tmp/bundletool-cache"));
//! let provider = BundletoolProvider::new(ToolResolver::new(fetcher.clone()));
//! let tool = provider.provide(&VersionSpec::Latest).await?;
//!
//! let exporter = Exporter::new(tool, fetcher);
//! for bundle in parse_path_list("app.aab|wear.aab") {
//!     let apk = exporter
//!         .export_universal_apk(&bundle, Path::new("deploy"), &SigningConfig::Unsigned)
//!         .await?;
//!     println!("Created: {}", apk.path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod bundletool;
pub mod error;
pub mod path_list;
pub mod traits;
pub mod utils;

pub use builder::{
    ExportedApk, Exporter, KeystoreConfig, LocalKeystore, SigningConfig, apk_file_name,
};
pub use bundletool::{Bundletool, BundletoolProvider, ToolHandle, ToolResolver, VersionSpec};
pub use error::{Context, Error, ErrorExt, Result};
pub use path_list::parse_path_list;
pub use traits::{PackagingTool, ToolProvider};
pub use utils::http::ArtifactFetcher;
