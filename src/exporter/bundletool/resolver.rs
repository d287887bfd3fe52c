//! bundletool version resolution and acquisition.
//!
//! Resolves a version spec against the GitHub releases of
//! `google/bundletool` and fetches the matching `bundletool-all` jar through
//! the shared [`ArtifactFetcher`].

use crate::{
    bail,
    exporter::{error::Result, utils::http::ArtifactFetcher},
};
use semver::Version;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// GitHub API endpoint of the bundletool repository.
pub const DEFAULT_API_URL: &str = "https://api.github.com/repos/google/bundletool";

/// Base URL release assets are downloaded from.
pub const DEFAULT_DOWNLOAD_URL: &str = "https://github.com/google/bundletool/releases/download";

/// Requested bundletool version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// Newest stable release.
    Latest,
    /// A concrete release tag, used verbatim.
    Exact(String),
}

impl VersionSpec {
    /// Empty input and `latest` (any case) select [`VersionSpec::Latest`].
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("latest") {
            Self::Latest
        } else {
            Self::Exact(raw.to_string())
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Exact(version) => f.write_str(version),
        }
    }
}

/// A bundletool jar available on local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolHandle {
    version: String,
    path: PathBuf,
}

impl ToolHandle {
    pub fn new(version: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            version: version.into(),
            path: path.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Local path of the jar.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    prerelease: bool,
}

/// Turns a [`VersionSpec`] into a local [`ToolHandle`].
///
/// The newest release is looked up once per resolver; clones share it.
#[derive(Debug, Clone)]
pub struct ToolResolver {
    fetcher: Arc<ArtifactFetcher>,
    api_url: String,
    download_url: String,
    latest: Arc<Mutex<Option<String>>>,
}

impl ToolResolver {
    /// Creates a resolver against the public GitHub endpoints.
    pub fn new(fetcher: Arc<ArtifactFetcher>) -> Self {
        Self {
            fetcher,
            api_url: DEFAULT_API_URL.to_string(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            latest: Arc::new(Mutex::new(None)),
        }
    }

    /// Overrides the release API and download base URLs.
    pub fn with_endpoints(mut self, api_url: impl Into<String>, download_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self.download_url = download_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Download URL of the `bundletool-all` jar for `version`.
    pub fn jar_url(&self, version: &str) -> String {
        format!("{}/{}/{}", self.download_url, version, jar_name(version))
    }

    /// Maps the spec to a concrete release tag.
    pub async fn resolve_version(&self, spec: &VersionSpec) -> Result<String> {
        match spec {
            VersionSpec::Exact(version) => Ok(version.clone()),
            VersionSpec::Latest => self.latest_version().await,
        }
    }

    /// Resolves the spec and makes the jar available locally.
    ///
    /// The jar is cached by version, so resolving the same version twice
    /// downloads it at most once.
    pub async fn resolve(&self, spec: &VersionSpec) -> Result<ToolHandle> {
        let version = self.resolve_version(spec).await?;
        log::info!("Using bundletool {version}");

        let path = self
            .fetcher
            .fetch_cached(&version, &self.jar_url(&version), &jar_name(&version))
            .await?;

        Ok(ToolHandle::new(version, path))
    }

    async fn latest_version(&self) -> Result<String> {
        if let Some(tag) = self.known_latest() {
            return Ok(tag);
        }

        let url = format!("{}/releases?per_page=100", self.api_url);
        log::debug!("Fetching bundletool releases from: {}", url);

        let releases: Vec<Release> = self
            .fetcher
            .fetch_json(&url, "application/vnd.github+json")
            .await?;

        let newest = releases
            .into_iter()
            .filter(|release| !release.draft && !release.prerelease)
            .filter_map(|release| {
                let parsed = Version::parse(release.tag_name.trim_start_matches('v')).ok()?;
                Some((parsed, release.tag_name))
            })
            .max_by(|(a, _), (b, _)| a.cmp(b));

        match newest {
            Some((_, tag)) => {
                *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(tag.clone());
                Ok(tag)
            }
            None => bail!("No stable bundletool release found at {}", url),
        }
    }

    fn known_latest(&self) -> Option<String> {
        self.latest.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

fn jar_name(version: &str) -> String {
    format!("bundletool-all-{version}.jar")
}
