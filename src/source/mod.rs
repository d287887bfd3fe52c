//! Input location resolution
//!
//! Keystores and bundles may be given as local paths, `file://` URLs or
//! `http(s)://` URLs. Remote locations are downloaded into a caller-owned
//! working directory.

use crate::exporter::{Error, ErrorExt, Result, utils::http::ArtifactFetcher};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    Local(PathBuf),
    Remote(Url),
}

impl ArtifactSource {
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();

        // file:// URL
        if location.starts_with("file://") {
            let url = Url::parse(location)?;
            let path = url
                .to_file_path()
                .map_err(|_| Error::GenericError(format!("Not a valid file URL: {location}")))?;
            return Ok(Self::Local(path));
        }

        // Remote URL
        if location.starts_with("http://") || location.starts_with("https://") {
            return Ok(Self::Remote(Url::parse(location)?));
        }

        // Local path
        Ok(Self::Local(PathBuf::from(location)))
    }

    /// Final path component, used to name downloads and derived outputs.
    pub fn file_name(&self) -> Option<String> {
        match self {
            Self::Local(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            Self::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(str::to_string),
        }
    }

    /// Returns a local path for this source, downloading remote sources into `work_dir`.
    ///
    /// Local paths must exist. Downloads are not cached; they live as long
    /// as `work_dir` does.
    pub async fn resolve(&self, fetcher: &ArtifactFetcher, work_dir: &Path) -> Result<PathBuf> {
        match self {
            Self::Local(path) => {
                tokio::fs::metadata(path)
                    .await
                    .fs_context("locating input file", path)?;
                Ok(path.clone())
            }
            Self::Remote(url) => {
                let file_name = self.file_name().unwrap_or_else(|| "download".to_string());
                let destination = work_dir.join(file_name);
                fetcher.download_to(url.as_str(), &destination).await?;
                Ok(destination)
            }
        }
    }
}
