//! HTTP utilities for downloading bundletool and remote inputs.
//!
//! [`ArtifactFetcher`] owns the HTTP client and the tool cache. It is built
//! once per run and passed down to whatever needs network access.

use crate::bail;
use crate::exporter::error::{ErrorExt, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::AsyncWriteExt;

/// Downloads artifacts to local storage, caching keyed downloads.
///
/// Keyed downloads are cached twice: in memory for the lifetime of the
/// fetcher and on disk under `cache_dir/<key>/`, so a later run with the
/// same cache directory does not hit the network either.
#[derive(Debug)]
pub struct ArtifactFetcher {
    client: reqwest::Client,
    cache_dir: PathBuf,
    cached: Mutex<HashMap<String, PathBuf>>,
    fetches: AtomicUsize,
}

impl ArtifactFetcher {
    /// Creates a fetcher that stores keyed downloads under `cache_dir`.
    pub fn new(client: reqwest::Client, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            cache_dir: cache_dir.into(),
            cached: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Number of network requests performed so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Returns the local path of `file_name` cached under `key`, downloading it from `url` on a miss.
    pub async fn fetch_cached(&self, key: &str, url: &str, file_name: &str) -> Result<PathBuf> {
        if let Some(path) = self.lookup(key) {
            log::debug!("Cache hit for {key}: {}", path.display());
            return Ok(path);
        }

        let path = self.cache_dir.join(cache_entry(key)?).join(file_name);

        let cached = tokio::fs::try_exists(&path)
            .await
            .fs_context("checking tool cache", &path)?;
        if cached {
            log::debug!("Found cached {key} at {}", path.display());
        } else {
            self.download_to(url, &path).await?;
        }

        self.remember(key, &path);
        Ok(path)
    }

    /// Fetches `url` and deserializes the JSON body.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str, accept: &str) -> Result<T> {
        log::debug!("Fetching {}", url);
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let body = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// Downloads `url` to `destination`, creating parent directories.
    ///
    /// The body is streamed into a `.part` sibling which is renamed into
    /// place only after the download completed.
    pub async fn download_to(&self, url: &str, destination: &Path) -> Result<()> {
        log::info!("Downloading {}", url);
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating download directory", parent)?;
        }

        let partial = destination.with_extension("part");
        let written = self.stream_to_file(url, &partial).await;
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }

        tokio::fs::rename(&partial, destination)
            .await
            .fs_context("moving download into place", destination)?;

        log::debug!("Saved {} to {}", url, destination.display());
        Ok(())
    }

    async fn stream_to_file(&self, url: &str, path: &Path) -> Result<()> {
        let mut response = self.client.get(url).send().await?.error_for_status()?;

        let mut file = tokio::fs::File::create(path)
            .await
            .fs_context("creating download file", path)?;

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk)
                .await
                .fs_context("writing download file", path)?;
        }
        file.flush().await.fs_context("flushing download file", path)?;

        Ok(())
    }

    fn lookup(&self, key: &str) -> Option<PathBuf> {
        let cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        cached.get(key).cloned()
    }

    fn remember(&self, key: &str, path: &Path) {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        cached.insert(key.to_string(), path.to_path_buf());
    }
}

/// Cache directory name for `key`. Separators are flattened; keys that
/// would name the cache root or its parent are rejected.
fn cache_entry(key: &str) -> Result<String> {
    let entry = key.trim().replace(['/', '\\'], "_");
    if entry.chars().all(|c| c == '.') {
        bail!("Invalid cache key: {key:?}");
    }
    Ok(entry)
}
