//! Common test infrastructure
//!
//! Fakes for the packaging tool, tool provider and environment sink, plus
//! helpers for building bundles and APK sets on disk.

#![allow(dead_code)]

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use universal_apk_exporter::PublishError;
use universal_apk_exporter::exporter::bundletool::extract_universal_apk;
use universal_apk_exporter::exporter::{
    ArtifactFetcher, Error, LocalKeystore, PackagingTool, Result, ToolProvider, VersionSpec,
};
use universal_apk_exporter::pipeline::EnvSink;

/// One `build_apk_set` invocation seen by [`FakeTool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCall {
    pub bundle: PathBuf,
    pub keystore: Option<PathBuf>,
    pub key_alias: Option<String>,
}

/// In-process stand-in for bundletool.
///
/// Writes an APK set whose universal APK contains `apk:<bundle file name>`.
/// Clones share the recorded calls.
#[derive(Debug, Clone, Default)]
pub struct FakeTool {
    calls: Arc<Mutex<Vec<BuildCall>>>,
    fail_on: Option<String>,
    omit_universal: bool,
}

impl FakeTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the build of any bundle whose file name equals `name`.
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Produces APK sets without a universal variant.
    pub fn without_universal() -> Self {
        Self {
            omit_universal: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<BuildCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PackagingTool for FakeTool {
    fn describe(&self) -> String {
        "fake bundletool".to_string()
    }

    async fn build_apk_set(
        &self,
        bundle: &Path,
        apk_set: &Path,
        keystore: Option<&LocalKeystore<'_>>,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(BuildCall {
            bundle: bundle.to_path_buf(),
            keystore: keystore.map(|k| k.path().to_path_buf()),
            key_alias: keystore.map(|k| k.credentials().key_alias().to_string()),
        });

        let name = file_name(bundle);
        if self.fail_on.as_deref() == Some(name.as_str()) {
            return Err(Error::ToolFailed {
                tool: "bundletool".to_string(),
                code: Some(1),
                stderr: format!("cannot read {name}"),
            });
        }

        let universal = (!self.omit_universal).then(|| format!("apk:{name}"));
        write_apk_set(apk_set, universal.as_deref().map(str::as_bytes))
    }

    async fn extract_universal(&self, apk_set: &Path, destination: &Path) -> Result<()> {
        extract_universal_apk(apk_set, destination).await
    }
}

/// Provider handing out clones of one [`FakeTool`], or failing.
#[derive(Debug, Default)]
pub struct FakeProvider {
    tool: FakeTool,
    fail: bool,
    provided: AtomicUsize,
}

impl FakeProvider {
    pub fn new(tool: FakeTool) -> Self {
        Self {
            tool,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn provided(&self) -> usize {
        self.provided.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolProvider for FakeProvider {
    type Tool = FakeTool;

    async fn provide(&self, version: &VersionSpec) -> Result<FakeTool> {
        self.provided.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::GenericError(format!("no bundletool release {version}")));
        }
        Ok(self.tool.clone())
    }
}

/// Sink recording every published pair, or rejecting them.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl EnvSink for RecordingSink {
    async fn set_env(&self, key: &str, value: &str) -> std::result::Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::Rejected {
                key: key.to_string(),
                reason: "envman store is read-only".to_string(),
            });
        }
        self.entries
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// Writes an `.apks` archive, with a universal entry when `universal` is given.
pub fn write_apk_set(path: &Path, universal: Option<&[u8]>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("toc.pb", options)?;
    zip.write_all(b"toc")?;

    if let Some(contents) = universal {
        zip.start_file("universal.apk", options)?;
        zip.write_all(contents)?;
    }

    zip.finish()?;
    Ok(())
}

/// Creates a placeholder bundle file and returns its path as a string.
pub fn create_bundle(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, b"aab").unwrap();
    path.display().to_string()
}

/// Fetcher with a cache inside `dir`.
pub fn fetcher(dir: &Path) -> Arc<ArtifactFetcher> {
    Arc::new(ArtifactFetcher::new(reqwest::Client::new(), dir.join("cache")))
}

/// Number of entries directly inside `dir`.
pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
