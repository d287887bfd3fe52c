//! Pipeline driver.
//!
//! Checks that no two bundles share an APK name, resolves bundletool once,
//! exports every bundle in input order and publishes the joined APK paths.
//! The run is fail-fast: the first failing bundle aborts it and nothing is
//! published.

mod sink;

pub use sink::{EnvSink, EnvmanSink};

use crate::error::{ConfigError, ExportError, Result, StepError, ToolAcquisitionError};
use crate::exporter::{
    ArtifactFetcher, ExportedApk, Exporter, SigningConfig, ToolProvider, VersionSpec,
    apk_file_name, traits::PackagingTool,
};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Environment key the APK path list is published under by default.
pub const DEFAULT_OUTPUT_KEY: &str = "BITRISE_APK_PATH_LIST";

/// Separator between published APK paths.
pub const PATH_LIST_SEPARATOR: &str = "|";

/// Progress of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    ToolResolved,
    /// Exporting the bundle at this index.
    Exporting(usize),
    Aggregated,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::ToolResolved => f.write_str("tool resolved"),
            Self::Exporting(index) => write!(f, "exporting #{index}"),
            Self::Aggregated => f.write_str("aggregated"),
            Self::Done => f.write_str("done"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Everything a run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    /// Bundle locations, in export order.
    pub bundles: Vec<String>,
    /// Directory the APKs are written to.
    pub deploy_dir: PathBuf,
    /// Signing mode shared by all exports.
    pub signing: SigningConfig,
    /// bundletool version to use.
    pub tool_version: VersionSpec,
    /// Environment key for the joined APK paths.
    pub output_key: String,
}

/// Drives a run through its states.
///
/// The tool provider and environment sink are injected so the driver can be
/// exercised without bundletool or envman.
pub struct Pipeline<P, S> {
    provider: P,
    sink: S,
    fetcher: Arc<ArtifactFetcher>,
    temp_root: Option<PathBuf>,
    state: PipelineState,
}

impl<P, S> fmt::Debug for Pipeline<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("fetcher", &self.fetcher)
            .field("temp_root", &self.temp_root)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<P: ToolProvider, S: EnvSink> Pipeline<P, S> {
    pub fn new(provider: P, sink: S, fetcher: Arc<ArtifactFetcher>) -> Self {
        Self {
            provider,
            sink,
            fetcher,
            temp_root: None,
            state: PipelineState::Init,
        }
    }

    /// Places per-export working directories under `root`.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs the whole pipeline and returns the exported APKs in input order.
    pub async fn run(&mut self, input: &PipelineInput) -> Result<Vec<ExportedApk>> {
        self.transition(PipelineState::Init);

        if let Err(e) = check_output_names(&input.bundles) {
            return Err(self.fail(e.into()));
        }

        let provided = self.provider.provide(&input.tool_version).await;
        let tool = match provided {
            Ok(tool) => tool,
            Err(cause) => {
                return Err(self.fail(
                    ToolAcquisitionError {
                        version: input.tool_version.to_string(),
                        cause,
                    }
                    .into(),
                ));
            }
        };
        self.transition(PipelineState::ToolResolved);
        log::info!("{} ready", tool.describe());

        let mut exporter = Exporter::new(tool, self.fetcher.clone());
        if let Some(root) = &self.temp_root {
            exporter = exporter.with_temp_root(root);
        }

        let mut apks = Vec::with_capacity(input.bundles.len());
        for (index, bundle) in input.bundles.iter().enumerate() {
            self.transition(PipelineState::Exporting(index));
            log::info!("Exporting {} ({}/{})", bundle, index + 1, input.bundles.len());

            let exported = exporter
                .export_universal_apk(bundle, &input.deploy_dir, &input.signing)
                .await;
            match exported {
                Ok(apk) => {
                    log::info!("✓ Success! APK exported to: {}", apk.path.display());
                    log::info!("  SHA256: {} ({} bytes)", apk.checksum, apk.size);
                    apks.push(apk);
                }
                Err(cause) => {
                    return Err(self.fail(
                        ExportError {
                            bundle_path: bundle.clone(),
                            cause,
                        }
                        .into(),
                    ));
                }
            }
        }

        self.transition(PipelineState::Aggregated);
        let joined = join_apk_paths(&apks);

        let published = self.sink.set_env(&input.output_key, &joined).await;
        if let Err(e) = published {
            return Err(self.fail(e.into()));
        }
        log::info!("✓ Exported {} APK path(s) as {}", apks.len(), input.output_key);

        self.transition(PipelineState::Done);
        Ok(apks)
    }

    fn transition(&mut self, next: PipelineState) {
        log::debug!("Pipeline: {} -> {}", self.state, next);
        self.state = next;
    }

    fn fail(&mut self, error: StepError) -> StepError {
        log::debug!("Pipeline failed during {} stage", error.stage());
        self.transition(PipelineState::Failed);
        error
    }
}

/// Rejects distinct bundles that would be exported to the same APK file.
///
/// A bundle listed more than once is not a clash. Bundles whose name cannot
/// be derived are left for the export stage to report.
pub fn check_output_names(bundles: &[String]) -> std::result::Result<(), ConfigError> {
    let mut claimed: HashMap<String, &str> = HashMap::new();
    for bundle in bundles {
        let Ok(name) = apk_file_name(bundle) else {
            continue;
        };
        match claimed.get(&name) {
            Some(first) if *first != bundle.as_str() => {
                return Err(ConfigError::InvalidArgument {
                    argument: "aab_path_list".to_string(),
                    reason: format!("{first} and {bundle} would both be exported as {name}"),
                });
            }
            Some(_) => {}
            None => {
                claimed.insert(name, bundle);
            }
        }
    }
    Ok(())
}

/// Joins APK paths with [`PATH_LIST_SEPARATOR`], preserving order.
pub fn join_apk_paths(apks: &[ExportedApk]) -> String {
    apks.iter()
        .map(|apk| apk.path.display().to_string())
        .collect::<Vec<_>>()
        .join(PATH_LIST_SEPARATOR)
}
