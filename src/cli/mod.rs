//! Command line interface for the universal APK export step.
//!
//! Parses and validates inputs, wires up the production collaborators
//! (bundletool provider, envman sink) and runs the pipeline.

mod args;

pub use args::{Args, RuntimeConfig, default_tool_cache_dir};

use crate::error::{Result, StepError, ToolAcquisitionError};
use crate::exporter::{ArtifactFetcher, BundletoolProvider, Error, ToolResolver};
use crate::pipeline::{EnvmanSink, Pipeline};
use std::sync::Arc;

/// User agent sent to GitHub and download hosts.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Main CLI entry point
pub async fn run() -> Result<()> {
    let args = Args::parse_args();
    let config = RuntimeConfig::try_from(&args)?;
    args.log_summary();

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| {
            StepError::ToolAcquisition(ToolAcquisitionError {
                version: config.input().tool_version.to_string(),
                cause: Error::Http(e),
            })
        })?;

    let fetcher = Arc::new(ArtifactFetcher::new(client, config.tool_cache_dir().clone()));
    let provider = BundletoolProvider::new(ToolResolver::new(fetcher.clone()));

    let mut pipeline = Pipeline::new(provider, EnvmanSink::new(), fetcher);
    pipeline.run(config.input()).await?;

    Ok(())
}
