//! Command line argument parsing and validation.
//!
//! Every input can be given as a flag or through the environment variable
//! the CI system sets for step inputs.

use crate::error::ConfigError;
use crate::exporter::{SigningConfig, VersionSpec, parse_path_list};
use crate::pipeline::{DEFAULT_OUTPUT_KEY, PipelineInput};
use clap::Parser;
use std::path::PathBuf;

/// Export universal APKs from Android App Bundles
#[derive(Parser, Debug)]
#[command(
    name = "export-universal-apk",
    version,
    about = "Export universal APKs from Android App Bundles",
    long_about = "Converts one or more Android App Bundles (.aab) into universal APKs with bundletool.

APKs are written to the deploy directory as <bundle name>.apk and their paths are
published, joined by '|', through envman.

Usage:
  export-universal-apk --aab-path-list app.aab --deploy-dir ./deploy
  aab_path_list='app.aab|wear.aab' BITRISE_DEPLOY_DIR=./deploy export-universal-apk

Exit code 0 = every APK was exported and published."
)]
pub struct Args {
    /// Directory the APKs are written to
    #[arg(long, env = "BITRISE_DEPLOY_DIR", value_name = "DIR", default_value = "")]
    pub deploy_dir: String,

    /// Bundle paths or URLs separated by newlines or '|'
    #[arg(long, env = "aab_path_list", value_name = "LIST", default_value = "")]
    pub aab_path_list: String,

    /// Keystore path, file:// or http(s):// URL
    #[arg(long, env = "keystore_url", value_name = "LOCATION", default_value = "")]
    pub keystore_url: String,

    /// Keystore password
    #[arg(long, env = "keystore_password", default_value = "", hide_env_values = true)]
    pub keystore_password: String,

    /// Signing key alias
    #[arg(long, env = "keystore_alias", default_value = "")]
    pub keystore_alias: String,

    /// Signing key password
    #[arg(long, env = "private_key_password", default_value = "", hide_env_values = true)]
    pub private_key_password: String,

    /// bundletool release to use; empty or "latest" picks the newest
    #[arg(long, env = "bundletool_version", value_name = "VERSION", default_value = "")]
    pub bundletool_version: String,

    /// Persistent bundletool download cache
    #[arg(long, env = "BUNDLETOOL_CACHE_DIR", value_name = "DIR")]
    pub tool_cache_dir: Option<PathBuf>,

    /// Environment key the APK path list is published under
    #[arg(long, env = "APK_PATH_LIST_KEY", value_name = "KEY", default_value = DEFAULT_OUTPUT_KEY)]
    pub output_key: String,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deploy_dir.trim().is_empty() {
            return Err(ConfigError::MissingArgument {
                argument: "deploy_dir (BITRISE_DEPLOY_DIR)".to_string(),
            });
        }

        if self.aab_path_list.trim().is_empty() {
            return Err(ConfigError::MissingArgument {
                argument: "aab_path_list".to_string(),
            });
        }

        if parse_path_list(&self.aab_path_list).is_empty() {
            return Err(ConfigError::InvalidArgument {
                argument: "aab_path_list".to_string(),
                reason: "no bundle paths found".to_string(),
            });
        }

        if self.output_key.trim().is_empty() {
            return Err(ConfigError::MissingArgument {
                argument: "output_key".to_string(),
            });
        }

        Ok(())
    }

    /// Logs the effective inputs, with secrets masked.
    pub fn log_summary(&self) {
        log::info!("Config:");
        log::info!("- deploy_dir: {}", self.deploy_dir);
        log::info!("- aab_path_list: {}", self.aab_path_list);
        log::info!("- keystore_url: {}", self.keystore_url);
        log::info!("- keystore_password: {}", mask(&self.keystore_password));
        log::info!("- keystore_alias: {}", self.keystore_alias);
        log::info!("- private_key_password: {}", mask(&self.private_key_password));
        log::info!("- bundletool_version: {}", self.bundletool_version);
        log::info!("- output_key: {}", self.output_key);
    }
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "***" }
}

/// Configuration derived from validated arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    input: PipelineInput,
    tool_cache_dir: PathBuf,
}

impl TryFrom<&Args> for RuntimeConfig {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        args.validate()?;

        let input = PipelineInput {
            bundles: parse_path_list(&args.aab_path_list),
            deploy_dir: PathBuf::from(args.deploy_dir.trim()),
            signing: SigningConfig::from_fields(
                &args.keystore_url,
                &args.keystore_password,
                &args.keystore_alias,
                &args.private_key_password,
            ),
            tool_version: VersionSpec::parse(&args.bundletool_version),
            output_key: args.output_key.trim().to_string(),
        };

        let tool_cache_dir = args
            .tool_cache_dir
            .clone()
            .unwrap_or_else(default_tool_cache_dir);

        Ok(Self {
            input,
            tool_cache_dir,
        })
    }
}

impl RuntimeConfig {
    pub fn input(&self) -> &PipelineInput {
        &self.input
    }

    pub fn tool_cache_dir(&self) -> &PathBuf {
        &self.tool_cache_dir
    }
}

/// `<user cache dir>/universal-apk-exporter/bundletool`, falling back to the temp dir.
pub fn default_tool_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("universal-apk-exporter")
        .join("bundletool")
}
