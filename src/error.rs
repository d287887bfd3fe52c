//! Step-level error types.
//!
//! Every fatal condition of a run maps to one [`StepError`] variant, which
//! names the stage that failed. All of them end the process with a
//! non-zero exit code.

use crate::exporter;
use thiserror::Error;

/// Result type alias for step operations
pub type Result<T> = std::result::Result<T, StepError>;

/// Fatal errors of a pipeline run
#[derive(Error, Debug)]
pub enum StepError {
    /// Invalid or missing configuration, detected before any work starts
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// bundletool could not be resolved or downloaded
    #[error(transparent)]
    ToolAcquisition(#[from] ToolAcquisitionError),

    /// A bundle failed to export
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Exports succeeded but the result could not be published
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl StepError {
    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::ToolAcquisition(_) => "tool acquisition",
            Self::Export(_) => "export",
            Self::Publish(_) => "publish",
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Missing required input
    #[error("Missing required input: {argument}")]
    MissingArgument {
        /// Input name
        argument: String,
    },

    /// Input present but unusable
    #[error("Invalid input {argument}: {reason}")]
    InvalidArgument {
        /// Input name
        argument: String,
        /// Reason for the error
        reason: String,
    },
}

/// bundletool acquisition failure
#[derive(Error, Debug)]
#[error("Failed to initialize bundletool {version}: {cause}")]
pub struct ToolAcquisitionError {
    /// Requested version spec
    pub version: String,
    /// Underlying failure
    #[source]
    pub cause: exporter::Error,
}

/// Export failure of a single bundle
#[derive(Error, Debug)]
#[error("Failed to export APK from {bundle_path}: {cause}")]
pub struct ExportError {
    /// Bundle location as given in the input list
    pub bundle_path: String,
    /// Underlying failure
    #[source]
    pub cause: exporter::Error,
}

/// Environment publish failure
#[derive(Error, Debug)]
pub enum PublishError {
    /// The publishing tool is not installed
    #[error("APKs were exported but {key} could not be published: {tool} not found ({reason})")]
    ToolNotFound {
        /// Environment key being published
        key: String,
        /// Tool name
        tool: String,
        /// Lookup failure
        reason: String,
    },

    /// The publishing tool ran but rejected the value
    #[error("APKs were exported but {key} could not be published: {reason}")]
    Rejected {
        /// Environment key being published
        key: String,
        /// Reason for the error
        reason: String,
    },
}
