//! Universal APK export step library
//!
//! This library provides the core of a CI pipeline step that converts
//! Android App Bundles into universal APKs:
//! - Parsing loosely formatted bundle path lists
//! - Resolving and caching the bundletool jar
//! - Exporting each bundle, optionally signed with a keystore
//! - Publishing the produced APK paths to the pipeline environment
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod exporter;
pub mod pipeline;
pub mod source;

// Re-export commonly used types
pub use error::{ConfigError, ExportError, PublishError, Result, StepError, ToolAcquisitionError};
