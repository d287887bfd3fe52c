//! Export orchestration and coordination.
//!
//! This module provides the [`Exporter`] that coordinates a single
//! bundle-to-APK export, plus the pieces it is assembled from.
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for exported APKs
//! - [`orchestrator`] - Main [`Exporter`] struct and export flow
//! - [`signing`] - Keystore configuration ([`SigningConfig`])
//! - [`tool_detection`] - Java runtime detection

mod checksum;
mod orchestrator;
mod signing;
mod tool_detection;

pub use checksum::calculate_sha256;
pub use orchestrator::{Exporter, apk_file_name};
pub use signing::{KeystoreConfig, LocalKeystore, SigningConfig};
pub use tool_detection::locate_java;

use std::path::PathBuf;

/// A universal APK produced from one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedApk {
    /// Bundle location as given in the input list.
    pub bundle: String,
    /// Path of the APK in the deploy directory.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256 of the APK.
    pub checksum: String,
}
