//! Java runtime detection.
//!
//! bundletool is distributed as a jar, so a working `java` binary is part of
//! acquiring the tool.

use crate::exporter::error::{Error, Result};
use std::path::PathBuf;

#[cfg(windows)]
const JAVA_BINARY: &str = "java.exe";
#[cfg(not(windows))]
const JAVA_BINARY: &str = "java";

/// Locates a runnable `java`, preferring `$JAVA_HOME/bin` over `PATH`.
pub async fn locate_java() -> Result<PathBuf> {
    let path = match std::env::var_os("JAVA_HOME") {
        Some(home) if PathBuf::from(&home).join("bin").join(JAVA_BINARY).is_file() => {
            PathBuf::from(home).join("bin").join(JAVA_BINARY)
        }
        _ => which::which("java").map_err(|e| {
            Error::GenericError(format!(
                "java not found (JAVA_HOME unset or invalid, not in PATH: {}). \
                 bundletool requires a Java runtime.",
                e
            ))
        })?,
    };
    log::debug!("Found java at: {}", path.display());

    let output = tokio::process::Command::new(&path)
        .arg("-version")
        .output()
        .await
        .map_err(|e| {
            Error::GenericError(format!(
                "java found at {} but failed to execute: {}. Check file permissions.",
                path.display(),
                e
            ))
        })?;

    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool: format!("{} -version", path.display()),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    // java prints its version banner to stderr
    let banner = String::from_utf8_lossy(&output.stderr);
    log::info!("✓ java available: {}", banner.lines().next().unwrap_or("").trim());

    Ok(path)
}
