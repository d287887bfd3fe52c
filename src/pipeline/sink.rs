//! Environment sink for publishing step outputs.

use crate::error::PublishError;
use async_trait::async_trait;

/// Key/value sink the pipeline publishes its result to.
#[async_trait]
pub trait EnvSink: Send + Sync {
    async fn set_env(&self, key: &str, value: &str) -> Result<(), PublishError>;
}

/// Publishes through `envman add`, the CI step environment manager.
#[derive(Debug, Clone)]
pub struct EnvmanSink {
    program: String,
}

impl EnvmanSink {
    pub fn new() -> Self {
        Self {
            program: "envman".to_string(),
        }
    }

    /// Uses `program` instead of the `envman` found on `PATH`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for EnvmanSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnvSink for EnvmanSink {
    async fn set_env(&self, key: &str, value: &str) -> Result<(), PublishError> {
        let program = which::which(&self.program).map_err(|e| PublishError::ToolNotFound {
            key: key.to_string(),
            tool: self.program.clone(),
            reason: e.to_string(),
        })?;

        let output = tokio::process::Command::new(&program)
            .args(["add", "--key", key, "--value", value])
            .output()
            .await
            .map_err(|e| PublishError::Rejected {
                key: key.to_string(),
                reason: format!("failed to execute {}: {}", program.display(), e),
            })?;

        if !output.status.success() {
            return Err(PublishError::Rejected {
                key: key.to_string(),
                reason: format!(
                    "{} exited with {:?}: {}",
                    self.program,
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        log::debug!("Exported {key} to the environment");
        Ok(())
    }
}
