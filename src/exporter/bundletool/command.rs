//! bundletool `build-apks` execution.

use crate::exporter::{
    builder::LocalKeystore,
    error::{Error, Result},
};
use std::path::Path;

/// Prefix bundletool expects in front of inline passwords.
const PASSWORD_PREFIX: &str = "pass:";

/// Arguments for `java -jar bundletool.jar build-apks` in universal mode.
pub fn build_apks_args(
    jar: &Path,
    bundle: &Path,
    output: &Path,
    keystore: Option<&LocalKeystore<'_>>,
) -> Vec<String> {
    let mut args = vec![
        "-jar".to_string(),
        jar.display().to_string(),
        "build-apks".to_string(),
        "--mode=universal".to_string(),
        format!("--bundle={}", bundle.display()),
        format!("--output={}", output.display()),
    ];

    if let Some(keystore) = keystore {
        let credentials = keystore.credentials();
        args.extend([
            format!("--ks={}", keystore.path().display()),
            format!("--ks-pass={PASSWORD_PREFIX}{}", credentials.store_password()),
            format!("--ks-key-alias={}", credentials.key_alias()),
            format!("--key-pass={PASSWORD_PREFIX}{}", credentials.key_password()),
        ]);
    }

    args
}

/// Copy of `args` safe for logging: inline passwords are masked.
pub fn redact_args(args: &[String]) -> Vec<String> {
    args.iter()
        .map(|arg| match arg.split_once(PASSWORD_PREFIX) {
            Some((flag, _)) if flag.ends_with('=') => format!("{flag}{PASSWORD_PREFIX}***"),
            _ => arg.clone(),
        })
        .collect()
}

/// Runs bundletool and waits for it to finish.
///
/// A non-zero exit is reported as [`Error::ToolFailed`] with the captured
/// stderr. No retry is attempted.
pub async fn run_build_apks(
    java: &Path,
    jar: &Path,
    bundle: &Path,
    output: &Path,
    keystore: Option<&LocalKeystore<'_>>,
) -> Result<()> {
    let args = build_apks_args(jar, bundle, output, keystore);
    log::debug!("Running {} {}", java.display(), redact_args(&args).join(" "));

    let output = tokio::process::Command::new(java)
        .args(&args)
        .output()
        .await
        .map_err(|e| Error::GenericError(format!("Failed to execute bundletool: {}", e)))?;

    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool: "bundletool".to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}
