//! Command line pre-flight behaviour

use assert_cmd::Command;
use predicates::prelude::*;
use universal_apk_exporter::cli::{Args, RuntimeConfig};
use universal_apk_exporter::exporter::{SigningConfig, VersionSpec};
use universal_apk_exporter::pipeline::DEFAULT_OUTPUT_KEY;
use clap::Parser;

const STEP_ENV: [&str; 10] = [
    "BITRISE_DEPLOY_DIR",
    "aab_path_list",
    "keystore_url",
    "keystore_password",
    "keystore_alias",
    "private_key_password",
    "bundletool_version",
    "BUNDLETOOL_CACHE_DIR",
    "APK_PATH_LIST_KEY",
    "RUST_LOG",
];

fn step() -> Command {
    let mut cmd = Command::cargo_bin("export-universal-apk").unwrap();
    for key in STEP_ENV {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_missing_deploy_dir_is_a_config_error() {
    step()
        .args(["--aab-path-list", "app.aab"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing required input: deploy_dir"));
}

#[test]
fn test_missing_bundle_list_is_a_config_error() {
    let temp = tempfile::tempdir().unwrap();
    step()
        .env("BITRISE_DEPLOY_DIR", temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing required input: aab_path_list"));
}

#[test]
fn test_separator_only_bundle_list_is_a_config_error() {
    let temp = tempfile::tempdir().unwrap();
    step()
        .env("BITRISE_DEPLOY_DIR", temp.path())
        .env("aab_path_list", "|||")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no bundle paths found"));
}

#[test]
fn test_help_lists_step_inputs() {
    step()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--aab-path-list"))
        .stdout(predicate::str::contains("--bundletool-version"));
}

#[test]
fn test_runtime_config_from_flags() {
    let args = Args::try_parse_from([
        "export-universal-apk",
        "--deploy-dir",
        " /deploy ",
        "--aab-path-list",
        "a.aab\\nb.aab",
        "--keystore-url",
        "https://example.com/release.jks",
        "--keystore-password",
        "store",
        "--keystore-alias",
        "upload",
        "--private-key-password",
        "",
        "--bundletool-version",
        "1.17.2",
        "--tool-cache-dir",
        "/cache",
        "--output-key",
        DEFAULT_OUTPUT_KEY,
    ])
    .unwrap();

    let config = RuntimeConfig::try_from(&args).unwrap();
    let input = config.input();

    assert_eq!(input.bundles, vec!["a.aab", "b.aab"]);
    assert_eq!(input.deploy_dir, std::path::PathBuf::from("/deploy"));
    // key password left empty
    assert_eq!(input.signing, SigningConfig::Unsigned);
    assert_eq!(input.tool_version, VersionSpec::Exact("1.17.2".to_string()));
    assert_eq!(config.tool_cache_dir(), &std::path::PathBuf::from("/cache"));
}
