//! Per-bundle export against a fake packaging tool

mod common;

use common::*;
use universal_apk_exporter::exporter::{Error, Exporter, SigningConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_unsigned_export_writes_apk_named_after_bundle() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path().join("work");
    std::fs::create_dir(&work).unwrap();
    let deploy = temp.path().join("deploy");
    let bundle = create_bundle(temp.path(), "app-release.aab");

    let tool = FakeTool::new();
    let exporter = Exporter::new(tool.clone(), fetcher(temp.path())).with_temp_root(&work);

    let apk = exporter
        .export_universal_apk(&bundle, &deploy, &SigningConfig::Unsigned)
        .await
        .unwrap();

    assert_eq!(apk.path, deploy.join("app-release.apk"));
    assert_eq!(apk.bundle, bundle);
    assert_eq!(std::fs::read(&apk.path).unwrap(), b"apk:app-release.aab");
    assert_eq!(apk.size, b"apk:app-release.aab".len() as u64);
    assert_eq!(apk.checksum.len(), 64);

    let calls = tool.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].keystore, None);

    // working directory is gone
    assert_eq!(entry_count(&work), 0);
}

#[tokio::test]
async fn test_signed_export_passes_local_keystore() {
    let temp = tempfile::tempdir().unwrap();
    let deploy = temp.path().join("deploy");
    let bundle = create_bundle(temp.path(), "app.aab");
    let keystore_path = temp.path().join("release.jks");
    std::fs::write(&keystore_path, b"keystore").unwrap();

    let location = format!("  {}  ", keystore_path.display());
    let signing = SigningConfig::from_fields(&location, "store", "upload", "key");

    let tool = FakeTool::new();
    let exporter = Exporter::new(tool.clone(), fetcher(temp.path()));
    exporter
        .export_universal_apk(&bundle, &deploy, &signing)
        .await
        .unwrap();

    let calls = tool.calls();
    assert_eq!(calls[0].keystore.as_deref(), Some(keystore_path.as_path()));
    assert_eq!(calls[0].key_alias.as_deref(), Some("upload"));
}

#[tokio::test]
async fn test_remote_keystore_and_bundle_are_downloaded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifacts/remote.aab"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"aab".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/secrets/upload.jks"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"keystore".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let work = temp.path().join("work");
    std::fs::create_dir(&work).unwrap();
    let deploy = temp.path().join("deploy");

    let signing = SigningConfig::from_fields(
        &format!("{}/secrets/upload.jks", server.uri()),
        "store",
        "upload",
        "key",
    );

    let tool = FakeTool::new();
    let exporter = Exporter::new(tool.clone(), fetcher(temp.path())).with_temp_root(&work);
    let apk = exporter
        .export_universal_apk(&format!("{}/artifacts/remote.aab", server.uri()), &deploy, &signing)
        .await
        .unwrap();

    assert_eq!(apk.path, deploy.join("remote.apk"));
    let calls = tool.calls();
    assert!(calls[0].bundle.ends_with("remote.aab"));
    assert!(calls[0].keystore.as_ref().unwrap().ends_with("upload.jks"));

    // downloads lived in the working directory only
    assert_eq!(entry_count(&work), 0);
}

#[tokio::test]
async fn test_file_url_bundle_is_read_locally() {
    let temp = tempfile::tempdir().unwrap();
    let deploy = temp.path().join("deploy");
    let bundle = create_bundle(temp.path(), "wear.aab");
    let url = url::Url::from_file_path(&bundle).unwrap();

    let exporter = Exporter::new(FakeTool::new(), fetcher(temp.path()));
    let apk = exporter
        .export_universal_apk(url.as_str(), &deploy, &SigningConfig::Unsigned)
        .await
        .unwrap();

    assert_eq!(apk.path, deploy.join("wear.apk"));
}

#[tokio::test]
async fn test_missing_universal_variant_fails_and_cleans_up() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path().join("work");
    std::fs::create_dir(&work).unwrap();
    let deploy = temp.path().join("deploy");
    let bundle = create_bundle(temp.path(), "app.aab");

    let exporter =
        Exporter::new(FakeTool::without_universal(), fetcher(temp.path())).with_temp_root(&work);
    let result = exporter
        .export_universal_apk(&bundle, &deploy, &SigningConfig::Unsigned)
        .await;

    assert!(matches!(result, Err(Error::MissingUniversalApk(_))));
    assert!(!deploy.join("app.apk").exists());
    assert_eq!(entry_count(&work), 0);
}

#[tokio::test]
async fn test_tool_failure_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    let work = temp.path().join("work");
    std::fs::create_dir(&work).unwrap();
    let bundle = create_bundle(temp.path(), "broken.aab");

    let exporter =
        Exporter::new(FakeTool::failing_on("broken.aab"), fetcher(temp.path())).with_temp_root(&work);
    let error = exporter
        .export_universal_apk(&bundle, &temp.path().join("deploy"), &SigningConfig::Unsigned)
        .await
        .unwrap_err();

    match error {
        Error::ToolFailed { code, stderr, .. } => {
            assert_eq!(code, Some(1));
            assert!(stderr.contains("broken.aab"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(entry_count(&work), 0);
}

#[tokio::test]
async fn test_missing_bundle_file_fails_before_tool_runs() {
    let temp = tempfile::tempdir().unwrap();
    let tool = FakeTool::new();
    let exporter = Exporter::new(tool.clone(), fetcher(temp.path()));

    let missing = temp.path().join("missing.aab").display().to_string();
    let result = exporter
        .export_universal_apk(&missing, &temp.path().join("deploy"), &SigningConfig::Unsigned)
        .await;

    assert!(matches!(result, Err(Error::Fs { .. })));
    assert!(tool.calls().is_empty());
}
