mod common;

use apk_batch_signer::{SettingsBuilder, SignError, SignerError, cli, sign_all};
use common::{FakeSigner, dir_with};
use std::sync::Arc;

#[tokio::test]
async fn signs_only_apk_entries() {
    let dir = dir_with(&["a.apk", "b.apk", "notes.txt"]);
    let signer = Arc::new(FakeSigner::new());

    sign_all(dir.path(), Arc::clone(&signer)).await.unwrap();

    assert_eq!(signer.signed_names(), vec!["a.apk", "b.apk"]);
}

#[tokio::test]
async fn empty_directory_never_calls_signer() {
    let dir = dir_with(&[]);
    let signer = Arc::new(FakeSigner::new());

    let err = sign_all(dir.path(), Arc::clone(&signer)).await.unwrap_err();

    assert!(matches!(err, SignerError::NoCandidates { .. }));
    assert!(err.to_string().contains(&dir.path().display().to_string()));
    assert_eq!(signer.call_count(), 0);
}

#[tokio::test]
async fn directory_without_apks_never_calls_signer() {
    let dir = dir_with(&["readme.md", "app.aab", ".apk"]);
    let signer = Arc::new(FakeSigner::new());

    let err = sign_all(dir.path(), Arc::clone(&signer)).await.unwrap_err();

    assert!(matches!(err, SignerError::NoCandidates { .. }));
    assert_eq!(signer.call_count(), 0);
}

#[tokio::test]
async fn uppercase_extension_is_excluded() {
    let dir = dir_with(&["a.APK", "b.apk"]);
    let signer = Arc::new(FakeSigner::new());

    sign_all(dir.path(), Arc::clone(&signer)).await.unwrap();

    assert_eq!(signer.signed_names(), vec!["b.apk"]);
}

#[tokio::test]
async fn only_uppercase_extension_is_no_candidates() {
    let dir = dir_with(&["a.APK"]);
    let signer = Arc::new(FakeSigner::new());

    let err = sign_all(dir.path(), Arc::clone(&signer)).await.unwrap_err();

    assert!(matches!(err, SignerError::NoCandidates { .. }));
    assert_eq!(signer.call_count(), 0);
}

#[tokio::test]
async fn missing_directory_is_an_access_error() {
    let dir = dir_with(&[]);
    let missing = dir.path().join("apks");

    let err = sign_all(&missing, Arc::new(FakeSigner::new())).await.unwrap_err();

    assert!(matches!(err, SignerError::DirectoryAccess { .. }));
}

#[tokio::test]
async fn one_failure_fails_the_batch_after_all_calls() {
    let dir = dir_with(&["a.apk", "b.apk", "c.apk"]);
    let signer = Arc::new(FakeSigner::failing_on(&["b.apk"]));

    let err = sign_all(dir.path(), Arc::clone(&signer)).await.unwrap_err();

    assert_eq!(signer.signed_names(), vec!["a.apk", "b.apk", "c.apk"]);
    match err {
        SignerError::SigningFailure { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].path, dir.path().join("b.apk"));
            assert!(matches!(failures[0].error, SignError::Failed { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn every_failure_is_reported() {
    let dir = dir_with(&["a.apk", "b.apk", "c.apk"]);
    let signer = Arc::new(FakeSigner::failing_on(&["a.apk", "c.apk"]));

    let err = sign_all(dir.path(), signer).await.unwrap_err();

    match err {
        SignerError::SigningFailure { failures } => {
            let mut failed: Vec<_> = failures.into_iter().map(|f| f.path).collect();
            failed.sort();
            assert_eq!(failed, vec![dir.path().join("a.apk"), dir.path().join("c.apk")]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn repeated_runs_have_the_same_outcome() {
    let dir = dir_with(&["a.apk", "b.apk"]);
    let signer = Arc::new(FakeSigner::new());

    sign_all(dir.path(), Arc::clone(&signer)).await.unwrap();
    sign_all(dir.path(), Arc::clone(&signer)).await.unwrap();
    assert_eq!(signer.call_count(), 4);

    let failing = Arc::new(FakeSigner::failing_on(&["a.apk"]));
    assert!(sign_all(dir.path(), Arc::clone(&failing)).await.is_err());
    assert!(sign_all(dir.path(), Arc::clone(&failing)).await.is_err());
}

#[tokio::test]
async fn many_files_are_each_signed_once() {
    let names: Vec<String> = (0..64).map(|i| format!("app-{i:02}.apk")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let dir = dir_with(&refs);
    let signer = Arc::new(FakeSigner::new());

    sign_all(dir.path(), Arc::clone(&signer)).await.unwrap();

    assert_eq!(signer.signed_names(), names);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn task_entry_point_signs_settings_directory() {
    let root = dir_with(&[]);
    std::fs::create_dir(root.path().join("apks")).unwrap();
    std::fs::write(root.path().join("apks").join("server.apk"), b"server").unwrap();
    std::fs::write(root.path().join("apks").join("test.apk"), b"test").unwrap();
    let settings = SettingsBuilder::new().root(root.path()).build().unwrap();
    let signer = Arc::new(FakeSigner::new());

    let artifacts = cli::sign_with(&settings, Arc::clone(&signer)).await.unwrap();

    assert_eq!(signer.signed_names(), vec!["server.apk", "test.apk"]);
    let mut sizes: Vec<_> = artifacts.iter().map(|a| a.size).collect();
    sizes.sort();
    assert_eq!(sizes, vec![4, 6]);
}
