#![allow(dead_code)]

use apk_batch_signer::{ApkSigner, SignError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Fake signer that records every call and fails for chosen file names.
#[derive(Default)]
pub struct FakeSigner {
    calls: Mutex<Vec<PathBuf>>,
    failing: HashSet<String>,
}

impl FakeSigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// File names the signer was called with, sorted.
    pub fn signed_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ApkSigner for FakeSigner {
    async fn sign(&self, apk: &Path) -> Result<(), SignError> {
        self.calls.lock().unwrap().push(apk.to_path_buf());
        tokio::task::yield_now().await;

        let name = apk.file_name().unwrap().to_string_lossy().into_owned();
        if self.failing.contains(&name) {
            return Err(SignError::Failed {
                command: format!("fake sign {}", apk.display()),
                code: Some(1),
                stderr: "rejected".to_string(),
            });
        }
        Ok(())
    }
}

/// Creates a temporary directory holding the given files.
pub fn dir_with(names: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in names {
        std::fs::write(dir.path().join(name), name.as_bytes()).unwrap();
    }
    dir
}
