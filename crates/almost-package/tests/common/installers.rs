//! Test doubles for [`PackageInstaller`]

use almost_package::cache::resolve_cache_path;
use almost_package::{InstallRequest, PackageInstaller};
use async_trait::async_trait;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Records every request and creates the directory a real install would
#[derive(Default)]
pub struct RecordingInstaller {
    calls: AtomicUsize,
    requests: Mutex<Vec<InstallRequest>>,
    fail: bool,
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// An installer whose every call fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<InstallRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PackageInstaller for RecordingInstaller {
    async fn install_packages(&self, request: &InstallRequest) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if self.fail {
            anyhow::bail!("simulated installer failure");
        }

        for package in &request.packages {
            let dir = match &request.store_dir {
                Some(store) => resolve_cache_path(store, &package.name, &package.version),
                None => request.root.join("node_modules").join(&package.name),
            };
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
