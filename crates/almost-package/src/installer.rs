//! Package installation
//!
//! [`PackageInstaller`] is the "fetch and unpack a named package at a version"
//! primitive the package store delegates to. [`TarballInstaller`] is the
//! production implementation:
//! - resolves the version document through the registry
//! - streams the tarball with an optional progress bar
//! - verifies the `sha512` integrity digest when the registry publishes one
//! - extracts into a temporary sibling directory and renames it into place

use almost_core::types::NetworkConfig;
use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use flate2::read::GzDecoder;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha512};
use std::fs;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tar::Archive;
use tracing::{debug, info, warn};

use crate::cache::{resolve_cache_path, MODULES_DIR};
use crate::error::{Error, Result};
use crate::registry::RegistryClient;

/// One package to install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    pub name: String,

    /// Concrete version or dist-tag
    pub version: String,
}

impl PackageRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Arguments of a single installer invocation
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Directory whose `node_modules` receives the packages
    pub root: PathBuf,

    /// Shared content-addressed store, if any
    pub store_dir: Option<PathBuf>,

    /// Registry base URL
    pub registry: String,

    pub packages: Vec<PackageRef>,
}

/// Fetches and unpacks packages
#[async_trait]
pub trait PackageInstaller: Send + Sync {
    /// Install every package of the request, failing on the first error
    async fn install_packages(&self, request: &InstallRequest) -> anyhow::Result<()>;
}

/// Installs packages from registry tarballs
pub struct TarballInstaller {
    client: reqwest::Client,
    show_progress: bool,
}

impl TarballInstaller {
    /// Create an installer using the configured download timeout and user agent
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .timeout(Duration::from_secs(network.download_timeout_secs))
            .build()
            .map_err(|e| Error::download("", format!("failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client))
    }

    /// Create an installer around an existing HTTP client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            show_progress: false,
        }
    }

    /// Enable or disable the download progress bar
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Install one package and return the directory it was extracted to
    pub async fn install_package(
        &self,
        request: &InstallRequest,
        package: &PackageRef,
    ) -> Result<PathBuf> {
        let registry = RegistryClient::with_client(&request.registry, self.client.clone());
        let manifest = registry
            .get_version_manifest(&package.name, &package.version)
            .await?;
        let version = manifest.version;

        let destination = match &request.store_dir {
            Some(store) => resolve_cache_path(store, &package.name, &version),
            None => module_dir(&request.root, &package.name),
        };

        info!("Installing {}@{}", package.name, version);
        let data = self.download(&manifest.dist.tarball, &package.name).await?;
        verify_integrity(
            &package.name,
            &version,
            &data,
            manifest.dist.integrity.as_deref(),
        )?;

        let target = destination.clone();
        tokio::task::spawn_blocking(move || extract_package(&data, &target))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;

        if request.store_dir.is_some() {
            link_into_root(&request.root, &package.name, &destination)?;
        }

        debug!("Installed {}@{} to {}", package.name, version, destination.display());
        Ok(destination)
    }

    async fn download(&self, url: &str, label: &str) -> Result<Bytes> {
        debug!("Downloading tarball: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::download(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::download(url, format!("HTTP {}", status)));
        }

        let progress = self
            .show_progress
            .then(|| download_progress_bar(response.content_length(), label));

        let mut data = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::download(url, e.to_string()))?;
            data.extend_from_slice(&chunk);
            if let Some(pb) = &progress {
                pb.set_position(data.len() as u64);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(Bytes::from(data))
    }
}

#[async_trait]
impl PackageInstaller for TarballInstaller {
    async fn install_packages(&self, request: &InstallRequest) -> anyhow::Result<()> {
        for package in &request.packages {
            self.install_package(request, package).await?;
        }
        Ok(())
    }
}

fn download_progress_bar(total: Option<u64>, label: &str) -> ProgressBar {
    let pb = match total {
        Some(len) => ProgressBar::new(len),
        None => ProgressBar::new_spinner(),
    };
    let style = ProgressStyle::default_bar()
        .template("{msg} [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(format!("Downloading {}", label));
    pb
}

/// `root/node_modules/<name>`
fn module_dir(root: &Path, name: &str) -> PathBuf {
    let mut dir = root.join(MODULES_DIR);
    for segment in name.split('/') {
        dir.push(segment);
    }
    dir
}

/// Check `data` against a subresource integrity string
///
/// Only `sha512` digests are checked. A missing or unsupported digest is
/// logged and accepted.
pub fn verify_integrity(
    name: &str,
    version: &str,
    data: &[u8],
    integrity: Option<&str>,
) -> Result<()> {
    let expected = integrity.and_then(|value| {
        value
            .split_whitespace()
            .find_map(|hash| hash.strip_prefix("sha512-"))
    });

    let Some(expected) = expected else {
        warn!(
            "No sha512 integrity published for {}@{}, skipping verification",
            name, version
        );
        return Ok(());
    };

    let actual = base64::engine::general_purpose::STANDARD.encode(Sha512::digest(data));
    if actual != expected {
        return Err(Error::IntegrityMismatch {
            name: name.to_string(),
            version: version.to_string(),
            expected: format!("sha512-{}", expected),
            actual: format!("sha512-{}", actual),
        });
    }

    debug!("Integrity verified for {}@{}", name, version);
    Ok(())
}

/// Extract a gzipped package tarball into `destination`
///
/// The leading directory of every entry (conventionally `package/`) is
/// stripped. The archive is unpacked into a temporary sibling first and then
/// renamed over `destination`, so `destination` is either absent or complete.
pub fn extract_package(data: &[u8], destination: &Path) -> Result<()> {
    let parent = destination
        .parent()
        .ok_or_else(|| Error::Io(std::io::Error::other("destination has no parent")))?;
    fs::create_dir_all(parent)?;

    let staging = tempfile::Builder::new()
        .prefix(".almost-extract-")
        .tempdir_in(parent)?;

    let mut archive = Archive::new(GzDecoder::new(Cursor::new(data)));
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();

        let entry_type = entry.header().entry_type();
        if entry_type.is_symlink() || entry_type.is_hard_link() {
            return Err(invalid_entry(format!(
                "archive entry is a link: {}",
                path.display()
            )));
        }
        if !(entry_type.is_file() || entry_type.is_dir()) {
            debug!("Skipping {:?} entry {}", entry_type, path.display());
            continue;
        }

        let relative: PathBuf = path.components().skip(1).collect();
        if relative.as_os_str().is_empty() {
            continue;
        }
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(invalid_entry(format!(
                "archive entry escapes package root: {}",
                path.display()
            )));
        }

        let target = staging.path().join(&relative);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir)?;
        }
        entry.unpack(&target)?;
    }

    if destination.exists() {
        fs::remove_dir_all(destination)?;
    }
    fs::rename(staging.path(), destination)?;
    Ok(())
}

fn invalid_entry(message: String) -> Error {
    Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

/// Point `root/node_modules/<name>` at the store entry
#[cfg(unix)]
fn link_into_root(root: &Path, name: &str, cache_path: &Path) -> Result<()> {
    let link = module_dir(root, name);
    if link == cache_path {
        return Ok(());
    }

    if let Some(dir) = link.parent() {
        fs::create_dir_all(dir)?;
    }

    if let Ok(meta) = fs::symlink_metadata(&link) {
        if meta.is_dir() {
            fs::remove_dir_all(&link)?;
        } else {
            fs::remove_file(&link)?;
        }
    }

    std::os::unix::fs::symlink(cache_path, &link)?;
    Ok(())
}

#[cfg(not(unix))]
fn link_into_root(_root: &Path, _name: &str, _cache_path: &Path) -> Result<()> {
    Ok(())
}
