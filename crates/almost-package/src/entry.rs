//! Entry point location
//!
//! Finds the nearest `package.json` at or above a directory and resolves the
//! file its `main` field points at.

use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// File name of a package manifest
pub const MANIFEST_FILE: &str = "package.json";

/// The fields of `package.json` this crate reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    /// Entry file relative to the manifest's directory
    #[serde(default)]
    pub main: Option<String>,
}

/// Nearest directory at or above `path` that contains a manifest
///
/// Relative paths are made absolute against the current directory first.
pub fn find_package_dir(path: &Path) -> Option<PathBuf> {
    let path = match std::path::absolute(path) {
        Ok(path) => normalize_path(&path),
        Err(e) => {
            warn!("Failed to make {} absolute: {}", path.display(), e);
            return None;
        }
    };

    path.ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Read and parse the manifest in `dir`
///
/// Unreadable or invalid manifests are logged and reported as `None`.
pub fn read_manifest(dir: &Path) -> Option<PackageManifest> {
    let manifest_path = dir.join(MANIFEST_FILE);

    let content = match fs::read_to_string(&manifest_path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {}: {}", manifest_path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            warn!("Invalid manifest {}: {}", manifest_path.display(), e);
            None
        }
    }
}

/// Resolve the entry file of the package containing `path`
pub fn locate_entry_point(path: &Path) -> Option<PathBuf> {
    let Some(dir) = find_package_dir(path) else {
        debug!("No {} found at or above {}", MANIFEST_FILE, path.display());
        return None;
    };

    let main = read_manifest(&dir)?.main.filter(|main| !main.is_empty())?;
    let entry = normalize_path(&dir.join(main));
    debug!("Entry point for {}: {}", dir.display(), entry.display());
    Some(entry)
}

/// Fold `.` and `..` components without touching the filesystem
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
