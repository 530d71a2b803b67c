//! Recursive template copy

use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Copy every file and directory under `source` into `destination`
///
/// Existing files in `destination` are overwritten. Symbolic links are
/// followed and their targets copied.
pub fn copy_template(source: &Path, destination: &Path) -> Result<u64> {
    if !source.is_dir() {
        return Err(Error::TemplateDirMissing {
            path: source.display().to_string(),
        });
    }

    fs::create_dir_all(destination)?;
    let mut copied = 0;

    for entry in WalkDir::new(source).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    debug!(
        "Copied {} files from {} to {}",
        copied,
        source.display(),
        destination.display()
    );
    Ok(copied)
}
