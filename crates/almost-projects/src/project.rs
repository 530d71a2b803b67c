//! Project information and target directory handling

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::{Error, Result};

/// Version given to new projects unless another is requested
pub const DEFAULT_PROJECT_VERSION: &str = "1.0.0";

static PROJECT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]+([-_][a-zA-Z][a-zA-Z0-9]*|[a-zA-Z0-9])*$")
        .expect("project name regex is valid")
});

/// Name and version of the project being created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    pub version: String,
}

impl ProjectInfo {
    /// Validate both fields
    pub fn new(name: impl Into<String>, version: &str) -> Result<Self> {
        let name = name.into();
        if !is_valid_project_name(&name) {
            return Err(Error::invalid_project_name(name));
        }

        Ok(Self {
            name,
            version: parse_project_version(version)?,
        })
    }
}

/// Whether `name` is usable as a project (and package) name
///
/// Names start with a letter; `-` and `_` may only separate letter-led runs.
pub fn is_valid_project_name(name: &str) -> bool {
    PROJECT_NAME_RE.is_match(name)
}

/// Parse a semantic version, returning its canonical form
///
/// A leading `v` is accepted and dropped.
pub fn parse_project_version(version: &str) -> Result<String> {
    let trimmed = version.trim();
    let candidate = trimmed.strip_prefix('v').unwrap_or(trimmed);
    semver::Version::parse(candidate)
        .map(|v| v.to_string())
        .map_err(|_| Error::invalid_version(version))
}

/// State of the directory a project is created in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Missing,
    Empty,
    NonEmpty,
}

/// Inspect the target directory
pub fn inspect_target_dir(path: &Path) -> Result<TargetState> {
    if !path.exists() {
        return Ok(TargetState::Missing);
    }

    let mut entries = fs::read_dir(path)?;
    Ok(if entries.next().is_some() {
        TargetState::NonEmpty
    } else {
        TargetState::Empty
    })
}

/// Check the target directory can receive a new project
///
/// A non-empty directory is an error unless `force` is set; the caller is
/// responsible for confirming and calling [`clear_dir`] in that case.
pub fn prepare_target_dir(path: &Path, force: bool) -> Result<TargetState> {
    let state = inspect_target_dir(path)?;
    debug!("Target directory {} is {:?}", path.display(), state);

    if state == TargetState::NonEmpty && !force {
        return Err(Error::project_exists(path.display().to_string()));
    }
    Ok(state)
}

/// Remove every entry inside `path`, keeping the directory itself
pub fn clear_dir(path: &Path) -> Result<()> {
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&entry_path)?;
        } else {
            fs::remove_file(&entry_path)?;
        }
    }
    Ok(())
}
