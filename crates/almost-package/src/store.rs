//! Package store
//!
//! A [`Package`] answers "is this package at this version on disk?", installs
//! it when it is not, and keeps it current against the registry's `latest`
//! dist-tag. The `latest` constraint is resolved lazily, at most once per
//! instance, except for [`Package::update`] which always re-queries.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::resolve_cache_path;
use crate::entry::locate_entry_point;
use crate::error::{Error, Result};
use crate::installer::{InstallRequest, PackageInstaller, PackageRef};
use crate::registry::{RegistryClient, LATEST_TAG};

/// Requested version of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    /// Whatever the registry's `latest` dist-tag points at
    Latest,

    /// A literal version
    Exact(String),
}

impl VersionConstraint {
    /// Parse a version argument, treating `latest` as symbolic
    ///
    /// Anything else must be a literal semantic version; other dist-tags are
    /// rejected since their cache entry cannot be named before resolution.
    pub fn parse(version: &str) -> Result<Self> {
        let version = version.trim();
        if version.is_empty() {
            return Err(Error::invalid_spec("version must not be empty"));
        }
        if version == LATEST_TAG {
            return Ok(Self::Latest);
        }

        check_exact_version(version)?;
        Ok(Self::Exact(version.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Latest => LATEST_TAG,
            Self::Exact(version) => version,
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Require `version` to be a literal semantic version
fn check_exact_version(version: &str) -> Result<()> {
    semver::Version::parse(version).map(|_| ()).map_err(|e| {
        Error::invalid_spec(format!(
            "version '{}' is neither '{}' nor a semantic version: {}",
            version, LATEST_TAG, e
        ))
    })
}

/// Validate a registry package name (`name` or `@scope/name`)
pub fn validate_package_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Err(Error::invalid_spec(format!("package name '{}' {}", name, reason)));

    if name.is_empty() {
        return Err(Error::invalid_spec("package name must not be empty"));
    }
    if name.contains('\\') {
        return invalid("must not contain '\\'");
    }
    if name.starts_with('.') || name.starts_with('_') {
        return invalid("must not start with '.' or '_'");
    }

    let segments: Vec<&str> = name.split('/').collect();
    match segments.as_slice() {
        [single] => {
            if single.starts_with('@') {
                return invalid("has a scope but no package part");
            }
        }
        [scope, package] => {
            if !scope.starts_with('@') {
                return invalid("contains '/' but is not scoped");
            }
            if scope.len() < 2 || package.is_empty() {
                return invalid("has an empty scope or package part");
            }
            if package.starts_with('.') || package.starts_with('_') {
                return invalid("must not start with '.' or '_'");
            }
        }
        _ => return invalid("contains more than one '/'"),
    }

    if segments.iter().any(|segment| *segment == "..") {
        return invalid("must not contain '..' segments");
    }

    Ok(())
}

/// Immutable descriptor of one package to materialize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    name: String,
    version: VersionConstraint,
    target_path: PathBuf,
    store_dir: Option<PathBuf>,
}

impl PackageSpec {
    /// Validate and build a spec
    pub fn new(
        name: impl Into<String>,
        version: &str,
        target_path: impl Into<PathBuf>,
        store_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let name = name.into();
        validate_package_name(&name)?;
        let version = VersionConstraint::parse(version)?;

        Ok(Self {
            name,
            version,
            target_path: target_path.into(),
            store_dir,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &VersionConstraint {
        &self.version
    }

    /// Installer root, and the package directory itself when no store is used
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    pub fn store_dir(&self) -> Option<&Path> {
        self.store_dir.as_deref()
    }
}

/// One named package at one version
pub struct Package {
    spec: PackageSpec,
    resolved_version: Option<String>,
    registry: RegistryClient,
    installer: Arc<dyn PackageInstaller>,
}

impl fmt::Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("spec", &self.spec)
            .field("resolved_version", &self.resolved_version)
            .field("registry", &self.registry.base_url())
            .finish()
    }
}

impl Package {
    /// Create a package; literal versions start out resolved
    pub fn new(
        spec: PackageSpec,
        registry: RegistryClient,
        installer: Arc<dyn PackageInstaller>,
    ) -> Self {
        let resolved_version = match spec.version() {
            VersionConstraint::Latest => None,
            VersionConstraint::Exact(version) => Some(version.clone()),
        };

        Self {
            spec,
            resolved_version,
            registry,
            installer,
        }
    }

    pub fn spec(&self) -> &PackageSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Concrete version, once resolved
    pub fn resolved_version(&self) -> Option<&str> {
        self.resolved_version.as_deref()
    }

    /// Resolve the version constraint, querying the registry at most once
    pub async fn resolve_version(&mut self) -> Result<String> {
        if let Some(version) = &self.resolved_version {
            return Ok(version.clone());
        }

        let latest = self
            .registry
            .get_latest_version(self.name())
            .await?
            .ok_or_else(|| Error::latest_version_unavailable(self.name()))?;

        debug!("Resolved {}@{} to {}", self.name(), LATEST_TAG, latest);
        self.resolved_version = Some(latest.clone());
        Ok(latest)
    }

    /// Whether the package is present on disk
    pub async fn exists(&mut self) -> Result<bool> {
        let path = match self.spec.store_dir.clone() {
            Some(store) => {
                let version = self.resolve_version().await?;
                resolve_cache_path(&store, self.name(), &version)
            }
            None => self.spec.target_path.clone(),
        };

        let exists = tokio::fs::try_exists(&path).await?;
        debug!("{} exists: {}", path.display(), exists);
        Ok(exists)
    }

    /// Install the given version, or the resolved version when `None`
    pub async fn install(&mut self, version: Option<&str>) -> Result<()> {
        let version = match version {
            Some(version) => {
                check_exact_version(version)?;
                version.to_string()
            }
            None => self.resolve_version().await?,
        };

        let request = self.install_request(&version);
        info!("Installing {}@{}", self.name(), version);

        self.installer
            .install_packages(&request)
            .await
            .map_err(|source| Error::InstallError {
                name: self.name().to_string(),
                version,
                source,
            })
    }

    /// Bring the cache up to the registry's latest version
    ///
    /// An existing cache entry for that version is trusted as-is.
    pub async fn update(&mut self) -> Result<()> {
        let Some(store) = self.spec.store_dir.clone() else {
            return Err(Error::store_required(self.name(), "update"));
        };

        let latest = self
            .registry
            .get_latest_version(self.name())
            .await?
            .ok_or_else(|| Error::latest_version_unavailable(self.name()))?;

        let path = resolve_cache_path(&store, self.name(), &latest);
        if tokio::fs::try_exists(&path).await? {
            debug!("{}@{} already cached", self.name(), latest);
        } else {
            self.install(Some(&latest)).await?;
        }

        self.resolved_version = Some(latest);
        Ok(())
    }

    /// Cache entry of the resolved version, `None` without a store
    pub async fn cache_file_path(&mut self) -> Result<Option<PathBuf>> {
        let Some(store) = self.spec.store_dir.clone() else {
            return Ok(None);
        };

        let version = self.resolve_version().await?;
        Ok(Some(resolve_cache_path(&store, self.name(), &version)))
    }

    /// Cache entry of an arbitrary version, `None` without a store
    pub fn specific_cache_file_path(&self, version: &str) -> Option<PathBuf> {
        self.spec
            .store_dir()
            .map(|store| resolve_cache_path(store, self.name(), version))
    }

    /// Entry file of the materialized package
    pub async fn root_file_path(&mut self) -> Result<Option<PathBuf>> {
        let dir = match self.cache_file_path().await? {
            Some(path) => path,
            None => self.spec.target_path.clone(),
        };
        Ok(locate_entry_point(&dir))
    }

    fn install_request(&self, version: &str) -> InstallRequest {
        InstallRequest {
            root: self.spec.target_path.clone(),
            store_dir: self.spec.store_dir.clone(),
            registry: self.registry.base_url().to_string(),
            packages: vec![PackageRef::new(self.name(), version)],
        }
    }
}
