//! Per-invocation CLI context
//!
//! Built once at startup from the resolved configuration and handed to every
//! command. Nothing downstream reads process environment for configuration.

use crate::config::resolve_cli_home;
use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use camino::Utf8Path;
use std::path::{Path, PathBuf};

/// Explicit configuration for one CLI invocation
#[derive(Debug, Clone)]
pub struct CliContext {
    home_dir: PathBuf,
    cli_home: PathBuf,
    target_path: Option<PathBuf>,
    debug: bool,
    config: RuntimeConfig,
}

impl CliContext {
    /// Create a context for the given home directory
    ///
    /// Fails when the home directory does not exist.
    pub fn new(home_dir: impl Into<PathBuf>, config: RuntimeConfig) -> Result<Self> {
        let home_dir = home_dir.into();
        if !home_dir.is_dir() {
            return Err(Error::home_not_found(home_dir.display().to_string()));
        }

        let cli_home = match Utf8Path::from_path(&home_dir) {
            Some(home) => resolve_cli_home(home, &config.paths.cli_home).into_std_path_buf(),
            None => home_dir.join(&config.paths.cli_home),
        };

        Ok(Self {
            home_dir,
            cli_home,
            target_path: None,
            debug: false,
            config,
        })
    }

    /// Use a locally developed package directory instead of the shared store
    ///
    /// Relative paths are made absolute against the current directory.
    pub fn with_target_path(mut self, target_path: Option<PathBuf>) -> Result<Self> {
        self.target_path = match target_path {
            Some(path) => Some(std::path::absolute(&path)?),
            None => None,
        };
        Ok(self)
    }

    /// Mark the invocation as running in debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The user's home directory
    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Absolute CLI home directory
    pub fn cli_home(&self) -> &Path {
        &self.cli_home
    }

    /// Local package override, if any
    pub fn target_path(&self) -> Option<&Path> {
        self.target_path.as_deref()
    }

    /// Whether debug output was requested
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Resolved runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Mutable access for CLI flag overrides applied after loading
    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    /// Effective registry base URL
    pub fn registry_url(&self) -> String {
        self.config.registry.base_url()
    }

    /// Root for command implementation packages (`<cli home>/dependencies`)
    pub fn dependencies_dir(&self) -> PathBuf {
        self.cli_home.join(&self.config.paths.dependencies_dir)
    }

    /// Store directory for command implementation packages
    pub fn command_store_dir(&self) -> PathBuf {
        self.dependencies_dir().join("node_modules")
    }

    /// Root for project template packages (`<cli home>/template`)
    pub fn template_dir(&self) -> PathBuf {
        self.cli_home.join(&self.config.paths.template_dir)
    }

    /// Store directory for project template packages
    pub fn template_store_dir(&self) -> PathBuf {
        self.template_dir().join("node_modules")
    }
}
