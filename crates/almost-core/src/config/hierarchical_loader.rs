//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Config file (<cli home>/config.yaml)
//! 3. Environment variables (ALMOST_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

/// Name of the user configuration file inside the CLI home
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default CLI home, relative to the user's home directory
pub const DEFAULT_CLI_HOME: &str = ".almost-cli";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files (the CLI home)
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a loader rooted at the CLI home of the current user
    pub fn new() -> Result<Self> {
        let home = crate::utils::get_home_dir()?;
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|p| Error::invalid_config(format!("Home directory is not UTF-8: {:?}", p)))?;

        let cli_home = env::var("ALMOST_CLI_HOME").unwrap_or_else(|_| DEFAULT_CLI_HOME.to_string());
        let config_dir = resolve_cli_home(&home, &cli_home);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig> {
        let mut config = Self::load_embedded_config::<RuntimeConfig>("runtime-defaults.yaml")?;

        let config_path = self.config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            debug!("Loading config file: {}", config_path);
            let file_config = self.load_yaml_file::<RuntimeConfig>(&config_path)?;
            config = Self::merge_runtime_config(config, file_config);
        }

        config = self.apply_env_overrides(config)?;

        Ok(config)
    }

    /// Load an embedded configuration file
    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Load a YAML file and parse it
    fn load_yaml_file<T: DeserializeOwned>(&self, path: &Utf8Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Merge two runtime configs (base is overridden by overlay)
    fn merge_runtime_config(base: RuntimeConfig, overlay: RuntimeConfig) -> RuntimeConfig {
        let mut commands = base.commands;
        commands.extend(overlay.commands);

        let mut templates = overlay.templates;
        if templates.entries.is_empty() {
            templates.entries = base.templates.entries;
        }

        RuntimeConfig {
            network: overlay.network,
            registry: overlay.registry,
            paths: overlay.paths,
            runtime: overlay.runtime,
            commands,
            templates,
            update_check: overlay.update_check,
            display: overlay.display,
        }
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(&self, mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("ALMOST_CLI_HOME") {
            config.paths.cli_home = val;
        }

        if let Ok(val) = env::var("ALMOST_REGISTRY") {
            config
                .registry
                .apply_override(&val)
                .map_err(|e| Error::invalid_config(format!("ALMOST_REGISTRY: {}", e)))?;
        }

        if let Ok(val) = env::var("ALMOST_HTTP_TIMEOUT_SECS") {
            config.network.http_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("ALMOST_HTTP_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("ALMOST_DOWNLOAD_TIMEOUT_SECS") {
            config.network.download_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("ALMOST_DOWNLOAD_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("ALMOST_NODE_BINARY") {
            config.runtime.node_binary = val;
        }

        if let Ok(val) = env::var("ALMOST_NO_UPDATE_CHECK") {
            config.update_check.enabled = !parse_flag(&val);
        }

        if let Ok(val) = env::var("ALMOST_NO_COLOR") {
            config.display.color_enabled = !parse_flag(&val);
        }

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

/// Resolve the CLI home against the user's home directory
///
/// Relative values are joined onto `home`, absolute values are used as-is.
pub fn resolve_cli_home(home: &Utf8Path, cli_home: &str) -> Utf8PathBuf {
    let cli_home = Utf8Path::new(cli_home);
    if cli_home.is_absolute() {
        cli_home.to_path_buf()
    } else {
        home.join(cli_home)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegistryPreset;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_temp_loader() -> (HierarchicalConfigLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        let loader = HierarchicalConfigLoader::with_dir(config_dir);
        (loader, temp_dir)
    }

    #[test]
    #[serial]
    fn test_load_runtime_config_defaults() {
        let (loader, _temp) = create_temp_loader();
        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.network.http_timeout_secs, 30);
        assert_eq!(config.registry.preset, RegistryPreset::Mirror);
        assert_eq!(config.paths.dependencies_dir, "dependencies");
        assert_eq!(config.runtime.node_binary, "node");
        assert!(!config.templates.entries.is_empty());
        assert!(config.network.user_agent.starts_with("almost/"));
    }

    #[test]
    #[serial]
    fn test_load_runtime_config_from_file() {
        let (loader, _temp) = create_temp_loader();

        let config_content = r#"
registry:
  preset: npm
commands:
  init:
    package: "@almost-cli/init"
update-check:
  enabled: false
"#;
        let config_path = loader.config_dir().join(CONFIG_FILE_NAME);
        fs::write(&config_path, config_content).unwrap();

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.registry.preset, RegistryPreset::Npm);
        assert_eq!(config.registry.base_url(), "https://registry.npmjs.org");
        assert_eq!(config.commands["init"].package, "@almost-cli/init");
        assert_eq!(config.commands["init"].version, "latest");
        assert!(!config.update_check.enabled);
        // Entries fall back to the embedded catalog when the file has none
        assert!(!config.templates.entries.is_empty());
    }

    #[test]
    #[serial]
    fn test_invalid_config_file() {
        let (loader, _temp) = create_temp_loader();
        let config_path = loader.config_dir().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "registry: [unclosed").unwrap();

        let result = loader.load_runtime_config();
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("ALMOST_REGISTRY", "http://localhost:4873");
        env::set_var("ALMOST_HTTP_TIMEOUT_SECS", "5");
        env::set_var("ALMOST_NODE_BINARY", "/usr/local/bin/node");
        env::set_var("ALMOST_NO_UPDATE_CHECK", "1");

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.registry.base_url(), "http://localhost:4873");
        assert_eq!(config.network.http_timeout_secs, 5);
        assert_eq!(config.runtime.node_binary, "/usr/local/bin/node");
        assert!(!config.update_check.enabled);

        env::remove_var("ALMOST_REGISTRY");
        env::remove_var("ALMOST_HTTP_TIMEOUT_SECS");
        env::remove_var("ALMOST_NODE_BINARY");
        env::remove_var("ALMOST_NO_UPDATE_CHECK");
    }

    #[test]
    #[serial]
    fn test_env_override_rejects_bad_number() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("ALMOST_HTTP_TIMEOUT_SECS", "soon");
        let result = loader.load_runtime_config();
        env::remove_var("ALMOST_HTTP_TIMEOUT_SECS");

        assert!(result.is_err());
    }

    #[test]
    fn test_merge_runtime_config_commands() {
        let mut base = RuntimeConfig::default();
        base.commands.insert(
            "init".to_string(),
            crate::types::CommandPackage {
                package: "@almost-cli/init".to_string(),
                version: "latest".to_string(),
            },
        );
        let mut overlay = RuntimeConfig::default();
        overlay.commands.insert(
            "publish".to_string(),
            crate::types::CommandPackage {
                package: "@almost-cli/publish".to_string(),
                version: "1.0.0".to_string(),
            },
        );

        let merged = HierarchicalConfigLoader::merge_runtime_config(base, overlay);
        assert_eq!(merged.commands.len(), 2);
    }

    #[test]
    fn test_resolve_cli_home() {
        let home = Utf8Path::new("/home/dev");
        assert_eq!(
            resolve_cli_home(home, ".almost-cli"),
            Utf8PathBuf::from("/home/dev/.almost-cli")
        );
        assert_eq!(
            resolve_cli_home(home, "/opt/almost"),
            Utf8PathBuf::from("/opt/almost")
        );
    }
}
