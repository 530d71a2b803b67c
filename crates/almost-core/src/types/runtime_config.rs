//! Runtime configuration types for operational parameters
//!
//! These types define configuration that controls runtime behavior like
//! network timeouts, the package registry, cache locations, and which
//! packages implement external sub-commands.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Package registry selection
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Local directory layout under the CLI home
    #[serde(default)]
    pub paths: PathsConfig,

    /// Runtime used to execute command package entry points
    #[serde(default)]
    pub runtime: ExecRuntimeConfig,

    /// External sub-commands and the packages implementing them
    #[serde(default)]
    pub commands: BTreeMap<String, CommandPackage>,

    /// Project template catalog
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Startup check for a newer CLI release
    #[serde(default)]
    pub update_check: UpdateCheckConfig,

    /// Display and output settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Timeout for registry metadata requests in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Timeout for tarball downloads in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            download_timeout_secs: default_download_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}
fn default_download_timeout() -> u64 {
    300 // 5 minutes
}
fn default_user_agent() -> String {
    format!(
        "almost/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Well-known registry endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryPreset {
    /// npmmirror.com mirror (default)
    #[default]
    Mirror,

    /// Canonical upstream registry
    Npm,
}

impl RegistryPreset {
    /// Base URL for this preset
    pub fn url(&self) -> &'static str {
        match self {
            RegistryPreset::Mirror => "https://registry.npmmirror.com",
            RegistryPreset::Npm => "https://registry.npmjs.org",
        }
    }
}

impl FromStr for RegistryPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mirror" | "npmmirror" => Ok(RegistryPreset::Mirror),
            "npm" | "npmjs" | "original" => Ok(RegistryPreset::Npm),
            other => Err(Error::unknown_registry_preset(other)),
        }
    }
}

impl fmt::Display for RegistryPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryPreset::Mirror => write!(f, "mirror"),
            RegistryPreset::Npm => write!(f, "npm"),
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryConfig {
    /// Named preset used when no explicit URL is given
    #[serde(default)]
    pub preset: RegistryPreset,

    /// Explicit base URL, overrides the preset
    #[serde(default)]
    pub url: Option<String>,
}

impl RegistryConfig {
    /// Effective registry base URL without a trailing slash
    pub fn base_url(&self) -> String {
        let url = self.url.as_deref().unwrap_or_else(|| self.preset.url());
        url.trim_end_matches('/').to_string()
    }

    /// Apply a `--registry` style override: a preset name or a URL
    pub fn apply_override(&mut self, value: &str) -> Result<(), Error> {
        if value.starts_with("http://") || value.starts_with("https://") {
            self.url = Some(value.to_string());
        } else {
            self.preset = value.parse()?;
            self.url = None;
        }
        Ok(())
    }
}

/// Directory layout under the CLI home
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PathsConfig {
    /// CLI home, relative to the user's home directory unless absolute
    #[serde(default = "default_cli_home")]
    pub cli_home: String,

    /// Directory holding command implementation packages
    #[serde(default = "default_dependencies_dir")]
    pub dependencies_dir: String,

    /// Directory holding project template packages
    #[serde(default = "default_template_dir")]
    pub template_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cli_home: default_cli_home(),
            dependencies_dir: default_dependencies_dir(),
            template_dir: default_template_dir(),
        }
    }
}

fn default_cli_home() -> String {
    ".almost-cli".to_string()
}
fn default_dependencies_dir() -> String {
    "dependencies".to_string()
}
fn default_template_dir() -> String {
    "template".to_string()
}

/// Runtime used for command package entry points
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExecRuntimeConfig {
    /// Interpreter binary that loads the entry point
    #[serde(default = "default_node_binary")]
    pub node_binary: String,
}

impl Default for ExecRuntimeConfig {
    fn default() -> Self {
        Self {
            node_binary: default_node_binary(),
        }
    }
}

fn default_node_binary() -> String {
    "node".to_string()
}

/// Package implementing an external sub-command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandPackage {
    /// Registry package name
    pub package: String,

    /// Version constraint, a literal version or "latest"
    #[serde(default = "default_version_constraint")]
    pub version: String,
}

fn default_version_constraint() -> String {
    "latest".to_string()
}

/// Project template catalog configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TemplatesConfig {
    /// Remote endpoint returning a JSON array of templates
    #[serde(default)]
    pub catalog_url: Option<String>,

    /// Locally configured templates, used when no catalog URL is set
    #[serde(default)]
    pub entries: Vec<TemplateEntry>,
}

/// A project template backed by a registry package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TemplateEntry {
    /// Display name
    pub name: String,

    /// Registry package name
    #[serde(alias = "npmName", alias = "npm-name")]
    pub package: String,

    /// Version constraint, a literal version or "latest"
    #[serde(default = "default_version_constraint")]
    pub version: String,

    /// Command run in the new project after copying
    #[serde(default, alias = "installCommand")]
    pub install_command: Option<String>,

    /// Command that starts the new project
    #[serde(default, alias = "startCommand")]
    pub start_command: Option<String>,
}

/// Startup update check configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateCheckConfig {
    /// Whether to query the registry for a newer release
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Registry package name the CLI is published under
    #[serde(default = "default_cli_package_name")]
    pub package_name: String,
}

impl Default for UpdateCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            package_name: default_cli_package_name(),
        }
    }
}

fn default_cli_package_name() -> String {
    "@almost-cli/core".to_string()
}

/// Display and output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DisplayConfig {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color_enabled: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_enabled: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_presets() {
        assert_eq!(
            RegistryPreset::Mirror.url(),
            "https://registry.npmmirror.com"
        );
        assert_eq!(RegistryPreset::Npm.url(), "https://registry.npmjs.org");
        assert_eq!(RegistryPreset::default(), RegistryPreset::Mirror);
    }

    #[test]
    fn test_registry_preset_from_str() {
        assert_eq!(
            "npm".parse::<RegistryPreset>().unwrap(),
            RegistryPreset::Npm
        );
        assert_eq!(
            "Mirror".parse::<RegistryPreset>().unwrap(),
            RegistryPreset::Mirror
        );
        assert!("verdaccio".parse::<RegistryPreset>().is_err());
    }

    #[test]
    fn test_registry_base_url_prefers_explicit_url() {
        let mut registry = RegistryConfig::default();
        assert_eq!(registry.base_url(), "https://registry.npmmirror.com");

        registry.url = Some("http://localhost:4873/".to_string());
        assert_eq!(registry.base_url(), "http://localhost:4873");
    }

    #[test]
    fn test_registry_apply_override() {
        let mut registry = RegistryConfig {
            preset: RegistryPreset::Mirror,
            url: Some("http://old".to_string()),
        };

        registry.apply_override("npm").unwrap();
        assert_eq!(registry.preset, RegistryPreset::Npm);
        assert_eq!(registry.url, None);

        registry.apply_override("https://registry.example.com").unwrap();
        assert_eq!(registry.base_url(), "https://registry.example.com");

        assert!(registry.apply_override("bogus").is_err());
    }

    #[test]
    fn test_template_entry_accepts_catalog_field_names() {
        let json = r#"{
            "name": "vue3 standard",
            "npmName": "@almost-cli/template-vue3",
            "version": "1.0.0",
            "installCommand": "npm install",
            "startCommand": "npm run serve"
        }"#;

        let entry: TemplateEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.package, "@almost-cli/template-vue3");
        assert_eq!(entry.install_command.as_deref(), Some("npm install"));
        assert_eq!(entry.start_command.as_deref(), Some("npm run serve"));
    }

    #[test]
    fn test_command_package_defaults_to_latest() {
        let yaml = "package: \"@almost-cli/init\"";
        let command: CommandPackage = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(command.version, "latest");
    }
}
