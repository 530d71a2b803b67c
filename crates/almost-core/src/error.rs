//! Error types for almost-core

use thiserror::Error;

/// Result type alias using almost-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for almost
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Home directory missing or not resolvable
    #[error("Home directory of the current user does not exist: {path}")]
    HomeNotFound { path: String },

    /// Unknown registry preset
    #[error("Unknown registry preset: {name}. Valid presets: mirror, npm")]
    UnknownRegistryPreset { name: String },

    /// Child process could not be started
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a home not found error
    pub fn home_not_found(path: impl Into<String>) -> Self {
        Self::HomeNotFound { path: path.into() }
    }

    /// Create an unknown registry preset error
    pub fn unknown_registry_preset(name: impl Into<String>) -> Self {
        Self::UnknownRegistryPreset { name: name.into() }
    }
}
