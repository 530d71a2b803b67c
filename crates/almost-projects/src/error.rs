//! Error types for almost-projects

use thiserror::Error;

/// Result type alias using almost-projects's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Project scaffolding error types
#[derive(Error, Debug)]
pub enum Error {
    /// Target directory already has content
    #[error("Project directory is not empty: {path}. Use --force to overwrite it")]
    ProjectExists { path: String },

    /// Invalid project name
    #[error("Invalid project name: {name}. Must start with a letter and contain only letters, digits, '-' or '_'")]
    InvalidProjectName { name: String },

    /// Invalid project version
    #[error("Invalid project version: {version}. Must be a semantic version such as 1.0.0")]
    InvalidVersion { version: String },

    /// Template not found in the catalog
    #[error("Template not found: {template}. Available templates: {available}")]
    TemplateNotFound { template: String, available: String },

    /// Catalog has no entries
    #[error("No project templates available")]
    NoTemplates,

    /// Template package does not contain a template directory
    #[error("Template directory not found in package: {path}")]
    TemplateDirMissing { path: String },

    /// Catalog endpoint failed
    #[error("Failed to load template catalog from {url}: {message}")]
    CatalogUnavailable { url: String, message: String },

    /// Command is not an allowed package manager
    #[error("Command not allowed: {command}. Allowed commands: {allowed}")]
    CommandNotAllowed { command: String, allowed: String },

    /// Command exited with a non-zero code
    #[error("Command '{command}' failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] almost_core::Error),
}

impl Error {
    /// Create a project exists error
    pub fn project_exists(path: impl Into<String>) -> Self {
        Self::ProjectExists { path: path.into() }
    }

    /// Create an invalid project name error
    pub fn invalid_project_name(name: impl Into<String>) -> Self {
        Self::InvalidProjectName { name: name.into() }
    }

    /// Create an invalid version error
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    /// Create a template not found error
    pub fn template_not_found(template: impl Into<String>, available: impl Into<String>) -> Self {
        Self::TemplateNotFound {
            template: template.into(),
            available: available.into(),
        }
    }

    /// Create a catalog unavailable error
    pub fn catalog_unavailable(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CatalogUnavailable {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a command not allowed error
    pub fn command_not_allowed(command: impl Into<String>, allowed: impl Into<String>) -> Self {
        Self::CommandNotAllowed {
            command: command.into(),
            allowed: allowed.into(),
        }
    }
}
