//! Error types for almost-package

use thiserror::Error;

/// Result type alias using almost-package's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Package resolution and installation errors
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed package descriptor
    #[error("Invalid package spec: {message}")]
    InvalidSpec { message: String },

    /// Registry could not be reached
    #[error("Registry unavailable at {url}: {source}")]
    RegistryUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Registry answered with a non-success status
    #[error("Registry returned HTTP {status} for {url}")]
    RegistryError { url: String, status: u16 },

    /// Registry body could not be parsed
    #[error("Malformed registry metadata for {name}: {message}")]
    MalformedMetadata { name: String, message: String },

    /// Registry declares no "latest" dist-tag
    #[error("Registry does not declare a latest version for {name}")]
    LatestVersionUnavailable { name: String },

    /// Requested version or dist-tag does not exist
    #[error("Version {version} of {name} not found in registry")]
    VersionNotFound { name: String, version: String },

    /// Operation requires a store directory
    #[error("'{operation}' requires a store directory for package {name}")]
    StoreRequired { name: String, operation: String },

    /// Underlying installer failed
    #[error("Failed to install {name}@{version}: {source}")]
    InstallError {
        name: String,
        version: String,
        #[source]
        source: anyhow::Error,
    },

    /// Tarball download failed
    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    /// Tarball content does not match the registry's integrity digest
    #[error("Integrity check failed for {name}@{version}: expected {expected}, got {actual}")]
    IntegrityMismatch {
        name: String,
        version: String,
        expected: String,
        actual: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid spec error
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidSpec {
            message: message.into(),
        }
    }

    /// Create a malformed metadata error
    pub fn malformed_metadata(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedMetadata {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a latest version unavailable error
    pub fn latest_version_unavailable(name: impl Into<String>) -> Self {
        Self::LatestVersionUnavailable { name: name.into() }
    }

    /// Create a version not found error
    pub fn version_not_found(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::VersionNotFound {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Create a store required error
    pub fn store_required(name: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::StoreRequired {
            name: name.into(),
            operation: operation.into(),
        }
    }

    /// Create a download error
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Whether the error came from the registry transport or response
    pub fn is_registry_failure(&self) -> bool {
        matches!(
            self,
            Self::RegistryUnavailable { .. }
                | Self::RegistryError { .. }
                | Self::MalformedMetadata { .. }
        )
    }
}
