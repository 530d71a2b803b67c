//! Registry client
//!
//! Resolves a package name to its metadata document with a single
//! `GET {base}/{name}` and answers version questions from it. The client never
//! retries; callers layer retry policy on top if they want one.

use almost_core::types::NetworkConfig;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

/// Dist-tag that names the newest stable release
pub const LATEST_TAG: &str = "latest";

/// Package metadata as published by the registry
///
/// Built leniently: missing or wrongly typed `dist-tags`/`versions` fields
/// become empty collections instead of errors.
#[derive(Debug, Clone, Default)]
pub struct PackageMetadata {
    /// Package name as reported by the registry
    pub name: Option<String>,

    /// Dist-tags (e.g. `latest`, `next`) mapped to versions
    pub dist_tags: BTreeMap<String, String>,

    /// Per-version documents, in registry order
    pub versions: Map<String, Value>,
}

impl PackageMetadata {
    /// Extract metadata from a registry JSON document
    pub fn from_value(value: &Value) -> Self {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);

        let dist_tags = value
            .get("dist-tags")
            .and_then(Value::as_object)
            .map(|tags| {
                tags.iter()
                    .filter_map(|(tag, v)| v.as_str().map(|v| (tag.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        let versions = value
            .get("versions")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Self {
            name,
            dist_tags,
            versions,
        }
    }

    /// The `latest` dist-tag, if declared
    pub fn latest_version(&self) -> Option<&str> {
        self.dist_tags.get(LATEST_TAG).map(String::as_str)
    }

    /// All published version strings in registry order
    pub fn version_list(&self) -> Vec<String> {
        self.versions.keys().cloned().collect()
    }

    /// Resolve a dist-tag or literal version to a published version
    pub fn resolve(&self, version_or_tag: &str) -> Option<String> {
        let version = self
            .dist_tags
            .get(version_or_tag)
            .map(String::as_str)
            .unwrap_or(version_or_tag);

        self.versions
            .contains_key(version)
            .then(|| version.to_string())
    }
}

/// Distribution details of one published version
#[derive(Debug, Clone, Deserialize)]
pub struct DistInfo {
    /// Tarball download URL
    pub tarball: String,

    /// Subresource integrity string, e.g. `sha512-<base64>`
    #[serde(default)]
    pub integrity: Option<String>,

    /// Legacy SHA-1 hex digest
    #[serde(default)]
    pub shasum: Option<String>,
}

/// Registry document for a single version
#[derive(Debug, Clone, Deserialize)]
pub struct VersionManifest {
    /// Package name
    #[serde(default)]
    pub name: Option<String>,

    /// Concrete version
    pub version: String,

    /// Declared entry file
    #[serde(default)]
    pub main: Option<String>,

    /// Distribution details
    pub dist: DistInfo,
}

/// HTTP client for package metadata
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    /// Create a client for `base_url` using the configured timeouts and user agent
    pub fn new(base_url: impl Into<String>, network: &NetworkConfig) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into());
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .timeout(Duration::from_secs(network.http_timeout_secs))
            .build()
            .map_err(|source| Error::RegistryUnavailable {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self { client, base_url })
    }

    /// Create a client around an existing HTTP client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Registry base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Underlying HTTP client
    pub fn http_client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Metadata URL for a package
    pub fn package_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.trim_start_matches('/'))
    }

    /// Fetch package metadata
    ///
    /// Returns `None` for an empty name or a JSON `null` document.
    pub async fn get_package_info(&self, name: &str) -> Result<Option<PackageMetadata>> {
        if name.is_empty() {
            return Ok(None);
        }

        let url = self.package_url(name);
        debug!("Fetching package metadata from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| Error::RegistryUnavailable {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::RegistryError {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| Error::RegistryUnavailable {
                url: url.clone(),
                source,
            })?;

        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| Error::malformed_metadata(name, e.to_string()))?;

        if value.is_null() {
            return Ok(None);
        }

        Ok(Some(PackageMetadata::from_value(&value)))
    }

    /// The registry's `latest` dist-tag for a package, if declared
    pub async fn get_latest_version(&self, name: &str) -> Result<Option<String>> {
        let latest = self
            .get_package_info(name)
            .await?
            .and_then(|metadata| metadata.latest_version().map(str::to_string));

        debug!("Latest version of {}: {:?}", name, latest);
        Ok(latest)
    }

    /// All published versions of a package in registry order
    pub async fn get_all_versions(&self, name: &str) -> Result<Vec<String>> {
        Ok(self
            .get_package_info(name)
            .await?
            .map(|metadata| metadata.version_list())
            .unwrap_or_default())
    }

    /// Resolve a dist-tag or literal version to its version document
    pub async fn get_version_manifest(
        &self,
        name: &str,
        version_or_tag: &str,
    ) -> Result<VersionManifest> {
        let metadata = self
            .get_package_info(name)
            .await?
            .ok_or_else(|| Error::version_not_found(name, version_or_tag))?;

        let version = metadata
            .resolve(version_or_tag)
            .ok_or_else(|| Error::version_not_found(name, version_or_tag))?;

        let document = metadata
            .versions
            .get(&version)
            .cloned()
            .ok_or_else(|| Error::version_not_found(name, &version))?;

        serde_json::from_value(document)
            .map_err(|e| Error::malformed_metadata(name, format!("version {}: {}", version, e)))
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
