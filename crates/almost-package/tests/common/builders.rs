//! Builders for registry documents and package tarballs

use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha512};

use super::constants::*;

/// Fluent builder for a registry metadata document
#[derive(Default)]
pub struct MetadataBuilder {
    name: String,
    latest: Option<String>,
    versions: Vec<(String, Value)>,
}

impl MetadataBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn latest(mut self, version: &str) -> Self {
        self.latest = Some(version.to_string());
        self
    }

    /// Add a version whose tarball is served at `tarball_url`
    pub fn version(mut self, version: &str, tarball_url: &str, integrity: Option<&str>) -> Self {
        let mut dist = json!({ "tarball": tarball_url });
        if let Some(integrity) = integrity {
            dist["integrity"] = json!(integrity);
        }
        self.versions.push((
            version.to_string(),
            json!({ "name": self.name, "version": version, "dist": dist }),
        ));
        self
    }

    /// Add a version without a reachable tarball
    pub fn bare_version(self, version: &str) -> Self {
        let url = format!("http://127.0.0.1:9/{}-{}.tgz", self.name, version);
        self.version(version, &url, None)
    }

    pub fn build(self) -> Value {
        let mut dist_tags = Map::new();
        if let Some(latest) = self.latest {
            dist_tags.insert("latest".to_string(), json!(latest));
        }

        let versions: Map<String, Value> = self.versions.into_iter().collect();
        json!({
            "name": self.name,
            "dist-tags": dist_tags,
            "versions": versions,
        })
    }
}

/// Build a gzipped tarball with every file under `package/`
pub fn package_tarball(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("package/{}", path), content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// A minimal package with a manifest and an entry file
pub fn standard_package_tarball(name: &str, version: &str) -> Vec<u8> {
    let manifest = json!({ "name": name, "version": version, "main": ENTRY_FILE }).to_string();
    package_tarball(&[("package.json", &manifest), (ENTRY_FILE, ENTRY_CONTENT)])
}

/// `sha512-<base64>` integrity string of `data`
pub fn integrity_of(data: &[u8]) -> String {
    format!(
        "sha512-{}",
        base64::engine::general_purpose::STANDARD.encode(Sha512::digest(data))
    )
}
