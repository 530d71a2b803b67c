//! Project template catalog
//!
//! Templates come from a remote endpoint returning a JSON array when
//! `templates.catalog-url` is configured, otherwise from the configured
//! `templates.entries`.

use almost_core::types::{NetworkConfig, TemplateEntry, TemplatesConfig};
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

/// Available project templates
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    entries: Vec<TemplateEntry>,
}

impl TemplateCatalog {
    pub fn new(entries: Vec<TemplateEntry>) -> Self {
        Self { entries }
    }

    /// Load the catalog described by `config`
    pub async fn load(config: &TemplatesConfig, network: &NetworkConfig) -> Result<Self> {
        match &config.catalog_url {
            Some(url) => Self::fetch(url, network).await,
            None => Ok(Self::new(config.entries.clone())),
        }
    }

    /// Fetch the catalog from a remote endpoint
    pub async fn fetch(url: &str, network: &NetworkConfig) -> Result<Self> {
        debug!("Fetching template catalog from: {}", url);

        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .timeout(Duration::from_secs(network.http_timeout_secs))
            .build()
            .map_err(|e| Error::catalog_unavailable(url, e.to_string()))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::catalog_unavailable(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::catalog_unavailable(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        let entries: Vec<TemplateEntry> = response
            .json()
            .await
            .map_err(|e| Error::catalog_unavailable(url, e.to_string()))?;

        debug!("Catalog lists {} templates", entries.len());
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display names of every template
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Find a template by display name or package name
    pub fn find(&self, template: &str) -> Result<&TemplateEntry> {
        if self.is_empty() {
            return Err(Error::NoTemplates);
        }

        self.entries
            .iter()
            .find(|e| e.name == template || e.package == template)
            .ok_or_else(|| Error::template_not_found(template, self.names().join(", ")))
    }

    /// The only template, when there is exactly one
    pub fn single(&self) -> Option<&TemplateEntry> {
        match self.entries.as_slice() {
            [entry] => Some(entry),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, package: &str) -> TemplateEntry {
        TemplateEntry {
            name: name.to_string(),
            package: package.to_string(),
            version: "latest".to_string(),
            install_command: Some("npm install".to_string()),
            start_command: None,
        }
    }

    #[test]
    fn test_find_by_name_or_package() {
        let catalog = TemplateCatalog::new(vec![
            entry("vue3", "@almost-cli/template-vue3"),
            entry("react", "@almost-cli/template-react"),
        ]);

        assert_eq!(catalog.find("react").unwrap().package, "@almost-cli/template-react");
        assert_eq!(catalog.find("@almost-cli/template-vue3").unwrap().name, "vue3");
        assert!(catalog.single().is_none());

        match catalog.find("svelte") {
            Err(Error::TemplateNotFound { available, .. }) => assert_eq!(available, "vue3, react"),
            other => panic!("expected TemplateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = TemplateCatalog::default();
        assert!(catalog.is_empty());
        assert!(matches!(catalog.find("vue3"), Err(Error::NoTemplates)));
    }

    #[test]
    fn test_single_entry() {
        let catalog = TemplateCatalog::new(vec![entry("vue3", "@almost-cli/template-vue3")]);
        assert_eq!(catalog.single().map(|e| e.name.as_str()), Some("vue3"));
    }

    #[tokio::test]
    async fn test_load_uses_configured_entries_without_url() {
        let config = TemplatesConfig {
            catalog_url: None,
            entries: vec![entry("vue3", "@almost-cli/template-vue3")],
        };

        let catalog = TemplateCatalog::load(&config, &NetworkConfig::default())
            .await
            .unwrap();
        assert_eq!(catalog.names(), vec!["vue3"]);
    }
}
