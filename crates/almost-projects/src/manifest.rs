//! Package manifest patching for new projects

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;
use crate::project::ProjectInfo;

/// Set `name` and `version` in `<project>/package.json`
///
/// Key order is preserved. A project without a manifest is left untouched and
/// reported as `false`.
pub fn patch_package_manifest(project_dir: &Path, info: &ProjectInfo) -> Result<bool> {
    let path = project_dir.join("package.json");
    if !path.is_file() {
        warn!("Template has no package.json, skipping manifest update");
        return Ok(false);
    }

    let content = fs::read_to_string(&path)?;
    let mut manifest: Value = serde_json::from_str(&content)?;

    if let Some(object) = manifest.as_object_mut() {
        object.insert("name".to_string(), Value::String(info.name.clone()));
        object.insert("version".to_string(), Value::String(info.version.clone()));
    }

    let mut output = serde_json::to_string_pretty(&manifest)?;
    output.push('\n');
    fs::write(&path, output)?;

    debug!("Updated {} to {}@{}", path.display(), info.name, info.version);
    Ok(true)
}
