//! Content-addressed cache layout
//!
//! A cached package lives at
//! `<store>/.store/<encodedName>@<version>/node_modules/<name>`, where the
//! encoded name replaces every `/` of a scoped name with `+`. The layout is
//! shared with npminstall-style stores so existing caches are re-used as-is.

use std::path::{Path, PathBuf};

/// Directory under the store root that holds every cached package
pub const STORE_SUBDIR: &str = ".store";

/// Directory that holds the package itself inside its cache slot
pub const MODULES_DIR: &str = "node_modules";

/// Encode a package name into a single path segment
pub fn encode_package_name(name: &str) -> String {
    name.replace('/', "+")
}

/// Cache slot directory for `name@version` (the parent of its `node_modules`)
pub fn cache_slot_dir(store_dir: &Path, name: &str, version: &str) -> PathBuf {
    store_dir
        .join(STORE_SUBDIR)
        .join(format!("{}@{}", encode_package_name(name), version))
}

/// Resolve the on-disk directory of `name@version` inside `store_dir`
///
/// Pure: performs no filesystem access. Callers are expected to pass a
/// validated name (see [`crate::PackageSpec`]).
pub fn resolve_cache_path(store_dir: &Path, name: &str, version: &str) -> PathBuf {
    let mut path = cache_slot_dir(store_dir, name, version).join(MODULES_DIR);
    for segment in name.split('/') {
        path.push(segment);
    }
    path
}
