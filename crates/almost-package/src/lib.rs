//! # almost-package
//!
//! Resolution, caching, and installation of registry packages:
//! - [`RegistryClient`] answers version questions from registry metadata
//! - [`resolve_cache_path`] maps a package version to its content-addressed cache slot
//! - [`Package`] checks, installs, and updates one package in a store
//! - [`TarballInstaller`] downloads, verifies, and extracts package tarballs
//! - [`locate_entry_point`] finds the file a package's manifest declares as `main`

pub mod cache;
pub mod entry;
pub mod error;
pub mod installer;
pub mod registry;
pub mod store;

pub use cache::{encode_package_name, resolve_cache_path};
pub use entry::{find_package_dir, locate_entry_point, read_manifest, PackageManifest};
pub use error::{Error, Result};
pub use installer::{InstallRequest, PackageInstaller, PackageRef, TarballInstaller};
pub use registry::{PackageMetadata, RegistryClient, VersionManifest, LATEST_TAG};
pub use store::{Package, PackageSpec, VersionConstraint};
