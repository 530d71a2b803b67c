//! Common test infrastructure for almost-package tests
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Package names, versions, and file contents
//! - `builders`: Registry metadata documents and in-memory tarballs
//! - `mock_server`: Wiremock setup helpers for registry and tarball endpoints
//! - `installers`: A recording [`PackageInstaller`] that only creates directories

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod constants;
pub mod installers;
pub mod mock_server;

pub use builders::*;
pub use constants::*;
pub use installers::*;
pub use mock_server::*;
