//! # almost-core
//!
//! Core library for the almost CLI providing:
//! - Hierarchical runtime configuration (embedded defaults, config file, env)
//! - The per-invocation [`CliContext`] passed to every command
//! - Child process execution with inherited standard streams

pub mod config;
pub mod context;
pub mod error;
pub mod process;
pub mod types;
pub mod utils;

pub use config::HierarchicalConfigLoader;
pub use context::CliContext;
pub use error::{Error, Result};
pub use types::{RegistryPreset, RuntimeConfig};
pub use utils::get_home_dir;
