//! Configuration loading and management

mod hierarchical_loader;

pub use hierarchical_loader::{
    resolve_cli_home, HierarchicalConfigLoader, CONFIG_FILE_NAME, DEFAULT_CLI_HOME,
};
