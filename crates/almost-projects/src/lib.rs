//! # almost-projects
//!
//! Project scaffolding for the almost CLI providing:
//! - Project name and version validation
//! - The template catalog (remote endpoint or configured entries)
//! - Copying a template package into a new project and patching its manifest
//! - Running the template's install and start commands

pub mod catalog;
pub mod commands;
pub mod copy;
pub mod error;
pub mod manifest;
pub mod project;

pub use catalog::TemplateCatalog;
pub use commands::{run_project_command, ProjectCommand, ALLOWED_COMMANDS};
pub use copy::copy_template;
pub use error::{Error, Result};
pub use manifest::patch_package_manifest;
pub use project::{
    clear_dir, inspect_target_dir, is_valid_project_name, parse_project_version,
    prepare_target_dir, ProjectInfo, TargetState, DEFAULT_PROJECT_VERSION,
};
