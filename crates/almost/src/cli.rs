//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// almost - scaffold projects from registry templates
#[derive(Parser, Debug)]
#[command(name = "almost")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Run commands from a local package directory instead of the registry
    #[arg(long, global = true, env = "ALMOST_TARGET_PATH")]
    pub target_path: Option<PathBuf>,

    /// Registry preset (mirror, npm) or base URL
    #[arg(long, global = true)]
    pub registry: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project from a template
    Init(InitArgs),

    /// Inspect and populate the package cache
    #[command(subcommand)]
    Package(PackageCommands),

    /// Show version information
    Version(VersionArgs),

    /// Run a command provided by a registry package
    #[command(external_subcommand)]
    External(Vec<String>),
}

// Init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name, prompted for when missing or invalid
    pub project_name: Option<String>,

    /// Overwrite a non-empty project directory
    #[arg(short, long)]
    pub force: bool,

    /// Template name or package
    #[arg(long)]
    pub template: Option<String>,

    /// Project version
    #[arg(long)]
    pub project_version: Option<String>,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Do not run the template's install command
    #[arg(long)]
    pub skip_install: bool,

    /// Run the template's start command after installing
    #[arg(long)]
    pub start: bool,
}

// Package commands
#[derive(Subcommand, Debug)]
pub enum PackageCommands {
    /// Show the latest published version
    Latest(PackageNameArgs),

    /// List published versions
    Versions(PackageNameArgs),

    /// Show the cache directory of a package version
    #[command(disable_version_flag = true)]
    Path(PackagePathArgs),

    /// Download a package into the command cache
    #[command(disable_version_flag = true)]
    Fetch(PackageFetchArgs),

    /// Show the entry point of a package directory
    Entry(PackageEntryArgs),
}

#[derive(Args, Debug)]
pub struct PackageNameArgs {
    /// Registry package name
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PackagePathArgs {
    /// Registry package name
    pub name: String,

    /// Concrete version
    pub version: String,
}

#[derive(Args, Debug)]
pub struct PackageFetchArgs {
    /// Registry package name
    pub name: String,

    /// Version or "latest"
    #[arg(long, default_value = "latest")]
    pub version: String,
}

#[derive(Args, Debug)]
pub struct PackageEntryArgs {
    /// Package directory or any directory below it
    pub path: PathBuf,
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
