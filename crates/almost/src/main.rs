//! almost CLI - scaffold projects from registry templates
//!
//! This is the main entry point for the almost command-line interface.

mod cli;
mod commands;
mod output;
mod version;

use almost_core::{get_home_dir, CliContext, HierarchicalConfigLoader};
use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use commands::exec::ExecCommand;
use commands::init::InitCommand;
use commands::package::PackageCommand;
use commands::update_check::check_for_update;
use commands::version::VersionCommand;
use version::VersionInfo;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet, cli.debug);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    debug!("{}", VersionInfo::current());

    let ctx = build_context(&cli)?;

    if !matches!(cli.command, Commands::Version(_)) {
        check_for_update(&ctx).await;
    }

    match cli.command {
        Commands::Init(args) => commands::run::<InitCommand>(args, ctx).await,
        Commands::Package(args) => commands::run::<PackageCommand>(args, ctx).await,
        Commands::Version(args) => commands::run::<VersionCommand>(args, ctx).await,
        Commands::External(argv) => commands::run::<ExecCommand>(argv, ctx).await,
    }
}

/// Resolve home, configuration, and CLI flags into the invocation context
fn build_context(cli: &Cli) -> Result<CliContext> {
    let home = get_home_dir()?;

    let config = HierarchicalConfigLoader::new()
        .context("Failed to create config loader")?
        .load_runtime_config()
        .context("Failed to load runtime config")?;

    let mut ctx = CliContext::new(home, config)?
        .with_target_path(cli.target_path.clone())?
        .with_debug(cli.debug || cli.verbose > 0);

    if let Some(registry) = &cli.registry {
        ctx.config_mut()
            .registry
            .apply_override(registry)
            .context("Invalid --registry value")?;
    }

    if !ctx.config().display.color_enabled {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    debug!("CLI home: {}", ctx.cli_home().display());
    debug!("Registry: {}", ctx.registry_url());
    Ok(ctx)
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool, debug: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match (verbose, debug) {
            (0, false) => EnvFilter::new("info"),
            (0 | 1, _) => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
