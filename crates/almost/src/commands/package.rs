//! Package cache inspection commands

use almost_core::CliContext;
use almost_package::{locate_entry_point, resolve_cache_path, Package, PackageSpec, LATEST_TAG};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::process::ExitCode;

use super::{materialize, registry_client, tarball_installer, CliCommand};
use crate::cli::{
    PackageCommands, PackageEntryArgs, PackageFetchArgs, PackageNameArgs, PackagePathArgs,
};
use crate::output;

pub struct PackageCommand {
    ctx: CliContext,
    command: PackageCommands,
}

#[async_trait]
impl CliCommand for PackageCommand {
    type Args = PackageCommands;

    fn initialize(command: PackageCommands, ctx: CliContext) -> Result<Self> {
        if let PackageCommands::Path(args) = &command {
            // Validates the pair before it is turned into a path
            PackageSpec::new(&args.name, &args.version, ctx.dependencies_dir(), None)?;
        }
        Ok(Self { ctx, command })
    }

    async fn execute(self) -> Result<ExitCode> {
        match &self.command {
            PackageCommands::Latest(args) => self.latest(args).await?,
            PackageCommands::Versions(args) => self.versions(args).await?,
            PackageCommands::Path(args) => self.path(args),
            PackageCommands::Fetch(args) => self.fetch(args).await?,
            PackageCommands::Entry(args) => return Ok(self.entry(args)),
        }
        Ok(ExitCode::SUCCESS)
    }
}

impl PackageCommand {
    async fn latest(&self, args: &PackageNameArgs) -> Result<()> {
        let latest = registry_client(&self.ctx)?
            .get_latest_version(&args.name)
            .await
            .with_context(|| format!("Failed to query {}", args.name))?;

        if args.json {
            println!("{}", json!({ "name": args.name, "latest": latest }));
            return Ok(());
        }

        match latest {
            Some(version) => println!("{}", version),
            None => output::warning(&format!("{} has no latest version", args.name)),
        }
        Ok(())
    }

    async fn versions(&self, args: &PackageNameArgs) -> Result<()> {
        let versions = registry_client(&self.ctx)?
            .get_all_versions(&args.name)
            .await
            .with_context(|| format!("Failed to query {}", args.name))?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&versions)?);
            return Ok(());
        }

        if versions.is_empty() {
            output::warning(&format!("No versions published for {}", args.name));
        }
        for version in versions {
            println!("{}", version);
        }
        Ok(())
    }

    fn path(&self, args: &PackagePathArgs) {
        let path = resolve_cache_path(&self.ctx.command_store_dir(), &args.name, &args.version);
        println!("{}", path.display());
    }

    async fn fetch(&self, args: &PackageFetchArgs) -> Result<()> {
        let spec = PackageSpec::new(
            &args.name,
            &args.version,
            self.ctx.dependencies_dir(),
            Some(self.ctx.command_store_dir()),
        )?;
        let mut package = Package::new(
            spec,
            registry_client(&self.ctx)?,
            tarball_installer(&self.ctx)?,
        );

        match args.version.as_str() {
            LATEST_TAG => materialize(&mut package).await?,
            _ => {
                if !package.exists().await? {
                    package.install(None).await?;
                }
            }
        }

        let cache_path = package.cache_file_path().await?.unwrap_or_default();
        output::success(&format!(
            "{}@{} is cached",
            args.name,
            package.resolved_version().unwrap_or(args.version.as_str())
        ));
        output::kv("Path", &cache_path.display().to_string());

        match package.root_file_path().await? {
            Some(entry) => output::kv("Entry", &entry.display().to_string()),
            None => output::kv("Entry", "none"),
        }
        Ok(())
    }

    fn entry(&self, args: &PackageEntryArgs) -> ExitCode {
        match locate_entry_point(&args.path) {
            Some(entry) => {
                println!("{}", entry.display());
                ExitCode::SUCCESS
            }
            None => {
                output::warning(&format!("No entry point found at {}", args.path.display()));
                ExitCode::FAILURE
            }
        }
    }
}
