//! CLI command implementations
//!
//! Every command is a type implementing [`CliCommand`]: `initialize` validates
//! arguments against the context, `execute` does the work and picks the exit
//! code.

pub mod exec;
pub mod init;
pub mod package;
pub mod update_check;
pub mod version;

use almost_core::CliContext;
use almost_package::{Package, PackageInstaller, RegistryClient, TarballInstaller};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::ExitCode;
use std::sync::Arc;

/// Contract shared by all commands
#[async_trait]
pub trait CliCommand: Sized + Send {
    type Args: Send;

    fn initialize(args: Self::Args, ctx: CliContext) -> Result<Self>;

    async fn execute(self) -> Result<ExitCode>;
}

/// Initialize and execute a command
pub async fn run<C: CliCommand>(args: C::Args, ctx: CliContext) -> Result<ExitCode> {
    C::initialize(args, ctx)?.execute().await
}

/// Registry client for the configured registry
pub(crate) fn registry_client(ctx: &CliContext) -> Result<RegistryClient> {
    RegistryClient::new(ctx.registry_url(), &ctx.config().network)
        .context("Failed to create registry client")
}

/// Tarball installer, with a progress bar when attended
pub(crate) fn tarball_installer(ctx: &CliContext) -> Result<Arc<dyn PackageInstaller>> {
    let installer = TarballInstaller::new(&ctx.config().network)
        .context("Failed to create package installer")?
        .with_progress(console::user_attended_stderr());
    Ok(Arc::new(installer))
}

/// Make sure the package is cached at the newest version
pub(crate) async fn materialize(package: &mut Package) -> Result<()> {
    let result = if package.exists().await? {
        package.update().await
    } else {
        package.install(None).await
    };

    result.with_context(|| format!("Failed to prepare package {}", package.name()))
}

/// Map a child exit code onto the process exit code
pub(crate) fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}
