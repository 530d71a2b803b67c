//! Project initialization from a registry template

use almost_core::types::TemplateEntry;
use almost_core::CliContext;
use almost_package::{Package, PackageSpec};
use almost_projects::{
    clear_dir, copy_template, is_valid_project_name, parse_project_version,
    patch_package_manifest, prepare_target_dir, run_project_command, ProjectInfo,
    TargetState, TemplateCatalog, DEFAULT_PROJECT_VERSION,
};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use dialoguer::{Confirm, Input, Select};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use super::{materialize, registry_client, tarball_installer, CliCommand};
use crate::cli::InitArgs;
use crate::output;

/// Directory inside a template package that holds the project files
const TEMPLATE_SUBDIR: &str = "template";

pub struct InitCommand {
    ctx: CliContext,
    args: InitArgs,
    cwd: PathBuf,
}

#[async_trait]
impl CliCommand for InitCommand {
    type Args = InitArgs;

    fn initialize(args: InitArgs, ctx: CliContext) -> Result<Self> {
        if let Some(version) = &args.project_version {
            parse_project_version(version)?;
        }

        let cwd = std::env::current_dir().context("Failed to read the current directory")?;
        debug!("init: name={:?} force={}", args.project_name, args.force);

        Ok(Self { ctx, args, cwd })
    }

    async fn execute(self) -> Result<ExitCode> {
        let name = self.project_name()?;
        let target = self.cwd.join(&name);

        if !self.prepare(&target)? {
            output::info("Initialization cancelled");
            return Ok(ExitCode::SUCCESS);
        }

        let info = ProjectInfo::new(name, &self.project_version()?)?;
        let catalog = TemplateCatalog::load(&self.ctx.config().templates, &self.ctx.config().network)
            .await
            .context("Failed to load project templates")?;
        let template = self.select_template(&catalog)?;

        output::header(&format!("Creating {}@{}", info.name, info.version));
        output::kv("Template", &template.name);
        output::kv("Directory", &target.display().to_string());

        let template_root = self.download_template(&template).await?;
        self.install_template(&template_root, &target, &info)?;

        if let Some(command) = template.install_command.as_deref() {
            if self.args.skip_install {
                output::info(&format!("Skipping '{}'", command));
            } else {
                run_project_command(command, &target).await?;
            }
        }

        if self.args.start {
            match template.start_command.as_deref() {
                Some(command) => run_project_command(command, &target).await?,
                None => output::warning("Template does not define a start command"),
            }
        }

        output::success(&format!("Project {} created", info.name));
        Ok(ExitCode::SUCCESS)
    }
}

impl InitCommand {
    /// Project name from the arguments, prompted for when missing or invalid
    fn project_name(&self) -> Result<String> {
        if let Some(name) = &self.args.project_name {
            if is_valid_project_name(name) {
                return Ok(name.clone());
            }
            output::warning(&format!("'{}' is not a valid project name", name));
        }

        let name = Input::<String>::new()
            .with_prompt("Project name")
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                if is_valid_project_name(input) {
                    Ok(())
                } else {
                    Err("Use letters, digits, '-' or '_', starting with a letter".to_string())
                }
            })
            .interact_text()?;
        Ok(name)
    }

    fn project_version(&self) -> Result<String> {
        if let Some(version) = &self.args.project_version {
            return Ok(parse_project_version(version)?);
        }
        if self.args.yes {
            return Ok(DEFAULT_PROJECT_VERSION.to_string());
        }

        let version = Input::<String>::new()
            .with_prompt("Project version")
            .default(DEFAULT_PROJECT_VERSION.to_string())
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                parse_project_version(input)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()?;
        Ok(parse_project_version(&version)?)
    }

    /// Make sure the target directory can receive the project
    ///
    /// Returns `false` when the user declines to overwrite it.
    fn prepare(&self, target: &std::path::Path) -> Result<bool> {
        if prepare_target_dir(target, self.args.force)? != TargetState::NonEmpty {
            return Ok(true);
        }

        let confirmed = self.args.yes
            || Confirm::new()
                .with_prompt(format!(
                    "{} is not empty. Remove its contents?",
                    target.display()
                ))
                .default(false)
                .interact()?;

        if confirmed {
            clear_dir(target)?;
        }
        Ok(confirmed)
    }

    fn select_template(&self, catalog: &TemplateCatalog) -> Result<TemplateEntry> {
        if let Some(template) = &self.args.template {
            return Ok(catalog.find(template)?.clone());
        }
        if let Some(template) = catalog.single() {
            return Ok(template.clone());
        }
        if catalog.is_empty() {
            return Err(almost_projects::Error::NoTemplates.into());
        }

        let names = catalog.names();
        let selection = Select::new()
            .with_prompt("Select a project template")
            .items(&names)
            .default(0)
            .interact()?;

        Ok(catalog.entries()[selection].clone())
    }

    /// Cache the template package and return its directory
    async fn download_template(&self, template: &TemplateEntry) -> Result<PathBuf> {
        let spec = PackageSpec::new(
            &template.package,
            &template.version,
            self.ctx.template_dir(),
            Some(self.ctx.template_store_dir()),
        )?;
        let mut package = Package::new(
            spec,
            registry_client(&self.ctx)?,
            tarball_installer(&self.ctx)?,
        );

        materialize(&mut package).await?;

        package
            .cache_file_path()
            .await?
            .ok_or_else(|| anyhow!("Template {} has no cache path", template.package))
    }

    fn install_template(
        &self,
        template_root: &std::path::Path,
        target: &std::path::Path,
        info: &ProjectInfo,
    ) -> Result<()> {
        let pb = output::spinner("Copying template");
        let copied = copy_template(&template_root.join(TEMPLATE_SUBDIR), target);
        pb.finish_and_clear();

        let copied = copied.context("Failed to copy template")?;
        debug!("Copied {} template files", copied);

        patch_package_manifest(target, info)?;
        Ok(())
    }
}
