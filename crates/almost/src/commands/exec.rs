//! External command dispatch
//!
//! `almost <name> [args...]` looks `name` up in the configured `commands`,
//! makes sure the implementing package is cached, and runs its entry point in
//! a child runtime process. The child's exit code becomes ours.

use almost_core::process::run_inherited;
use almost_core::types::CommandPackage;
use almost_core::CliContext;
use almost_package::{Package, PackageSpec};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::path::Path;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, info};

use super::{exit_code, materialize, registry_client, tarball_installer, CliCommand};

/// Loads the entry module and calls its export with the decoded arguments
const LOADER: &str = "const [entry, args] = process.argv.slice(1); \
const run = require(entry); \
Promise.resolve((typeof run === 'function' ? run : run.default).apply(null, JSON.parse(args))) \
.catch((e) => { console.error(e && e.message ? e.message : e); process.exitCode = 1; });";

/// Oldest runtime able to load command packages
pub const LOWEST_NODE_VERSION: semver::Version = semver::Version::new(14, 0, 0);

/// Dispatch failures
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown command '{name}'. Available commands: {available}")]
    UnknownSubcommand { name: String, available: String },

    #[error("Entry point not found for package {package} in {path}")]
    EntryPointNotFound { package: String, path: String },

    #[error("Runtime '{binary}' not found in PATH")]
    RuntimeNotFound { binary: String },

    #[error("Could not determine the version of '{binary}' from '{output}'")]
    RuntimeVersionUnknown { binary: String, output: String },

    #[error("'{binary}' {found} is too old, {required} or newer is required")]
    RuntimeTooOld {
        binary: String,
        found: String,
        required: String,
    },
}

pub struct ExecCommand {
    ctx: CliContext,
    name: String,
    args: Vec<String>,
    package: CommandPackage,
}

#[async_trait]
impl CliCommand for ExecCommand {
    type Args = Vec<String>;

    fn initialize(argv: Vec<String>, ctx: CliContext) -> Result<Self> {
        let mut argv = argv.into_iter();
        let name = argv.next().unwrap_or_default();

        let package = ctx.config().commands.get(&name).cloned().ok_or_else(|| {
            let available: Vec<&str> = ctx.config().commands.keys().map(String::as_str).collect();
            DispatchError::UnknownSubcommand {
                name: name.clone(),
                available: if available.is_empty() {
                    "none configured".to_string()
                } else {
                    available.join(", ")
                },
            }
        })?;

        debug!("Command '{}' is provided by {}@{}", name, package.package, package.version);

        Ok(Self {
            ctx,
            name,
            args: argv.collect(),
            package,
        })
    }

    async fn execute(self) -> Result<ExitCode> {
        let (target, store) = match self.ctx.target_path() {
            Some(path) => (path.to_path_buf(), None),
            None => (
                self.ctx.dependencies_dir(),
                Some(self.ctx.command_store_dir()),
            ),
        };
        debug!("Target path: {}", target.display());
        debug!("Store dir: {:?}", store);

        let spec = PackageSpec::new(
            &self.package.package,
            &self.package.version,
            &target,
            store.clone(),
        )?;
        let mut package = Package::new(
            spec,
            registry_client(&self.ctx)?,
            tarball_installer(&self.ctx)?,
        );

        if store.is_some() {
            materialize(&mut package).await?;
        }

        let search_root = package.cache_file_path().await?.unwrap_or(target);
        let entry = package
            .root_file_path()
            .await?
            .ok_or_else(|| DispatchError::EntryPointNotFound {
                package: self.package.package.clone(),
                path: search_root.display().to_string(),
            })?;

        let binary = &self.ctx.config().runtime.node_binary;
        let runtime = which::which(binary).map_err(|_| DispatchError::RuntimeNotFound {
            binary: binary.clone(),
        })?;
        let reported = runtime_version(&runtime).await?;
        check_runtime_version(binary, &reported)?;

        let payload = build_arguments(&self.args, self.ctx.debug(), self.ctx.target_path());
        info!("Running '{}' from {}", self.name, entry.display());

        let code = run_inherited(
            &runtime.to_string_lossy(),
            [
                "-e".to_string(),
                LOADER.to_string(),
                entry.to_string_lossy().to_string(),
                payload.to_string(),
            ],
            None,
        )
        .await
        .with_context(|| format!("Failed to run command '{}'", self.name))?;

        debug!("Command '{}' exited with {}", self.name, code);
        Ok(exit_code(code))
    }
}

async fn runtime_version(runtime: &Path) -> Result<String> {
    let output = tokio::process::Command::new(runtime)
        .arg("--version")
        .output()
        .await
        .with_context(|| format!("Failed to query version of {}", runtime.display()))?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Compare `node --version` output against [`LOWEST_NODE_VERSION`]
pub fn check_runtime_version(binary: &str, reported: &str) -> Result<(), DispatchError> {
    let found = reported.trim().trim_start_matches('v');
    let version = semver::Version::parse(found).map_err(|_| DispatchError::RuntimeVersionUnknown {
        binary: binary.to_string(),
        output: reported.to_string(),
    })?;

    if version < LOWEST_NODE_VERSION {
        return Err(DispatchError::RuntimeTooOld {
            binary: binary.to_string(),
            found: version.to_string(),
            required: LOWEST_NODE_VERSION.to_string(),
        });
    }

    debug!("{} version {} is supported", binary, version);
    Ok(())
}

/// Positional arguments followed by an options object
///
/// `--flag` becomes `true`, `--key=value` and `--key value` become strings,
/// and kebab-case keys are camel-cased. `-x` short flags become `true`.
pub fn build_arguments(args: &[String], debug: bool, target_path: Option<&Path>) -> Value {
    let mut positional = Vec::new();
    let mut options = Map::new();
    let mut iter = args.iter().peekable();

    while let Some(arg) = iter.next() {
        if let Some(long) = arg.strip_prefix("--") {
            match long.split_once('=') {
                Some((key, value)) => {
                    options.insert(camel_case(key), json!(value));
                }
                None => {
                    let value = match iter.peek() {
                        Some(next) if !next.starts_with('-') && !is_boolean_flag(long) => {
                            json!(iter.next())
                        }
                        _ => json!(true),
                    };
                    options.insert(camel_case(long), value);
                }
            }
        } else if let Some(short) = arg.strip_prefix('-').filter(|s| !s.is_empty()) {
            for flag in short.chars() {
                options.insert(flag.to_string(), json!(true));
            }
        } else {
            positional.push(json!(arg));
        }
    }

    options.insert("debug".to_string(), json!(debug));
    options.insert(
        "targetPath".to_string(),
        json!(target_path.map(|p| p.to_string_lossy().to_string())),
    );

    positional.push(Value::Object(options));
    Value::Array(positional)
}

/// Flags that never take a value
fn is_boolean_flag(flag: &str) -> bool {
    matches!(flag, "force" | "yes" | "debug" | "help")
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
