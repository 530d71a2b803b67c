//! Template install and start commands
//!
//! Only package manager invocations are run; the command line comes from a
//! remote catalog and is otherwise untrusted.

use almost_core::process::run_inherited;
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};

/// Programs a template command may start with
pub const ALLOWED_COMMANDS: &[&str] = &["npm", "cnpm", "yarn", "pnpm"];

/// A parsed, allowed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ProjectCommand {
    /// Split a command line on whitespace and check the program is allowed
    pub fn parse(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();

        if !ALLOWED_COMMANDS.contains(&program.as_str()) {
            return Err(Error::command_not_allowed(
                command.trim(),
                ALLOWED_COMMANDS.join(", "),
            ));
        }

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// The command line as typed
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Run a template command in `project_dir` with inherited stdio
///
/// A non-zero exit code is reported as [`Error::CommandFailed`].
pub async fn run_project_command(command: &str, project_dir: &Path) -> Result<()> {
    let command = ProjectCommand::parse(command)?;
    info!("Running: {}", command.display());

    let code = run_inherited(&command.program, &command.args, Some(project_dir)).await?;
    if code != 0 {
        return Err(Error::CommandFailed {
            command: command.display(),
            code,
        });
    }
    Ok(())
}
