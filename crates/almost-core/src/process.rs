//! Child process execution
//!
//! Spawns a program with inherited standard streams, waits for it, and reports
//! its exit code back to the caller.

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Exit code reported when the child was terminated without one (e.g. by a signal)
pub const ABNORMAL_EXIT_CODE: i32 = 1;

/// Run `program` with `args`, inheriting stdin/stdout/stderr
///
/// Returns the child's exit code. Failure to start the process is an error;
/// a non-zero exit code is not.
pub async fn run_inherited<I, S>(program: &str, args: I, cwd: Option<&Path>) -> Result<i32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    debug!("Spawning {:?}", cmd.as_std());

    let status = cmd
        .status()
        .await
        .map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;

    match status.code() {
        Some(code) => {
            debug!("'{}' exited with code {}", program, code);
            Ok(code)
        }
        None => {
            warn!("'{}' terminated without an exit code", program);
            Ok(ABNORMAL_EXIT_CODE)
        }
    }
}
