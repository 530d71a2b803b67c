//! Version command

use almost_core::CliContext;
use anyhow::Result;
use async_trait::async_trait;
use std::process::ExitCode;

use super::CliCommand;
use crate::cli::VersionArgs;
use crate::version::VersionInfo;

pub struct VersionCommand {
    json: bool,
}

#[async_trait]
impl CliCommand for VersionCommand {
    type Args = VersionArgs;

    fn initialize(args: VersionArgs, _ctx: CliContext) -> Result<Self> {
        Ok(Self { json: args.json })
    }

    async fn execute(self) -> Result<ExitCode> {
        let info = VersionInfo::current();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
        } else {
            println!("{}", info);
            println!("Requires node >= {}", info.min_node_version);
        }

        Ok(ExitCode::SUCCESS)
    }
}
