//! Startup check for a newer CLI release

use almost_core::CliContext;
use semver::Version;
use tracing::debug;

use super::registry_client;
use crate::output;
use crate::version::VersionInfo;

/// Warn when the registry has a newer release of the CLI
///
/// Never fails: every problem is logged at debug level and ignored.
pub async fn check_for_update(ctx: &CliContext) {
    let config = &ctx.config().update_check;
    if !config.enabled {
        debug!("Update check disabled");
        return;
    }

    let client = match registry_client(ctx) {
        Ok(client) => client,
        Err(e) => {
            debug!("Update check skipped: {:#}", e);
            return;
        }
    };

    let latest = match client.get_latest_version(&config.package_name).await {
        Ok(Some(latest)) => latest,
        Ok(None) => {
            debug!("No latest version published for {}", config.package_name);
            return;
        }
        Err(e) => {
            debug!("Update check failed: {}", e);
            return;
        }
    };

    let current = VersionInfo::current().version;
    if let Some(newer) = newer_version(&current, &latest) {
        output::warning(&format!(
            "A new version of {} is available: {} -> {}. Update with: npm install -g {}",
            config.package_name, current, newer, config.package_name
        ));
    }
}

/// `latest` when it parses as semver and is greater than `current`
pub fn newer_version(current: &str, latest: &str) -> Option<Version> {
    let current = Version::parse(current).ok()?;
    let latest = Version::parse(latest).ok()?;
    (latest > current).then_some(latest)
}
