use std::time::Duration;

pub use taskdeck_core::config::*;

use crate::cli::Cli;

/// Resolves the client configuration; `--timeout` wins over the environment.
pub fn from_cli(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let config = ClientConfig::discover(cli.api_url.clone())?;
    Ok(match cli.timeout {
        Some(seconds) => config.with_timeout(Some(Duration::from_secs(seconds))),
        None => config,
    })
}
