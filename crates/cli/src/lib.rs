pub mod cli;
pub mod commands;
pub mod config;
pub mod render;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use taskdeck_core::ApiClient;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

pub use taskdeck_core as core;
pub use taskdeck_core::ClientConfig;

use crate::cli::Cli;

/// Execute the parsed command line, writing the command report to `writer`.
pub async fn run<W: Write>(cli: Cli, writer: W) -> Result<()> {
    init_tracing(cli.log_filter.clone())?;

    let config = config::from_cli(&cli)?;
    let client = Arc::new(ApiClient::new(&config).context("failed to build http client")?);
    tracing::debug!(base_url = %client.base_url(), timeout = ?config.timeout(), "resolved backend");

    let command = cli.command.unwrap_or_default();
    commands::execute(client, command, Local::now().fixed_offset(), writer).await
}

/// Run the command line by creating an internal Tokio runtime.
pub fn run_blocking<W: Write>(cli: Cli, writer: W) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(run(cli, writer))
}

fn init_tracing(filter: Option<String>) -> Result<()> {
    let filter = filter.unwrap_or_else(|| "warn".to_string());
    let directive: Directive = filter
        .parse()
        .with_context(|| format!("invalid log directive '{filter}'"))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
    Ok(())
}
