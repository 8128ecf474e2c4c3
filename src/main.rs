use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = taskdeck::cli::Cli::parse();
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    taskdeck::run_blocking(cli, handle)
}
