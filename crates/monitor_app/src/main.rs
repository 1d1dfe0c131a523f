mod cli;
mod config;
mod render;
mod run;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use config::MonitorConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = MonitorConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    monitor_logging::initialize(
        config.log_destination,
        cli.log_level,
        config.log_file.as_deref(),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    runtime.block_on(run::run(cli.command, &config))
}
