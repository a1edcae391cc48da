mod cli;
mod commands;
mod config;
mod format;
mod main_lib;

use std::time::Duration;

use clap::Parser;

use cli::{Cli, Commands};
use config::Config;
use main_lib::{build_dashboard, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(config.log_format);
    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }

    let dashboard = build_dashboard(&config, cli.ephemeral)?;

    match cli.command {
        Commands::List => commands::list(&dashboard)?,
        Commands::Add { ref symbol } => commands::add(&dashboard, symbol).await?,
        Commands::Remove { ref symbol } => commands::remove(&dashboard, symbol)?,
        Commands::Quotes { sort, desc } => commands::quotes(&dashboard, sort, desc).await?,
        Commands::Watch { interval } => {
            let every = interval
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(config.refresh_interval);
            commands::watch(&dashboard, every).await?
        }
        Commands::Chart { ref symbol, period } => {
            commands::chart(&dashboard, symbol, period.into()).await?
        }
    }

    Ok(())
}
