mod cli;
mod commands;
mod seeds;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use walletscout_core::AppConfig;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_str = std::fs::read_to_string(&cli.config).unwrap_or_else(|_| {
        warn!(path = %cli.config, "config file not found, using defaults");
        include_str!("../config/default.toml").to_string()
    });
    let mut config: AppConfig = toml::from_str(&config_str)?;

    // Environment overrides, useful when the proxy runs in a container
    if let Ok(v) = std::env::var("TOR_PROXY") {
        config.tor.socks_proxy = v;
    }
    if let Ok(v) = std::env::var("WALLETSCOUT_PACE_MS") {
        if let Ok(n) = v.parse::<u64>() {
            config.general.pace_delay_ms = n;
        }
    }

    match cli.command {
        Commands::Crawl {
            seeds,
            seed,
            min_wallets,
        } => {
            commands::crawl::run(config, seeds, seed, min_wallets).await?;
        }
        Commands::Lookup { address, export } => {
            commands::lookup::run(config, address, export).await?;
        }
    }

    Ok(())
}
