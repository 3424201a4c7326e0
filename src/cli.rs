use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "walletscout",
    about = "Tor hidden-service crawler that discovers Bitcoin wallet addresses"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl hidden services for wallet addresses, starting from seed URLs
    Crawl {
        /// Seed .onion URLs (comma-separated, or a path to a file with one per line)
        #[arg(short, long)]
        seeds: Option<String>,

        /// Single seed .onion URL
        #[arg(long)]
        seed: Option<String>,

        /// Stop once this many unique wallets have been discovered
        #[arg(short, long, default_value = "1")]
        min_wallets: usize,
    },
    /// Look up balance and transactions for a wallet address
    Lookup {
        /// Wallet address to query
        address: String,

        /// Export transactions to CSV (defaults to <address>.csv)
        #[arg(short, long, value_name = "FILE", num_args = 0..=1)]
        export: Option<Option<PathBuf>>,
    },
}
