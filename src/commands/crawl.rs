use std::time::Duration;

use anyhow::{bail, Result};
use tokio::signal;
use tracing::{info, warn};

use walletscout_core::{AppConfig, CrawlEvent, CrawlRequest, PageResults};
use walletscout_engine::{CrawlSession, EngineOptions};
use walletscout_networks::TorDriver;

use crate::seeds::parse_seeds;

pub async fn run(
    config: AppConfig,
    seeds: Option<String>,
    seed: Option<String>,
    min_wallets: usize,
) -> Result<()> {
    if min_wallets == 0 {
        bail!("the minimum wallet count must be a positive integer");
    }

    // Collect seed URLs from --seed, a comma list or a file
    let mut seed_lines: Vec<String> = Vec::new();
    if let Some(s) = seed {
        seed_lines.push(s);
    }
    if let Some(seeds_arg) = seeds {
        if std::path::Path::new(&seeds_arg).exists() {
            let content = std::fs::read_to_string(&seeds_arg)?;
            seed_lines.extend(
                content
                    .lines()
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty()),
            );
        } else {
            seed_lines.extend(seeds_arg.split(',').map(|s| s.trim().to_string()));
        }
    }

    let (seed_urls, rejected) = parse_seeds(seed_lines);
    for bad in &rejected {
        warn!(seed = %bad, "rejected malformed seed");
    }
    if seed_urls.is_empty() {
        bail!("at least one syntactically valid .onion seed URL is required");
    }
    info!(count = seed_urls.len(), min_wallets, "seeds loaded");

    let driver = TorDriver::new(&config.tor, &config.check)?;
    let request = CrawlRequest {
        seeds: seed_urls,
        min_wallets,
    };
    let options = EngineOptions {
        pace_delay: Duration::from_millis(config.general.pace_delay_ms),
    };

    let mut session = CrawlSession::spawn(request, driver, options);
    info!("crawl started, press Ctrl+C to cancel");

    let cancel = session.cancel_handle();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("cancellation requested, waiting for the crawl loop to stop");
            cancel.cancel();
        }
    });

    while let Some(event) = session.next_event().await {
        match event {
            CrawlEvent::Status(text) => info!("{text}"),
            CrawlEvent::WalletFound(count) => {
                println!("wallets found: {count} / {min_wallets}");
            }
            CrawlEvent::Completed(results) => {
                render_results(&results);
                break;
            }
            CrawlEvent::Cancelled => {
                println!("crawl cancelled");
                break;
            }
            CrawlEvent::ConnectionError(message) => {
                warn!(message = %message, "could not establish a verified Tor connection");
                println!("error: could not establish a verified Tor connection");
                break;
            }
            CrawlEvent::Error(message) => {
                println!("error: the crawl aborted: {message}");
                break;
            }
        }
    }

    session.join().await;
    Ok(())
}

fn render_results(results: &PageResults) {
    if results.is_empty() {
        println!("crawl completed: no wallets found");
        return;
    }

    println!("crawl completed, wallets by page:\n");
    let mut urls: Vec<&String> = results.keys().collect();
    urls.sort();
    for url in urls {
        println!("{url}");
        for wallet in &results[url] {
            println!("    {wallet}");
        }
    }
}
