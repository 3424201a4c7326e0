use std::path::PathBuf;

use anyhow::Result;

use walletscout_core::AppConfig;
use walletscout_ledger::export::format_parties;
use walletscout_ledger::{export_transactions_csv, LedgerClient};

pub async fn run(
    config: AppConfig,
    address: String,
    export: Option<Option<PathBuf>>,
) -> Result<()> {
    let client = LedgerClient::new(&config.ledger)?;
    let summary = client.address_full(&address).await?;

    println!(
        "Address: {} (balance: {} BTC)",
        summary.address, summary.balance_btc
    );
    println!(
        "Received: {} BTC | Sent: {} BTC | Confirmed transactions: {}",
        summary.total_received_btc, summary.total_sent_btc, summary.confirmed_tx_count
    );
    if summary.unconfirmed_tx_count > 0 {
        println!(
            "Unconfirmed: {} BTC across {} transactions",
            summary.unconfirmed_balance_btc, summary.unconfirmed_tx_count
        );
    }

    if summary.transactions.is_empty() {
        println!("\nNo transactions available for this address.");
    } else {
        println!();
        for tx in &summary.transactions {
            let date = tx
                .confirmed_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "pending".to_string());
            println!(
                "  {} | {} BTC | fee {} BTC | block {} | {} | {} confirmations | {}",
                tx.hash,
                tx.net_value_btc,
                tx.fee_btc,
                tx.block_height,
                date,
                tx.confirmations,
                tx.role
            );
            if !tx.senders.is_empty() {
                println!("      from: {}", format_parties(&tx.senders));
            }
            if !tx.recipients.is_empty() {
                println!("      to:   {}", format_parties(&tx.recipients));
            }
        }
    }

    if let Some(maybe_path) = export {
        let path = maybe_path.unwrap_or_else(|| PathBuf::from(format!("{address}.csv")));
        export_transactions_csv(&summary, &path)?;
        println!(
            "\nExported {} transactions to {}",
            summary.transactions.len(),
            path.display()
        );
    }

    Ok(())
}
