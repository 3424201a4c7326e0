use std::path::Path;

use tracing::info;

use crate::error::LedgerError;
use crate::types::{TxParty, WalletSummary};

/// Write a wallet's transactions to a spreadsheet-compatible CSV file.
/// Column set mirrors the interactive transaction table.
pub fn export_transactions_csv(summary: &WalletSummary, path: &Path) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Hash",
        "Net Value (BTC)",
        "Fee (BTC)",
        "Block",
        "Date",
        "Confirmations",
        "Role",
        "Senders",
        "Recipients",
    ])?;

    for tx in &summary.transactions {
        let date = tx
            .confirmed_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let net_value = tx.net_value_btc.to_string();
        let fee = tx.fee_btc.to_string();
        let block = tx.block_height.to_string();
        let confirmations = tx.confirmations.to_string();
        let role = tx.role.to_string();
        let senders = format_parties(&tx.senders);
        let recipients = format_parties(&tx.recipients);
        writer.write_record([
            tx.hash.as_str(),
            net_value.as_str(),
            fee.as_str(),
            block.as_str(),
            date.as_str(),
            confirmations.as_str(),
            role.as_str(),
            senders.as_str(),
            recipients.as_str(),
        ])?;
    }

    writer.flush()?;
    info!(path = %path.display(), count = summary.transactions.len(), "transactions exported");
    Ok(())
}

pub fn format_parties(parties: &[TxParty]) -> String {
    parties
        .iter()
        .map(|p| {
            let addr = p.addresses.first().map(String::as_str).unwrap_or("unknown");
            format!("{addr}: {} BTC", p.value_btc)
        })
        .collect::<Vec<_>>()
        .join(", ")
}
