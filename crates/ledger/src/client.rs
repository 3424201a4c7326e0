use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use walletscout_core::config::LedgerConfig;

use crate::error::LedgerError;
use crate::types::{TxParty, TxRole, WalletSummary, WalletTransaction};

const SATS_PER_BTC: f64 = 100_000_000.0;

/// Read-only client for a BlockCypher-compatible ledger index.
///
/// Only invoked after a crawl, when the user asks about a discovered
/// wallet, never from the crawl engine itself.
pub struct LedgerClient {
    http: reqwest::Client,
    api_url: String,
}

impl LedgerClient {
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch balance, totals and the confirmed transaction list for a
    /// wallet address.
    pub async fn address_full(&self, address: &str) -> Result<WalletSummary, LedgerError> {
        let url = format!("{}/addrs/{}/full", self.api_url, address);
        debug!(url = %url, "querying ledger index");

        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(LedgerError::Api {
                status: resp.status().as_u16(),
                address: address.to_string(),
            });
        }

        let raw: AddressFullResponse = resp.json().await?;
        Ok(summarize(address, raw))
    }
}

#[derive(Debug, Deserialize)]
struct AddressFullResponse {
    balance: i64,
    total_received: i64,
    total_sent: i64,
    n_tx: u64,
    #[serde(default)]
    unconfirmed_balance: i64,
    #[serde(default)]
    unconfirmed_n_tx: u64,
    #[serde(default)]
    txs: Vec<TxRecord>,
}

#[derive(Debug, Deserialize)]
struct TxRecord {
    hash: String,
    total: i64,
    fees: i64,
    #[serde(default = "unconfirmed_height")]
    block_height: i64,
    #[serde(default)]
    confirmed: Option<DateTime<Utc>>,
    #[serde(default)]
    confirmations: u64,
    #[serde(default)]
    inputs: Vec<TxInput>,
    #[serde(default)]
    outputs: Vec<TxOutput>,
}

fn unconfirmed_height() -> i64 {
    -1
}

#[derive(Debug, Deserialize)]
struct TxInput {
    /// May be null for coinbase inputs
    #[serde(default)]
    addresses: Option<Vec<String>>,
    #[serde(default)]
    output_value: i64,
}

#[derive(Debug, Deserialize)]
struct TxOutput {
    #[serde(default)]
    addresses: Option<Vec<String>>,
    #[serde(default)]
    value: i64,
}

fn sats_to_btc(sats: i64) -> f64 {
    sats as f64 / SATS_PER_BTC
}

/// Map the raw index response to the typed summary, converting satoshi
/// amounts and classifying the queried wallet's role per transaction.
fn summarize(address: &str, raw: AddressFullResponse) -> WalletSummary {
    let transactions = raw
        .txs
        .into_iter()
        .map(|tx| {
            let senders: Vec<TxParty> = tx
                .inputs
                .into_iter()
                .map(|i| TxParty {
                    addresses: i.addresses.unwrap_or_default(),
                    value_btc: sats_to_btc(i.output_value),
                })
                .collect();
            let recipients: Vec<TxParty> = tx
                .outputs
                .into_iter()
                .map(|o| TxParty {
                    addresses: o.addresses.unwrap_or_default(),
                    value_btc: sats_to_btc(o.value),
                })
                .collect();

            let sent = senders.iter().any(|p| p.addresses.iter().any(|a| a == address));
            let received = recipients
                .iter()
                .any(|p| p.addresses.iter().any(|a| a == address));
            let role = match (sent, received) {
                (true, true) => TxRole::SenderReceiver,
                (true, false) => TxRole::Sender,
                (false, true) => TxRole::Receiver,
                (false, false) => TxRole::Unknown,
            };

            WalletTransaction {
                hash: tx.hash,
                net_value_btc: sats_to_btc(tx.total),
                fee_btc: sats_to_btc(tx.fees),
                block_height: tx.block_height,
                confirmed_at: tx.confirmed,
                confirmations: tx.confirmations,
                role,
                senders,
                recipients,
            }
        })
        .collect();

    WalletSummary {
        address: address.to_string(),
        balance_btc: sats_to_btc(raw.balance),
        total_received_btc: sats_to_btc(raw.total_received),
        total_sent_btc: sats_to_btc(raw.total_sent),
        confirmed_tx_count: raw.n_tx,
        unconfirmed_balance_btc: sats_to_btc(raw.unconfirmed_balance),
        unconfirmed_tx_count: raw.unconfirmed_n_tx,
        transactions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "1BoatSLRHtKNngkdXEeobR76b53LETtpyT";

    fn fixture() -> AddressFullResponse {
        serde_json::from_str(
            r#"{
                "address": "1BoatSLRHtKNngkdXEeobR76b53LETtpyT",
                "balance": 150000000,
                "total_received": 250000000,
                "total_sent": 100000000,
                "n_tx": 2,
                "unconfirmed_balance": 0,
                "unconfirmed_n_tx": 0,
                "txs": [
                    {
                        "hash": "aa11",
                        "total": 100000000,
                        "fees": 20000,
                        "block_height": 800000,
                        "confirmed": "2024-05-01T12:34:56Z",
                        "confirmations": 42,
                        "inputs": [
                            {"addresses": ["1OtherSenderAddress"], "output_value": 100020000}
                        ],
                        "outputs": [
                            {"addresses": ["1BoatSLRHtKNngkdXEeobR76b53LETtpyT"], "value": 100000000}
                        ]
                    },
                    {
                        "hash": "bb22",
                        "total": 50000000,
                        "fees": 10000,
                        "block_height": 800100,
                        "confirmed": "2024-05-02T08:00:00Z",
                        "confirmations": 12,
                        "inputs": [
                            {"addresses": ["1BoatSLRHtKNngkdXEeobR76b53LETtpyT"], "output_value": 50010000}
                        ],
                        "outputs": [
                            {"addresses": null, "value": 50000000}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn converts_satoshis_to_btc() {
        let summary = summarize(ADDRESS, fixture());
        assert!((summary.balance_btc - 1.5).abs() < f64::EPSILON);
        assert!((summary.total_received_btc - 2.5).abs() < f64::EPSILON);
        assert!((summary.total_sent_btc - 1.0).abs() < f64::EPSILON);
        assert_eq!(summary.confirmed_tx_count, 2);
    }

    #[test]
    fn classifies_wallet_role_per_transaction() {
        let summary = summarize(ADDRESS, fixture());
        assert_eq!(summary.transactions[0].role, TxRole::Receiver);
        assert_eq!(summary.transactions[1].role, TxRole::Sender);
    }

    #[test]
    fn null_addresses_become_empty_lists() {
        let summary = summarize(ADDRESS, fixture());
        assert!(summary.transactions[1].recipients[0].addresses.is_empty());
    }

    #[test]
    fn parses_confirmation_metadata() {
        let summary = summarize(ADDRESS, fixture());
        let tx = &summary.transactions[0];
        assert_eq!(tx.block_height, 800000);
        assert_eq!(tx.confirmations, 42);
        assert_eq!(
            tx.confirmed_at.unwrap().format("%Y-%m-%d %H:%M").to_string(),
            "2024-05-01 12:34"
        );
    }

    #[test]
    fn role_is_unknown_when_wallet_not_attributed() {
        let summary = summarize("1SomeoneElseEntirely", fixture());
        assert_eq!(summary.transactions[0].role, TxRole::Unknown);
    }
}
