use std::fmt;

use chrono::{DateTime, Utc};

/// Financial snapshot of one wallet, amounts in BTC.
#[derive(Debug, Clone)]
pub struct WalletSummary {
    pub address: String,
    pub balance_btc: f64,
    pub total_received_btc: f64,
    pub total_sent_btc: f64,
    pub confirmed_tx_count: u64,
    pub unconfirmed_balance_btc: f64,
    pub unconfirmed_tx_count: u64,
    pub transactions: Vec<WalletTransaction>,
}

#[derive(Debug, Clone)]
pub struct WalletTransaction {
    pub hash: String,
    pub net_value_btc: f64,
    pub fee_btc: f64,
    pub block_height: i64,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmations: u64,
    /// Which side of the transaction the queried wallet appears on.
    pub role: TxRole,
    pub senders: Vec<TxParty>,
    pub recipients: Vec<TxParty>,
}

/// One input or output of a transaction: the addresses the ledger index
/// attributes to it, and its value in BTC.
#[derive(Debug, Clone)]
pub struct TxParty {
    pub addresses: Vec<String>,
    pub value_btc: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxRole {
    Sender,
    Receiver,
    SenderReceiver,
    /// The index did not attribute the wallet to either side.
    Unknown,
}

impl fmt::Display for TxRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TxRole::Sender => "sender",
            TxRole::Receiver => "receiver",
            TxRole::SenderReceiver => "sender/receiver",
            TxRole::Unknown => "unknown",
        };
        f.write_str(s)
    }
}
