pub mod client;
pub mod error;
pub mod export;
pub mod types;

pub use client::LedgerClient;
pub use error::LedgerError;
pub use export::export_transactions_csv;
pub use types::{TxParty, TxRole, WalletSummary, WalletTransaction};
