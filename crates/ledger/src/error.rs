use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ledger API returned {status} for {address}")]
    Api { status: u16, address: String },

    #[error("export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
