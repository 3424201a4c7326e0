use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    /// Proxy or egress verification unreachable. Fatal to the run.
    #[error("connection error: {0}")]
    Connection(String),

    #[error("proxy error: {0}")]
    Proxy(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}
