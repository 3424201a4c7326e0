use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use url::Url;

use crate::error::CrawlError;

/// Mapping from visited page URL to the wallet addresses found on it.
/// A page has an entry only if at least one valid address was found there.
pub type PageResults = HashMap<String, BTreeSet<String>>;

/// Immutable input for one crawl run. Seeds are validated at the CLI
/// boundary before this is constructed.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub seeds: Vec<Url>,
    pub min_wallets: usize,
}

/// Everything the engine reports to its host. Exactly one terminal event
/// (`Completed`, `Cancelled`, `ConnectionError` or `Error`) ends a run,
/// always last.
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// Progress text, e.g. which URL is being processed.
    Status(String),
    /// The discovered set grew; carries the new total.
    WalletFound(usize),
    /// Run finished normally; carries the accumulated page results.
    Completed(PageResults),
    /// Cooperative cancellation observed; accumulated results are discarded.
    Cancelled,
    /// Proxy or egress verification failed before/while crawling.
    ConnectionError(String),
    /// Unclassified failure mid-loop; the run aborts.
    Error(String),
}

impl CrawlEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CrawlEvent::Status(_) | CrawlEvent::WalletFound(_))
    }
}

/// The network seam the engine fetches through.
#[async_trait]
pub trait NetworkDriver: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Whether this driver can reach the given URL at all.
    fn can_handle(&self, url: &Url) -> bool;

    /// One-shot check that traffic actually egresses through the overlay
    /// network. Run before the first fetch of a session.
    async fn verify(&self) -> Result<(), CrawlError>;

    /// Fetch a page body as text. `None` covers every per-page failure:
    /// probe error, non-2xx, timeout, or a non-hypertext content type.
    /// A failed fetch is final for that URL within the run.
    async fn fetch(&self, url: &Url) -> Option<String>;
}
