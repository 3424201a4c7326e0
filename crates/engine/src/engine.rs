use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::bail;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use walletscout_core::{CrawlEvent, CrawlRequest, NetworkDriver, PageResults};
use walletscout_frontier::Frontier;
use walletscout_parser::process_page;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Fixed delay between iterations, bounding the request rate against
    /// the overlay network.
    pub pace_delay: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            pace_delay: Duration::from_millis(200),
        }
    }
}

enum Terminal {
    Completed,
    Cancelled,
}

/// Drives one crawl run: verifies the proxy egress, then walks the
/// frontier breadth-first until the requested number of wallets has been
/// discovered, the frontier runs dry, cancellation is observed, or an
/// unclassified failure aborts the run.
///
/// All per-run state lives here and is dropped with the engine; events on
/// the channel are the only output. Exactly one terminal event is emitted,
/// always last.
pub struct CrawlEngine<D: NetworkDriver> {
    driver: D,
    request: CrawlRequest,
    pace_delay: Duration,
    events: mpsc::UnboundedSender<CrawlEvent>,
    cancel: CancellationToken,
    frontier: Frontier,
    discovered: BTreeSet<String>,
    results: PageResults,
}

impl<D: NetworkDriver> CrawlEngine<D> {
    pub fn new(
        request: CrawlRequest,
        driver: D,
        options: EngineOptions,
        events: mpsc::UnboundedSender<CrawlEvent>,
        cancel: CancellationToken,
    ) -> Self {
        let frontier = Frontier::with_seeds(request.seeds.iter().cloned());
        Self {
            driver,
            request,
            pace_delay: options.pace_delay,
            events,
            cancel,
            frontier,
            discovered: BTreeSet::new(),
            results: PageResults::new(),
        }
    }

    pub async fn run(mut self) {
        info!(
            driver = self.driver.name(),
            seeds = self.frontier.pending_len(),
            min_wallets = self.request.min_wallets,
            "verifying network egress"
        );
        if let Err(e) = self.driver.verify().await {
            warn!(error = %e, "egress verification failed");
            self.emit(CrawlEvent::ConnectionError(e.to_string()));
            return;
        }

        match self.crawl_loop().await {
            Ok(Terminal::Completed) => {
                let results = std::mem::take(&mut self.results);
                info!(
                    visited = self.frontier.visited_len(),
                    wallets = self.discovered.len(),
                    pages_with_wallets = results.len(),
                    "crawl completed"
                );
                self.emit(CrawlEvent::Completed(results));
            }
            Ok(Terminal::Cancelled) => {
                // Accumulated results are discarded, not delivered
                info!(visited = self.frontier.visited_len(), "crawl cancelled");
                self.emit(CrawlEvent::Cancelled);
            }
            Err(e) => {
                warn!(error = %e, "crawl aborted");
                self.emit(CrawlEvent::Error(e.to_string()));
            }
        }
    }

    async fn crawl_loop(&mut self) -> anyhow::Result<Terminal> {
        loop {
            // Cooperative cancellation, observed once per iteration
            if self.cancel.is_cancelled() {
                return Ok(Terminal::Cancelled);
            }

            if self.discovered.len() >= self.request.min_wallets {
                return Ok(Terminal::Completed);
            }
            let Some(url) = self.frontier.dequeue() else {
                return Ok(Terminal::Completed);
            };

            if self.frontier.is_visited(&url) {
                continue;
            }
            self.emit(CrawlEvent::Status(format!("processing {url}")));
            self.frontier.mark_visited(&url);

            self.visit(&url).await?;

            tokio::time::sleep(self.pace_delay).await;
        }
    }

    /// Fetch and process one page, fold its wallets and links into the
    /// run state. Per-page fetch failures are absorbed as "unreachable".
    async fn visit(&mut self, url: &Url) -> anyhow::Result<()> {
        if !self.driver.can_handle(url) {
            // Seeds and links are filtered at their boundaries, so this is
            // a genuine programming error, not a transient condition.
            bail!("no driver for URL {url}");
        }

        let Some(content) = self.driver.fetch(url).await else {
            debug!(url = %url, "page unreachable or not hypertext");
            return Ok(());
        };

        let page = process_page(&content, url);

        if !page.wallets.is_empty() {
            let grew = page
                .wallets
                .iter()
                .any(|w| !self.discovered.contains(w));
            self.results.insert(url.to_string(), page.wallets.clone());
            if grew {
                self.discovered.extend(page.wallets);
                self.emit(CrawlEvent::WalletFound(self.discovered.len()));
            }
        }

        for link in page.links {
            match Url::parse(&link) {
                Ok(link) => {
                    self.frontier.enqueue(link);
                }
                Err(e) => debug!(link = %link, error = %e, "dropping unparseable link"),
            }
        }

        Ok(())
    }

    fn emit(&self, event: CrawlEvent) {
        if self.events.send(event).is_err() {
            debug!("event channel closed, host went away");
        }
    }
}
