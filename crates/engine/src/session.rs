use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use walletscout_core::{CrawlEvent, CrawlRequest, NetworkDriver};

use crate::engine::{CrawlEngine, EngineOptions};

/// Host-facing handle for one crawl run.
///
/// The engine runs on its own tokio task; this side holds the receiving
/// end of the event channel and the cancellation token. Events arrive in
/// the order the engine produced them, ending with exactly one terminal
/// event, after which the channel closes.
pub struct CrawlSession {
    events: mpsc::UnboundedReceiver<CrawlEvent>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl CrawlSession {
    /// Launch the engine and return immediately.
    pub fn spawn<D: NetworkDriver>(
        request: CrawlRequest,
        driver: D,
        options: EngineOptions,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let engine = CrawlEngine::new(request, driver, options, tx, cancel.clone());
        let task = tokio::spawn(engine.run());
        Self {
            events: rx,
            cancel,
            task,
        }
    }

    /// Request cooperative cancellation. The engine observes the flag at
    /// the top of its next iteration; an in-flight fetch is allowed to
    /// finish first (bounded by the fetch timeouts).
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clone of the cancellation token, for hosts that wire cancellation
    /// to a signal handler on another task.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Await the next event. `None` once the engine is done and the
    /// channel has drained.
    pub async fn next_event(&mut self) -> Option<CrawlEvent> {
        self.events.recv().await
    }

    /// Non-blocking receive for polling hosts.
    pub fn try_next_event(&mut self) -> Result<CrawlEvent, TryRecvError> {
        self.events.try_recv()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the engine task itself to wind down.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}
