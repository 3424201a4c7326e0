use std::collections::{HashSet, VecDeque};

use tracing::debug;
use url::Url;

/// FIFO crawl frontier with idempotent enqueue.
///
/// Owned exclusively by the crawl engine for one run: no locking, no
/// cross-run state. Insertion order is significant (breadth-first bias).
/// A URL makes it into the queue at most once, and once visited it is
/// never re-enqueued within the run.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,
    /// Normalized keys of URLs currently waiting in `queue`.
    pending: HashSet<String>,
    /// Normalized keys of URLs already dequeued and processed. Monotonic.
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frontier pre-loaded with seed URLs, in order, deduplicated.
    pub fn with_seeds<I: IntoIterator<Item = Url>>(seeds: I) -> Self {
        let mut frontier = Self::new();
        let mut added = 0usize;
        for seed in seeds {
            if frontier.enqueue(seed) {
                added += 1;
            }
        }
        debug!(added, "seeded frontier");
        frontier
    }

    /// Dedup key: fragment stripped, trailing slash trimmed. `Url` parsing
    /// already lowercases the host.
    fn normalize(url: &Url) -> String {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        let path = normalized.path().to_string();
        if path.len() > 1 && path.ends_with('/') {
            normalized.set_path(&path[..path.len() - 1]);
        }
        normalized.to_string()
    }

    /// Append a URL unless it was already visited or is already waiting.
    /// Returns whether it was actually added.
    pub fn enqueue(&mut self, url: Url) -> bool {
        let key = Self::normalize(&url);
        if self.visited.contains(&key) || !self.pending.insert(key) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Remove and return the oldest pending URL.
    pub fn dequeue(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.pending.remove(&Self::normalize(&url));
        Some(url)
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(&Self::normalize(url))
    }

    /// Record that a URL has been processed. Returns false if it already was.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(Self::normalize(url))
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn dequeues_in_insertion_order() {
        let mut frontier = Frontier::with_seeds([
            url("http://a.onion/"),
            url("http://b.onion/"),
            url("http://c.onion/"),
        ]);
        assert_eq!(frontier.dequeue().unwrap().host_str(), Some("a.onion"));
        assert_eq!(frontier.dequeue().unwrap().host_str(), Some("b.onion"));
        assert_eq!(frontier.dequeue().unwrap().host_str(), Some("c.onion"));
        assert!(frontier.dequeue().is_none());
    }

    #[test]
    fn enqueue_is_idempotent_while_pending() {
        let mut frontier = Frontier::new();
        assert!(frontier.enqueue(url("http://a.onion/page")));
        assert!(!frontier.enqueue(url("http://a.onion/page")));
        // Fragment and trailing slash do not defeat dedup
        assert!(!frontier.enqueue(url("http://a.onion/page#top")));
        assert_eq!(frontier.pending_len(), 1);
    }

    #[test]
    fn visited_urls_are_never_reenqueued() {
        let mut frontier = Frontier::with_seeds([url("http://a.onion/")]);
        let first = frontier.dequeue().unwrap();
        assert!(frontier.mark_visited(&first));
        assert!(!frontier.mark_visited(&first));
        assert!(!frontier.enqueue(first));
        assert!(frontier.is_empty());
        assert_eq!(frontier.visited_len(), 1);
    }

    #[test]
    fn visited_count_is_monotonic() {
        let mut frontier = Frontier::new();
        for i in 0..5 {
            let u = url(&format!("http://site.onion/{i}"));
            frontier.enqueue(u);
        }
        let mut last = 0;
        while let Some(u) = frontier.dequeue() {
            frontier.mark_visited(&u);
            assert!(frontier.visited_len() > last);
            last = frontier.visited_len();
        }
        assert_eq!(last, 5);
    }
}
