use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use walletscout_core::config::{CheckConfig, TorConfig};
use walletscout_core::{CrawlError, NetworkDriver};

use crate::check::tor_exit_check;

/// Fetches hidden-service pages through a SOCKS proxy assumed to front a
/// Tor client. `socks5h` so hostname resolution happens proxy-side;
/// .onion names must never hit local DNS.
pub struct TorDriver {
    client: reqwest::Client,
    probe_timeout: Duration,
    request_timeout: Duration,
    check_url: String,
    check_timeout: Duration,
}

impl TorDriver {
    pub fn new(tor: &TorConfig, check: &CheckConfig) -> Result<Self, CrawlError> {
        let proxy = reqwest::Proxy::all(format!("socks5h://{}", tor.socks_proxy))
            .map_err(|e| CrawlError::Proxy(format!("bad proxy address {}: {e}", tor.socks_proxy)))?;

        let client = reqwest::Client::builder()
            .proxy(proxy)
            .user_agent(tor.user_agent.clone())
            // Hidden services routinely present self-signed certificates
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| CrawlError::Proxy(format!("failed to build proxied client: {e}")))?;

        Ok(Self {
            client,
            probe_timeout: Duration::from_secs(tor.probe_timeout_seconds),
            request_timeout: Duration::from_secs(tor.request_timeout_seconds),
            check_url: check.url.clone(),
            check_timeout: Duration::from_secs(check.timeout_seconds),
        })
    }
}

#[async_trait]
impl NetworkDriver for TorDriver {
    fn name(&self) -> &str {
        "tor"
    }

    fn can_handle(&self, url: &Url) -> bool {
        url.host_str()
            .map(|h| h.ends_with(".onion"))
            .unwrap_or(false)
    }

    async fn verify(&self) -> Result<(), CrawlError> {
        tor_exit_check(&self.client, &self.check_url, self.check_timeout).await
    }

    async fn fetch(&self, url: &Url) -> Option<String> {
        // Header-only probe first: skips the body cost for dead pages and
        // for anything that is not hypertext.
        let probe = match self
            .client
            .head(url.as_str())
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                debug!(url = %url, error = %e, "probe failed, page skipped");
                return None;
            }
        };

        if !probe.status().is_success() {
            debug!(url = %url, status = probe.status().as_u16(), "probe not OK, page skipped");
            return None;
        }

        let content_type = probe
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        if !is_hypertext(content_type) {
            debug!(url = %url, content_type = ?content_type, "not hypertext, body fetch skipped");
            return None;
        }

        let resp = match self
            .client
            .get(url.as_str())
            .timeout(self.request_timeout)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                debug!(url = %url, error = %e, "fetch failed, page skipped");
                return None;
            }
        };

        if !resp.status().is_success() {
            debug!(url = %url, status = resp.status().as_u16(), "fetch not OK, page skipped");
            return None;
        }

        let body = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(url = %url, error = %e, "body read failed, page skipped");
                return None;
            }
        };

        // Tolerant decode: invalid byte sequences are replaced, never fatal
        Some(String::from_utf8_lossy(&body).into_owned())
    }
}

/// A missing Content-Type header counts as "not hypertext": the full
/// fetch is only worth it when the probe promises HTML.
fn is_hypertext(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hypertext_gate() {
        assert!(is_hypertext(Some("text/html")));
        assert!(is_hypertext(Some("Text/HTML; charset=utf-8")));
        assert!(!is_hypertext(Some("application/json")));
        assert!(!is_hypertext(Some("image/png")));
        assert!(!is_hypertext(None));
    }

    #[test]
    fn handles_only_onion_hosts() {
        let driver = TorDriver::new(&TorConfig::default(), &CheckConfig::default()).unwrap();
        let onion = Url::parse(
            "http://zqktlwiuavvvqqt4ybvgvi7tyo4hjl5xgfuvpdf6otjiycgwqbym2qad.onion/wiki",
        )
        .unwrap();
        let clearnet = Url::parse("https://example.com/").unwrap();
        assert!(driver.can_handle(&onion));
        assert!(!driver.can_handle(&clearnet));
    }
}
