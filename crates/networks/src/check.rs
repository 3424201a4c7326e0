use std::time::Duration;

use tracing::info;

use walletscout_core::CrawlError;

/// Ask the trusted verification endpoint whether our egress IP belongs to
/// the Tor exit set. The request must go through the same proxied client
/// the crawl uses, otherwise the answer is meaningless.
pub async fn tor_exit_check(
    client: &reqwest::Client,
    check_url: &str,
    timeout: Duration,
) -> Result<(), CrawlError> {
    let resp = client
        .get(check_url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| {
            CrawlError::Connection(format!("could not reach the Tor verification API ({e})"))
        })?;

    let body: serde_json::Value = resp
        .json()
        .await
        .map_err(|e| CrawlError::Connection(format!("malformed verification response ({e})")))?;

    if is_tor_exit(&body) {
        info!("egress verified: traffic is routed through the Tor network");
        Ok(())
    } else {
        Err(CrawlError::Connection(
            "the egress IP does not belong to the Tor network".to_string(),
        ))
    }
}

fn is_tor_exit(body: &serde_json::Value) -> bool {
    body.get("IsTor").and_then(|v| v.as_bool()).unwrap_or(false)
}
