use std::collections::BTreeSet;

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::wallets::find_wallets;

/// What one fetched page contributes to the crawl.
#[derive(Debug, Default)]
pub struct ProcessedPage {
    /// Validated wallet addresses found in the page's visible text.
    pub wallets: BTreeSet<String>,
    /// Absolute same-network links (host under `.onion`), deduplicated.
    pub links: BTreeSet<String>,
}

/// Parse page content, extract wallet addresses from its text and collect
/// hidden-service links resolved against `base_url`.
///
/// Malformed markup degrades to partial extraction: the HTML parser
/// recovers rather than failing, so this never aborts a run.
pub fn process_page(html: &str, base_url: &Url) -> ProcessedPage {
    if html.trim().is_empty() {
        return ProcessedPage::default();
    }

    let document = Html::parse_document(html);

    // All visible text, whitespace-collapsed
    let body_text = selector("body")
        .and_then(|s| document.select(&s).next())
        .map(|el| {
            el.text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let wallets = find_wallets(&body_text);
    let links = extract_onion_links(&document, base_url);
    if !wallets.is_empty() {
        debug!(url = %base_url, count = wallets.len(), "wallets on page");
    }

    ProcessedPage { wallets, links }
}

fn selector(s: &str) -> Option<Selector> {
    Selector::parse(s).ok()
}

fn extract_onion_links(document: &Html, base_url: &Url) -> BTreeSet<String> {
    let Some(sel) = selector("a[href]") else {
        return BTreeSet::new();
    };

    document
        .select(&sel)
        .filter_map(|el| {
            let href = el.value().attr("href")?;
            if href.is_empty() {
                return None;
            }
            let resolved = base_url.join(href).ok()?;
            let host = resolved.host_str()?;
            host.ends_with(".onion").then(|| resolved.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://exampleexampleexampleexampleexampleexampleexamplevtqd.onion/dir/")
            .unwrap()
    }

    #[test]
    fn extracts_wallets_from_visible_text() {
        let html = r#"
            <html><body>
                <p>Donate: 1BoatSLRHtKNngkdXEeobR76b53LETtpyT</p>
            </body></html>
        "#;
        let page = process_page(html, &base());
        assert!(page.wallets.contains("1BoatSLRHtKNngkdXEeobR76b53LETtpyT"));
        assert!(page.links.is_empty());
    }

    #[test]
    fn keeps_only_onion_links_and_resolves_relative_hrefs() {
        let html = r#"
            <body>
                <a href="/market">internal</a>
                <a href="page2.html">relative</a>
                <a href="http://otherotherotherotherotherotherotherotherotherotherothe2.onion/">other</a>
                <a href="https://example.com/clearnet">clearnet</a>
                <a href="mailto:admin@example.com">mail</a>
            </body>
        "#;
        let page = process_page(html, &base());
        let links: Vec<&str> = page.links.iter().map(String::as_str).collect();
        assert_eq!(links.len(), 3);
        assert!(page
            .links
            .iter()
            .any(|l| l.ends_with(".onion/market")));
        assert!(page.links.iter().any(|l| l.contains("/dir/page2.html")));
        assert!(page
            .links
            .iter()
            .any(|l| l.starts_with("http://otherother")));
    }

    #[test]
    fn empty_content_yields_empty_sets() {
        let page = process_page("", &base());
        assert!(page.wallets.is_empty());
        assert!(page.links.is_empty());
        let page = process_page("   \n  ", &base());
        assert!(page.wallets.is_empty());
    }

    #[test]
    fn malformed_markup_degrades_instead_of_failing() {
        let html = "<body><p>pay 1BoatSLRHtKNngkdXEeobR76b53LETtpyT <a href='/x'>unclosed";
        let page = process_page(html, &base());
        assert!(page.wallets.contains("1BoatSLRHtKNngkdXEeobR76b53LETtpyT"));
        assert_eq!(page.links.len(), 1);
    }

    #[test]
    fn duplicate_links_are_deduplicated() {
        let html = r#"
            <body>
                <a href="/a">one</a>
                <a href="/a">two</a>
            </body>
        "#;
        let page = process_page(html, &base());
        assert_eq!(page.links.len(), 1);
    }
}
