use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

/// Hidden-service URL shape: optional scheme, 56-character base32 label,
/// `.onion` suffix, optional path/query/fragment.
static ONION_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?://)?[a-z2-7]{56}\.onion([/?#].*)?$").unwrap());

pub fn is_onion_seed(candidate: &str) -> bool {
    ONION_URL_RE.is_match(candidate)
}

/// Validate user-supplied seed lines at the boundary, before the engine
/// ever sees them. Scheme-less seeds are normalized to `http://`.
/// Returns accepted URLs (input order kept) and the rejected raw lines.
pub fn parse_seeds(lines: impl IntoIterator<Item = String>) -> (Vec<Url>, Vec<String>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !is_onion_seed(line) {
            rejected.push(line.to_string());
            continue;
        }
        let with_scheme = if line.starts_with("http://") || line.starts_with("https://") {
            line.to_string()
        } else {
            format!("http://{line}")
        };
        match Url::parse(&with_scheme) {
            Ok(url) => accepted.push(url),
            Err(e) => {
                debug!(seed = line, error = %e, "seed matched the pattern but did not parse");
                rejected.push(line.to_string());
            }
        }
    }

    (accepted, rejected)
}
