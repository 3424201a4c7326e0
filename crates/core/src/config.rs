use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub tor: TorConfig,
    pub check: CheckConfig,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    /// Delay between crawl iterations, bounding the request rate.
    pub pace_delay_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { pace_delay_ms: 200 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TorConfig {
    /// host:port of the SOCKS proxy; DNS resolution happens proxy-side.
    pub socks_proxy: String,
    pub probe_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for TorConfig {
    fn default() -> Self {
        Self {
            socks_proxy: "127.0.0.1:9050".to_string(),
            probe_timeout_seconds: 20,
            request_timeout_seconds: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; rv:109.0) Gecko/20100101 Firefox/115.0"
                .to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CheckConfig {
    /// Endpoint reporting whether our egress IP belongs to the Tor exit set.
    pub url: String,
    pub timeout_seconds: u64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            url: "https://check.torproject.org/api/ip".to_string(),
            timeout_seconds: 20,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LedgerConfig {
    pub api_url: String,
    pub timeout_seconds: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.blockcypher.com/v1/btc/main".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_constants() {
        let config = AppConfig::default();
        assert_eq!(config.general.pace_delay_ms, 200);
        assert_eq!(config.tor.probe_timeout_seconds, 20);
        assert_eq!(config.tor.request_timeout_seconds, 30);
        assert_eq!(config.check.timeout_seconds, 20);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [tor]
            socks_proxy = "tor1:9050"
            "#,
        )
        .unwrap();
        assert_eq!(config.tor.socks_proxy, "tor1:9050");
        assert_eq!(config.tor.request_timeout_seconds, 30);
        assert_eq!(config.general.pace_delay_ms, 200);
    }
}
