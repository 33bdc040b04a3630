//! Configuration types for the market data provider.

use std::time::Duration;
use url::Url;

/// Public Yahoo Finance chart API host.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo rejects requests without a browser-like agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Configuration for the Yahoo Finance client.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the chart API.
    pub base_url: Url,
    /// Per-request deadline.
    pub timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Rescale OHLC by the adjusted close (splits and dividends).
    pub auto_adjust: bool,
}

impl ProviderConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            auto_adjust: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_new() {
        let url = Url::parse("https://example.com").unwrap();
        let config = ProviderConfig::new(url.clone());

        assert_eq!(config.base_url, url);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_provider_config_defaults() {
        let config = ProviderConfig::new(Url::parse(DEFAULT_BASE_URL).unwrap());

        assert_eq!(config.base_url.as_str(), "https://query1.finance.yahoo.com/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.auto_adjust);
    }
}
