use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stockmcp_core::format::DEFAULT_HISTORY_LIMIT;
use stockmcp_core::Formatter;
use stockmcp_provider::config::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use stockmcp_provider::YahooFinanceClient;

/// Settings read from `stockmcp.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// File the settings were read from; `None` when running on defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,

    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub history: HistorySettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_true")]
    pub auto_adjust: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySettings {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default)]
    pub show_truncation_notice: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_entries() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            auto_adjust: true,
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            show_truncation_notice: false,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load the config file, falling back to defaults when it does not exist.
    ///
    /// Runs before logging is installed; check `source` to report which case applied.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read configuration file {}", config_path.display()))?;
        let mut config: Self =
            toml::from_str(&content).context("Failed to parse configuration file")?;

        if config.provider.timeout_secs == 0 {
            anyhow::bail!("provider.timeout_secs must be greater than zero");
        }

        config.source = Some(config_path.to_path_buf());
        Ok(config)
    }

    /// Apply command-line overrides on top of the file settings.
    pub fn apply_overrides(&mut self, provider_url: Option<String>, log_level: Option<String>) {
        if let Some(url) = provider_url {
            self.provider.base_url = url;
        }
        if let Some(level) = log_level {
            self.logging.level = level;
        }
    }

    pub fn formatter(&self) -> Formatter {
        Formatter::new(self.history.max_entries, self.history.show_truncation_notice)
    }

    /// Yahoo Finance client configured from the `[provider]` section
    pub fn build_provider(&self) -> Result<YahooFinanceClient> {
        YahooFinanceClient::builder()
            .base_url(self.provider.base_url.as_str())
            .timeout(Duration::from_secs(self.provider.timeout_secs))
            .user_agent(self.provider.user_agent.as_str())
            .auto_adjust(self.provider.auto_adjust)
            .build()
            .with_context(|| format!("Invalid provider base URL '{}'", self.provider.base_url))
    }
}
