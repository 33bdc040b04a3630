//! # Yahoo Finance provider
//!
//! [`MarketDataProvider`](stockmcp_core::MarketDataProvider) implementation
//! backed by the Yahoo Finance chart API.
//!
//! ```rust,no_run
//! use stockmcp_core::MarketDataProvider;
//! use stockmcp_provider::YahooFinanceClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = YahooFinanceClient::builder()
//!     .timeout(std::time::Duration::from_secs(10))
//!     .build()?;
//!
//! let series = client.fetch_period("AAPL", "1mo").await?;
//! println!("{} bars", series.len());
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::{YahooFinanceClient, YahooFinanceClientBuilder};
pub use config::ProviderConfig;
pub use error::{ProviderError, ProviderResult};
