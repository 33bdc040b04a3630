//! Provider abstraction for market data sources.
//!
//! [`MarketDataProvider`] is the seam between the analysis pipeline and a
//! concrete vendor adapter. It is object-safe so tools can share one
//! `Arc<dyn MarketDataProvider>` chosen at startup.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::FetchError;
use crate::types::{PriceBar, PriceSeries};

/// Source of daily price bars.
///
/// An empty result is not an error: implementations return an empty
/// [`PriceSeries`] (or `None`) when the vendor has no rows for the request.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars dated `start <= date < end` on the exchange's calendar.
    /// `end` defaults to now.
    ///
    /// An inverted range is passed to the vendor unchanged.
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<PriceSeries, FetchError>;

    /// The most recent daily bar.
    async fn fetch_latest(&self, symbol: &str) -> Result<Option<PriceBar>, FetchError>;

    /// Daily bars for a vendor range shorthand such as `"1mo"` or `"1y"`.
    async fn fetch_period(&self, symbol: &str, period: &str) -> Result<PriceSeries, FetchError>;
}
