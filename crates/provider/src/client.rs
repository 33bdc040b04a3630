//! Yahoo Finance chart client.

use crate::chart::ChartResponse;
use crate::config::{ProviderConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::error::{ProviderError, ProviderResult, NOT_FOUND_CODE};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use stockmcp_core::{FetchError, MarketDataProvider, PriceBar, PriceSeries};
use url::Url;

const CHART_PATH: &str = "v8/finance/chart/";

/// Client for the Yahoo Finance chart endpoint.
#[derive(Clone)]
pub struct YahooFinanceClient {
    config: Arc<ProviderConfig>,
    http: HttpTransport,
}

impl YahooFinanceClient {
    /// Create a new client builder.
    pub fn builder() -> YahooFinanceClientBuilder {
        YahooFinanceClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ProviderConfig) -> ProviderResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Daily bars dated `start <= date < end` in the exchange's timezone.
    ///
    /// Without `end` the window runs to now. The request is widened by a day on
    /// each side because the exchange offset is only known from the response.
    pub async fn daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> ProviderResult<PriceSeries> {
        let period1 = midnight_utc(start.pred_opt().unwrap_or(start));
        let period2 = match end {
            Some(end) => midnight_utc(end.succ_opt().unwrap_or(end)),
            None => Utc::now().timestamp(),
        };

        let mut series = self
            .chart(
                symbol,
                vec![
                    ("period1", period1.to_string()),
                    ("period2", period2.to_string()),
                ],
            )
            .await?;

        series
            .bars
            .retain(|bar| bar.date >= start && end.map_or(true, |end| bar.date < end));
        Ok(series)
    }

    /// Daily bars for a range shorthand such as `"1mo"` or `"1y"`.
    pub async fn period(&self, symbol: &str, period: &str) -> ProviderResult<PriceSeries> {
        self.chart(symbol, vec![("range", period.to_string())]).await
    }

    /// Last bar of the one-day range.
    pub async fn latest(&self, symbol: &str) -> ProviderResult<Option<PriceBar>> {
        let series = self.period(symbol, "1d").await?;
        Ok(series.last().copied())
    }

    async fn chart(
        &self,
        symbol: &str,
        mut query: Vec<(&'static str, String)>,
    ) -> ProviderResult<PriceSeries> {
        let request_symbol = symbol.trim().to_uppercase();
        let url = self
            .http
            .build_url_with_segment(CHART_PATH, &request_symbol)?;

        query.push(("interval", "1d".to_string()));
        query.push(("events", "div|split".to_string()));
        query.push(("includeAdjustedClose", "true".to_string()));

        let response: ChartResponse = match self.http.get_with_query(url, &query).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                tracing::debug!(symbol = %request_symbol, "Symbol not found upstream");
                return Ok(PriceSeries::empty(symbol));
            }
            Err(e) => return Err(e),
        };

        if let Some(error) = response.chart.error {
            if error.code == NOT_FOUND_CODE {
                return Ok(PriceSeries::empty(symbol));
            }
            return Err(ProviderError::Api {
                status: 200,
                code: Some(error.code),
                message: error.description,
            });
        }

        let bars = response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .map(|result| result.into_bars(self.config.auto_adjust))
            .unwrap_or_default();

        tracing::debug!(symbol = %request_symbol, bars = bars.len(), "Chart response decoded");

        Ok(PriceSeries::new(symbol, bars))
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<PriceSeries, FetchError> {
        Ok(self.daily(symbol, start, end).await?)
    }

    async fn fetch_latest(&self, symbol: &str) -> Result<Option<PriceBar>, FetchError> {
        Ok(self.latest(symbol).await?)
    }

    async fn fetch_period(&self, symbol: &str, period: &str) -> Result<PriceSeries, FetchError> {
        Ok(self.period(symbol, period).await?)
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Builder for creating a YahooFinanceClient.
pub struct YahooFinanceClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
    auto_adjust: bool,
}

impl YahooFinanceClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            auto_adjust: true,
        }
    }

    /// Set the base URL of the chart API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Enable or disable split/dividend adjustment.
    pub fn auto_adjust(mut self, enabled: bool) -> Self {
        self.auto_adjust = enabled;
        self
    }

    /// Build the client.
    pub fn build(self) -> ProviderResult<YahooFinanceClient> {
        let base_url = Url::parse(&self.base_url)?;

        YahooFinanceClient::from_config(ProviderConfig {
            base_url,
            timeout: self.timeout,
            user_agent: self.user_agent,
            auto_adjust: self.auto_adjust,
        })
    }
}

impl Default for YahooFinanceClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
