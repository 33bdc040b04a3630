//! Canned market data provider for tests.
//!
//! Enabled for dependent crates through the `test-util` feature.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::sync::{Arc, Mutex};

use crate::error::FetchError;
use crate::provider::MarketDataProvider;
use crate::types::{PriceBar, PriceSeries};

/// Provider serving a fixed series and recording every request.
pub struct StaticProvider {
    bars: Vec<PriceBar>,
    failure: Option<FetchError>,
    pub calls: Mutex<Vec<String>>,
}

impl StaticProvider {
    /// Consecutive daily bars from 2024-01-01 with the given closes.
    pub fn with_closes(closes: &[f64]) -> Arc<Self> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_234_567,
            })
            .collect();

        Arc::new(Self {
            bars,
            failure: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(failure: FetchError) -> Arc<Self> {
        Arc::new(Self {
            bars: Vec::new(),
            failure: Some(failure),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn respond(&self, symbol: &str, call: String) -> Result<PriceSeries, FetchError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(PriceSeries::new(symbol, self.bars.clone())),
        }
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<PriceSeries, FetchError> {
        self.respond(symbol, format!("daily {} {} {:?}", symbol, start, end))
    }

    async fn fetch_latest(&self, symbol: &str) -> Result<Option<PriceBar>, FetchError> {
        self.respond(symbol, format!("latest {}", symbol))
            .map(|series| series.last().copied())
    }

    async fn fetch_period(&self, symbol: &str, period: &str) -> Result<PriceSeries, FetchError> {
        self.respond(symbol, format!("period {} {}", symbol, period))
    }
}
