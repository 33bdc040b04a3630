//! Fetch-then-compute pipelines behind each tool.
//!
//! Each function performs exactly one provider call and derives every value
//! from that single series, returning a typed error that the caller renders.

use chrono::NaiveDate;
use std::time::Instant;

use crate::error::{AnalysisError, AnalysisResult};
use crate::metrics::compute_metrics;
use crate::provider::MarketDataProvider;
use crate::types::{MetricsResult, PriceSeries, QuoteSnapshot};

/// Date format accepted by tool arguments.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Period used by `calculate_metrics` when none is given.
pub const DEFAULT_PERIOD: &str = "1y";

/// Trim and reject an empty ticker.
pub fn validate_ticker(ticker: &str) -> AnalysisResult<&str> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(AnalysisError::invalid_input("ticker symbol must not be empty"));
    }
    Ok(ticker)
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(value: &str) -> AnalysisResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        AnalysisError::invalid_input(format!(
            "date '{}' does not match format YYYY-MM-DD ({})",
            value, e
        ))
    })
}

/// Latest close and volume.
pub async fn latest_quote(
    provider: &dyn MarketDataProvider,
    ticker: &str,
) -> AnalysisResult<QuoteSnapshot> {
    let symbol = validate_ticker(ticker)?;
    let started = Instant::now();

    let bar = provider
        .fetch_latest(symbol)
        .await
        .map_err(|e| fetch_failed(symbol, e))?
        .ok_or_else(|| AnalysisError::no_data(symbol))?;

    tracing::debug!(
        symbol,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Fetched latest bar"
    );

    Ok(QuoteSnapshot::from_bar(symbol, &bar))
}

/// Daily bars between two dates; `end_date` defaults to today.
pub async fn daily_history(
    provider: &dyn MarketDataProvider,
    ticker: &str,
    start_date: &str,
    end_date: Option<&str>,
) -> AnalysisResult<PriceSeries> {
    let symbol = validate_ticker(ticker)?;
    let start = parse_date(start_date)?;
    let end = end_date.map(parse_date).transpose()?;
    let started = Instant::now();

    let mut series = provider
        .fetch_daily(symbol, start, end)
        .await
        .map_err(|e| fetch_failed(symbol, e))?;

    tracing::debug!(
        symbol,
        bars = series.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Fetched daily history"
    );

    if series.is_empty() {
        return Err(AnalysisError::no_data(symbol));
    }

    series.symbol = symbol.to_string();
    Ok(series)
}

/// SMA and volatility over a provider range shorthand such as `"1y"`.
pub async fn period_metrics(
    provider: &dyn MarketDataProvider,
    ticker: &str,
    period: &str,
) -> AnalysisResult<MetricsResult> {
    let symbol = validate_ticker(ticker)?;
    let started = Instant::now();

    let mut series = provider
        .fetch_period(symbol, period)
        .await
        .map_err(|e| fetch_failed(symbol, e))?;

    tracing::debug!(
        symbol,
        period,
        bars = series.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Fetched period series"
    );

    series.symbol = symbol.to_string();
    compute_metrics(&series)
}

fn fetch_failed(symbol: &str, source: crate::error::FetchError) -> AnalysisError {
    tracing::warn!(symbol, error = %source, "Market data fetch failed");
    AnalysisError::fetch(symbol, source)
}
