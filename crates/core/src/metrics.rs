// Price statistics: simple moving average and annualized volatility

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{MetricsResult, PriceSeries};

/// Window of the moving average reported by `calculate_metrics`.
pub const SMA_WINDOW: usize = 20;

/// Trading days per year used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Arithmetic mean of the last `window` closes.
///
/// Returns `None` when the series holds fewer than `window` bars; the average
/// is never taken over a shorter window.
pub fn sma(series: &PriceSeries, window: usize) -> Option<f64> {
    if window == 0 || series.len() < window {
        return None;
    }

    let tail = &series.bars[series.len() - window..];
    let sum: f64 = tail.iter().map(|bar| bar.close).sum();
    Some(sum / window as f64)
}

/// `ln(close[i] / close[i-1])` for each consecutive pair of bars.
pub fn log_returns(series: &PriceSeries) -> Vec<f64> {
    series
        .bars
        .windows(2)
        .map(|pair| (pair[1].close / pair[0].close).ln())
        .collect()
}

/// Population standard deviation of log returns, scaled by sqrt(252).
///
/// Fewer than two bars has no returns to measure and is an error, as is any
/// non-positive close.
pub fn annualized_volatility(series: &PriceSeries) -> AnalysisResult<f64> {
    if series.len() < 2 {
        return Err(AnalysisError::computation(format!(
            "volatility requires at least 2 price bars, got {}",
            series.len()
        )));
    }

    if let Some(bar) = series
        .bars
        .iter()
        .find(|bar| !bar.close.is_finite() || bar.close <= 0.0)
    {
        return Err(AnalysisError::computation(format!(
            "invalid close {} on {}",
            bar.close, bar.date
        )));
    }

    let returns = log_returns(series);
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    Ok(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Derive SMA and volatility from one series snapshot.
pub fn compute_metrics(series: &PriceSeries) -> AnalysisResult<MetricsResult> {
    let last = series
        .last()
        .ok_or_else(|| AnalysisError::no_data(&series.symbol))?;

    Ok(MetricsResult {
        symbol: series.symbol.clone(),
        sma20: sma(series, SMA_WINDOW),
        volatility: annualized_volatility(series)?,
        as_of: last.as_of(),
    })
}
