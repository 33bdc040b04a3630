//! Chart API response types and their conversion into [`PriceBar`]s.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use stockmcp_core::PriceBar;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Absent when the range holds no trading days.
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub exchange_timezone_name: Option<String>,
    /// Exchange UTC offset in seconds
    #[serde(default)]
    pub gmtoffset: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
    #[serde(default)]
    pub adjclose: Vec<AdjCloseIndicator>,
}

/// Column-oriented OHLCV arrays; any entry may be null.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteIndicator {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdjCloseIndicator {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

/// Timezone used to turn bar timestamps into trading dates.
#[derive(Debug, Clone, Copy)]
enum ExchangeZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ExchangeZone {
    fn from_meta(meta: &ChartMeta) -> Self {
        if let Some(tz) = meta
            .exchange_timezone_name
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
        {
            return Self::Named(tz);
        }

        let offset = meta
            .gmtoffset
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self::Fixed(offset)
    }

    fn local_date(&self, timestamp: i64) -> Option<NaiveDate> {
        let utc = DateTime::<Utc>::from_timestamp(timestamp, 0)?;
        Some(match self {
            Self::Named(tz) => utc.with_timezone(tz).date_naive(),
            Self::Fixed(offset) => utc.with_timezone(offset).date_naive(),
        })
    }
}

impl ChartResult {
    /// Flatten the column arrays into bars.
    ///
    /// Rows without a close are dropped. With `auto_adjust`, OHLC are scaled by
    /// `adjclose / close` so the series reflects splits and dividends.
    pub fn into_bars(self, auto_adjust: bool) -> Vec<PriceBar> {
        let zone = ExchangeZone::from_meta(&self.meta);
        let timestamps = self.timestamp.unwrap_or_default();
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();
        let adjclose = self
            .indicators
            .adjclose
            .into_iter()
            .next()
            .map(|a| a.adjclose)
            .unwrap_or_default();

        let at = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

        timestamps
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let close = at(&quote.close, i).filter(|c| c.is_finite())?;
                let date = zone.local_date(ts)?;

                let mut bar = PriceBar {
                    date,
                    open: at(&quote.open, i).unwrap_or(close),
                    high: at(&quote.high, i).unwrap_or(close),
                    low: at(&quote.low, i).unwrap_or(close),
                    close,
                    volume: at(&quote.volume, i)
                        .filter(|v| v.is_finite() && *v > 0.0)
                        .map(|v| v as u64)
                        .unwrap_or(0),
                };

                if auto_adjust {
                    if let Some(adj) = at(&adjclose, i).filter(|a| a.is_finite()) {
                        if close != 0.0 {
                            let ratio = adj / close;
                            bar.open *= ratio;
                            bar.high *= ratio;
                            bar.low *= ratio;
                            bar.close = adj;
                        }
                    }
                }

                Some(bar)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(json: serde_json::Value) -> ChartResult {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_parse_minimal_result() {
        let r = result(serde_json::json!({
            "meta": {"symbol": "AAPL", "exchangeTimezoneName": "America/New_York", "gmtoffset": -14400},
            "timestamp": [1710509400],
            "indicators": {
                "quote": [{"open": [171.0], "high": [172.5], "low": [170.1], "close": [172.0], "volume": [52164503]}],
                "adjclose": [{"adjclose": [172.0]}]
            }
        }));

        assert_eq!(r.meta.symbol.as_deref(), Some("AAPL"));
        assert_eq!(r.meta.gmtoffset, Some(-14400));

        let bars = r.into_bars(true);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(bars[0].close, 172.0);
        assert_eq!(bars[0].volume, 52_164_503);
    }

    #[test]
    fn test_missing_timestamp_is_empty() {
        let r = result(serde_json::json!({
            "meta": {"symbol": "AAPL"},
            "indicators": {"quote": [{}]}
        }));

        assert!(r.into_bars(true).is_empty());
    }

    #[test]
    fn test_null_close_rows_dropped() {
        let r = result(serde_json::json!({
            "meta": {"exchangeTimezoneName": "America/New_York"},
            "timestamp": [1710336600, 1710423000, 1710509400],
            "indicators": {"quote": [{
                "open": [1.0, null, 3.0],
                "high": [1.0, null, 3.0],
                "low": [1.0, null, 3.0],
                "close": [1.0, null, 3.0],
                "volume": [10, null, null]
            }]}
        }));

        let bars = r.into_bars(false);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 1.0);
        assert_eq!(bars[1].close, 3.0);
        assert_eq!(bars[1].volume, 0);
    }

    #[test]
    fn test_dates_use_exchange_timezone() {
        // 02:00 UTC on the 15th is still the 14th in New York
        let r = result(serde_json::json!({
            "meta": {"exchangeTimezoneName": "America/New_York"},
            "timestamp": [1710468000],
            "indicators": {"quote": [{"close": [10.0]}]}
        }));

        let bars = r.into_bars(false);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
        assert_eq!(bars[0].open, 10.0);
    }

    #[test]
    fn test_gmtoffset_fallback() {
        let r = result(serde_json::json!({
            "meta": {"exchangeTimezoneName": "Not/AZone", "gmtoffset": -14400},
            "timestamp": [1710468000],
            "indicators": {"quote": [{"close": [10.0]}]}
        }));

        let bars = r.into_bars(false);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
    }

    #[test]
    fn test_utc_when_no_zone_info() {
        let r = result(serde_json::json!({
            "meta": {},
            "timestamp": [1710468000],
            "indicators": {"quote": [{"close": [10.0]}]}
        }));

        let bars = r.into_bars(false);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_auto_adjust_scales_ohlc() {
        let json = serde_json::json!({
            "meta": {"exchangeTimezoneName": "America/New_York"},
            "timestamp": [1710509400],
            "indicators": {
                "quote": [{"open": [200.0], "high": [210.0], "low": [190.0], "close": [200.0], "volume": [5]}],
                "adjclose": [{"adjclose": [100.0]}]
            }
        });

        let adjusted = result(json.clone()).into_bars(true);
        assert_eq!(adjusted[0].open, 100.0);
        assert_eq!(adjusted[0].high, 105.0);
        assert_eq!(adjusted[0].low, 95.0);
        assert_eq!(adjusted[0].close, 100.0);

        let raw = result(json).into_bars(false);
        assert_eq!(raw[0].close, 200.0);
        assert_eq!(raw[0].high, 210.0);
    }

    #[test]
    fn test_chart_error_envelope() {
        let body: ChartResponse = serde_json::from_str(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        )
        .unwrap();

        assert!(body.chart.result.is_none());
        assert_eq!(body.chart.error.unwrap().code, "Not Found");
    }
}
