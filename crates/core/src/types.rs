// Market data types shared by the provider adapter, the calculator and the formatter

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// One trading day's OHLCV record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Exchange-local trading date
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Timestamp of the bar. Daily bars are stamped at exchange-local midnight.
    pub fn as_of(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }
}

/// Daily bars for a single symbol, ascending by date.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, sorting by date and keeping the last bar seen for any repeated date.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        // stable sort keeps arrival order within a date
        bars.sort_by_key(|bar| bar.date);
        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: deduped,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|bar| bar.close)
    }
}

/// Latest price and volume for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub price: f64,
    pub volume: u64,
    pub as_of: NaiveDateTime,
}

impl QuoteSnapshot {
    pub fn from_bar(symbol: impl Into<String>, bar: &PriceBar) -> Self {
        Self {
            symbol: symbol.into(),
            price: bar.close,
            volume: bar.volume,
            as_of: bar.as_of(),
        }
    }
}

/// Statistics derived from a single price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    pub symbol: String,
    /// 20-day simple moving average, absent below 20 bars
    pub sma20: Option<f64>,
    pub volatility: f64,
    pub as_of: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn test_series_sorted_ascending() {
        let series = PriceSeries::new(
            "AAPL",
            vec![bar("2024-01-03", 3.0), bar("2024-01-01", 1.0), bar("2024-01-02", 2.0)],
        );

        let closes: Vec<f64> = series.closes().collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_series_keeps_last_bar_for_duplicate_date() {
        let series = PriceSeries::new(
            "AAPL",
            vec![bar("2024-01-01", 1.0), bar("2024-01-02", 2.0), bar("2024-01-02", 2.5)],
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().close, 2.5);
    }

    #[test]
    fn test_bar_as_of_is_midnight() {
        let b = bar("2024-03-15", 10.0);
        assert_eq!(b.as_of().format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-15 00:00:00");
    }

    #[test]
    fn test_snapshot_from_bar() {
        let b = bar("2024-03-15", 187.456);
        let snapshot = QuoteSnapshot::from_bar("AAPL", &b);

        assert_eq!(snapshot.symbol, "AAPL");
        assert_eq!(snapshot.price, 187.456);
        assert_eq!(snapshot.volume, 1_000);
        assert_eq!(snapshot.as_of, b.as_of());
    }
}
