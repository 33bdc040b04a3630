//! Text rendering for quotes, history listings, metrics and failures.
//!
//! Every block starts and ends with a newline so clients see the same layout
//! the server has always produced. Nothing here can fail.

use chrono::NaiveDateTime;
use std::fmt::Write;

use crate::error::AnalysisError;
use crate::types::{MetricsResult, PriceSeries, QuoteSnapshot};

/// Number of history rows shown by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SMA_UNAVAILABLE: &str = "unavailable (fewer than 20 trading days)";

/// The operation a failure message is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Quote,
    History,
    Metrics,
}

/// Renders results into the fixed text templates returned by the tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    /// Maximum history rows rendered.
    pub history_limit: usize,
    /// Append a count of the rows dropped beyond `history_limit`.
    pub show_truncation_notice: bool,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            show_truncation_notice: false,
        }
    }
}

impl Formatter {
    pub fn new(history_limit: usize, show_truncation_notice: bool) -> Self {
        Self {
            history_limit,
            show_truncation_notice,
        }
    }

    pub fn snapshot(&self, quote: &QuoteSnapshot) -> String {
        format!(
            "\nSymbol: {}\nLatest Price: ${:.2}\nVolume: {}\nTimestamp: {}\n",
            quote.symbol,
            quote.price,
            format_volume(quote.volume),
            format_timestamp(&quote.as_of)
        )
    }

    /// Chronological closes, cut at `history_limit` rows.
    pub fn history(&self, series: &PriceSeries) -> String {
        let mut out = format!("\nSymbol: {}\nHistorical Data:\n", series.symbol);

        for bar in series.bars.iter().take(self.history_limit) {
            let _ = writeln!(
                out,
                "Date: {}, Close: ${:.2}",
                bar.date.format("%Y-%m-%d"),
                bar.close
            );
        }

        let hidden = series.len().saturating_sub(self.history_limit);
        if self.show_truncation_notice && hidden > 0 {
            let _ = writeln!(out, "... and {} more entries", hidden);
        }

        out
    }

    pub fn metrics(&self, metrics: &MetricsResult) -> String {
        let sma = match metrics.sma20 {
            Some(value) => format!("${:.2}", value),
            None => SMA_UNAVAILABLE.to_string(),
        };

        format!(
            "\nSymbol: {}\n20-Day SMA: {}\nAnnualized Volatility: {:.4}\nTimestamp: {}\n",
            metrics.symbol,
            sma,
            metrics.volatility,
            format_timestamp(&metrics.as_of)
        )
    }

    /// Single-line text for a failed operation.
    ///
    /// `NoData` is informational and carries no "Error" prefix.
    pub fn failure(&self, operation: Operation, ticker: &str, error: &AnalysisError) -> String {
        match (operation, error) {
            (Operation::History, AnalysisError::NoData { .. }) => format!(
                "No data available for ticker {} in the specified date range.",
                ticker
            ),
            (_, AnalysisError::NoData { .. }) => {
                format!("No data available for ticker {}.", ticker)
            }
            (Operation::Quote, _) => format!("Error fetching data for {}: {}", ticker, error),
            (Operation::History, _) => {
                format!("Error fetching historical data for {}: {}", ticker, error)
            }
            (Operation::Metrics, _) => {
                format!("Error calculating metrics for {}: {}", ticker, error)
            }
        }
    }
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Group digits in threes with commas: `1234567` becomes `1,234,567`.
pub fn format_volume(volume: u64) -> String {
    let digits = volume.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::types::PriceBar;
    use chrono::{Duration, NaiveDate};

    fn ts(date: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn series(n: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| PriceBar {
                date: start + Duration::days(i as i64),
                open: 100.0,
                high: 100.0,
                low: 100.0,
                close: 100.0 + i as f64 + 0.126,
                volume: 1,
            })
            .collect();
        PriceSeries::new("AAPL", bars)
    }

    /// Pull `Latest Price` and `Volume` back out of a rendered snapshot.
    fn parse_snapshot(text: &str) -> (f64, u64) {
        let mut price = None;
        let mut volume = None;
        for line in text.lines() {
            if let Some(rest) = line.strip_prefix("Latest Price: $") {
                price = Some(rest.parse::<f64>().unwrap());
            }
            if let Some(rest) = line.strip_prefix("Volume: ") {
                volume = Some(rest.replace(',', "").parse::<u64>().unwrap());
            }
        }
        (price.unwrap(), volume.unwrap())
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(0), "0");
        assert_eq!(format_volume(999), "999");
        assert_eq!(format_volume(1_000), "1,000");
        assert_eq!(format_volume(52_164_503), "52,164,503");
        assert_eq!(format_volume(1_234_567_890), "1,234,567,890");
    }

    #[test]
    fn test_snapshot_layout() {
        let quote = QuoteSnapshot {
            symbol: "AAPL".to_string(),
            price: 187.4567,
            volume: 52_164_503,
            as_of: ts("2024-03-15"),
        };

        let text = Formatter::default().snapshot(&quote);
        assert_eq!(
            text,
            "\nSymbol: AAPL\nLatest Price: $187.46\nVolume: 52,164,503\nTimestamp: 2024-03-15 00:00:00\n"
        );
    }

    #[test]
    fn test_snapshot_round_trip() {
        let quote = QuoteSnapshot {
            symbol: "MSFT".to_string(),
            price: 415.129,
            volume: 18_003_221,
            as_of: ts("2024-03-15"),
        };

        let text = Formatter::default().snapshot(&quote);
        let (price, volume) = parse_snapshot(&text);

        assert_eq!(price, 415.13);
        assert_eq!(volume, quote.volume);
    }

    #[test]
    fn test_history_truncates_silently_at_ten() {
        let text = Formatter::default().history(&series(11));
        let rows: Vec<&str> = text.lines().filter(|l| l.starts_with("Date: ")).collect();

        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0], "Date: 2024-01-01, Close: $100.13");
        assert_eq!(rows[9], "Date: 2024-01-10, Close: $109.13");
        assert!(!text.contains("2024-01-11"));
        assert!(!text.contains("more"));
    }

    #[test]
    fn test_history_ascending_order() {
        let text = Formatter::default().history(&series(5));
        let dates: Vec<&str> = text
            .lines()
            .filter_map(|l| l.strip_prefix("Date: "))
            .map(|l| &l[..10])
            .collect();

        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_history_header() {
        let text = Formatter::default().history(&series(1));
        assert!(text.starts_with("\nSymbol: AAPL\nHistorical Data:\nDate: 2024-01-01"));
    }

    #[test]
    fn test_history_truncation_notice() {
        let formatter = Formatter::new(10, true);
        let text = formatter.history(&series(13));

        assert_eq!(text.lines().filter(|l| l.starts_with("Date: ")).count(), 10);
        assert!(text.ends_with("... and 3 more entries\n"));

        // no notice when nothing was dropped
        let text = formatter.history(&series(10));
        assert!(!text.contains("more entries"));
    }

    #[test]
    fn test_metrics_layout() {
        let metrics = MetricsResult {
            symbol: "AAPL".to_string(),
            sma20: Some(182.3456),
            volatility: 1.513002199050567,
            as_of: ts("2024-03-15"),
        };

        assert_eq!(
            Formatter::default().metrics(&metrics),
            "\nSymbol: AAPL\n20-Day SMA: $182.35\nAnnualized Volatility: 1.5130\nTimestamp: 2024-03-15 00:00:00\n"
        );
    }

    #[test]
    fn test_metrics_sma_placeholder() {
        let metrics = MetricsResult {
            symbol: "AAPL".to_string(),
            sma20: None,
            volatility: 0.0,
            as_of: ts("2024-03-15"),
        };

        let text = Formatter::default().metrics(&metrics);
        assert!(text.contains("20-Day SMA: unavailable"));
        assert!(text.contains("Annualized Volatility: 0.0000"));
    }

    #[test]
    fn test_failure_messages() {
        let f = Formatter::default();
        let no_data = AnalysisError::no_data("ZZZZ");
        let fetch = AnalysisError::fetch("AAPL", FetchError::Provider("boom".to_string()));

        assert_eq!(
            f.failure(Operation::Quote, "ZZZZ", &no_data),
            "No data available for ticker ZZZZ."
        );
        assert_eq!(
            f.failure(Operation::History, "ZZZZ", &no_data),
            "No data available for ticker ZZZZ in the specified date range."
        );
        assert_eq!(
            f.failure(Operation::Quote, "AAPL", &fetch),
            "Error fetching data for AAPL: boom"
        );
        assert_eq!(
            f.failure(Operation::History, "AAPL", &fetch),
            "Error fetching historical data for AAPL: boom"
        );
        assert_eq!(
            f.failure(Operation::Metrics, "AAPL", &AnalysisError::computation("bad")),
            "Error calculating metrics for AAPL: Computation error: bad"
        );
    }
}
