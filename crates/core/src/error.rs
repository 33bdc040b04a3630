//! Error types for the analysis pipeline.

use std::time::Duration;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Failure reported by a [`MarketDataProvider`](crate::provider::MarketDataProvider).
///
/// Providers collapse their own failure modes into this opaque shape; only
/// timeouts are kept apart.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The request did not complete within the configured deadline.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Any other network or provider-side failure.
    #[error("{0}")]
    Provider(String),
}

/// Errors that can occur while producing a quote, history listing or metrics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// A ticker or date argument failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The provider returned no rows.
    #[error("No data available for ticker {symbol}")]
    NoData { symbol: String },

    /// The provider request failed.
    #[error("{source}")]
    DataFetch {
        symbol: String,
        #[source]
        source: FetchError,
    },

    /// A statistic is undefined for the given series.
    #[error("Computation error: {0}")]
    Computation(String),
}

impl AnalysisError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn no_data(symbol: impl Into<String>) -> Self {
        Self::NoData {
            symbol: symbol.into(),
        }
    }

    pub fn fetch(symbol: impl Into<String>, source: FetchError) -> Self {
        Self::DataFetch {
            symbol: symbol.into(),
            source,
        }
    }

    pub fn computation(message: impl Into<String>) -> Self {
        Self::Computation(message.into())
    }

    /// Check if this error is the informational empty-result case.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }

    /// Check if this error came from a fetch deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::DataFetch {
                source: FetchError::Timeout(_),
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(
            FetchError::Timeout(Duration::from_secs(30)).to_string(),
            "request timed out after 30s"
        );
        assert_eq!(
            FetchError::Provider("API error (status 500): boom".to_string()).to_string(),
            "API error (status 500): boom"
        );
    }

    #[test]
    fn test_data_fetch_displays_cause() {
        let err = AnalysisError::fetch("AAPL", FetchError::Provider("connection refused".to_string()));
        assert_eq!(err.to_string(), "connection refused");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_timeout_kind() {
        let err = AnalysisError::fetch("AAPL", FetchError::Timeout(Duration::from_secs(5)));
        assert!(err.is_timeout());
        assert!(!err.is_no_data());
    }

    #[test]
    fn test_no_data_kind() {
        let err = AnalysisError::no_data("ZZZZ");
        assert!(err.is_no_data());
        assert_eq!(err.to_string(), "No data available for ticker ZZZZ");
    }
}
