//! Error types for the market data provider.

use serde::Deserialize;
use std::time::Duration;
use stockmcp_core::FetchError;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Error code Yahoo returns for unknown or delisted symbols.
pub const NOT_FOUND_CODE: &str = "Not Found";

/// Error types that can occur when talking to the chart API.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request did not finish before the configured timeout.
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ProviderError {
    /// Check if the API reported that the symbol has no data.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { code: Some(code), .. } if code == NOT_FOUND_CODE)
    }

    /// Create an API error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(ErrorResponse::into_error)
        {
            Some(error) => Self::Api {
                status,
                code: Some(error.code),
                message: error.description,
            },
            None => Self::Api {
                status,
                code: None,
                message: body.trim().to_string(),
            },
        }
    }
}

impl From<ProviderError> for FetchError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout(after) => FetchError::Timeout(after),
            other => FetchError::Provider(other.to_string()),
        }
    }
}

/// Error object embedded in chart API responses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Error envelope returned by the chart API.
///
/// Chart endpoints wrap errors in `chart`, other finance endpoints in `finance`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    chart: Option<ErrorBody>,
    #[serde(default)]
    finance: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ApiError>,
}

impl ErrorResponse {
    fn into_error(self) -> Option<ApiError> {
        self.chart
            .and_then(|b| b.error)
            .or_else(|| self.finance.and_then(|b| b.error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_chart_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = ProviderError::from_response(404, body);

        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "API error (status 404): No data found, symbol may be delisted"
        );
    }

    #[test]
    fn test_from_response_finance_error() {
        let body = r#"{"finance":{"result":null,"error":{"code":"Bad Request","description":"Invalid input - interval=1d is not supported"}}}"#;
        let err = ProviderError::from_response(400, body);

        assert!(!err.is_not_found());
        match err {
            ProviderError::Api { status, code, .. } => {
                assert_eq!(status, 400);
                assert_eq!(code.as_deref(), Some("Bad Request"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_response_plain_text() {
        let err = ProviderError::from_response(429, "Too Many Requests\n");
        assert_eq!(err.to_string(), "API error (status 429): Too Many Requests");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_into_fetch_error() {
        let timeout: FetchError = ProviderError::Timeout(Duration::from_secs(5)).into();
        assert_eq!(timeout, FetchError::Timeout(Duration::from_secs(5)));

        let api: FetchError = ProviderError::from_response(500, "boom").into();
        assert_eq!(
            api,
            FetchError::Provider("API error (status 500): boom".to_string())
        );
    }
}
