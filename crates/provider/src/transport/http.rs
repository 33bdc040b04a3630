//! HTTP transport layer for the chart API.

use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// HTTP transport for making API requests.
///
/// Each call is a single GET; failures are returned to the caller as-is.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ProviderConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ProviderConfig>) -> ProviderResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|_| ProviderError::Config("Invalid user agent".to_string()))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build a URL for the given path.
    pub fn build_url(&self, path: &str) -> ProviderResult<Url> {
        self.config
            .base_url
            .join(path)
            .map_err(ProviderError::InvalidUrl)
    }

    /// Build a URL for `path` followed by one percent-encoded segment.
    pub fn build_url_with_segment(&self, path: &str, segment: &str) -> ProviderResult<Url> {
        let mut url = self.build_url(path)?;
        let base = url.to_string();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Config(format!("Base URL cannot hold a path: {}", base)))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        url: Url,
        query: &Q,
    ) -> ProviderResult<T> {
        debug!(url = %url, "GET request with query");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(ProviderError::from_response(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn classify(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.config.timeout)
        } else {
            ProviderError::Http(err)
        }
    }
}
