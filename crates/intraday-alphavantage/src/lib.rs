#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/intraday/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Alpha Vantage intraday remote source.
//!
//! This crate implements the [`RemoteSource`] trait from `intraday-core` for
//! the [Alpha Vantage](https://www.alphavantage.co/) `TIME_SERIES_INTRADAY`
//! endpoint.
//!
//! # Usage
//!
//! ```rust,ignore
//! use intraday_alphavantage::AlphaVantageSource;
//! use intraday_core::{ApiKey, Granularity, Period, RemoteRequest, RemoteSource, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = AlphaVantageSource::new();
//!     let key = ApiKey::new("your_api_key").unwrap();
//!
//!     let request = RemoteRequest::new(
//!         Symbol::new("IBM"),
//!         "2024-01".parse::<Period>()?,
//!         Granularity::OneMinute,
//!     );
//!     let bars = source.fetch_intraday(&request, &key).await?;
//!     println!("{} bars", bars.len());
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use intraday_core::{ApiKey, DataError, IntradayDataset, RemoteRequest, RemoteSource, Result};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;

/// Base URL for the Alpha Vantage API.
const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co";

/// Provider name used in errors.
const PROVIDER: &str = "Alpha Vantage";

/// Envelope field carrying a request error.
const ERROR_FIELD: &str = "Error Message";

/// Envelope fields carrying throttle / quota notices.
const NOTICE_FIELDS: &[&str] = &["Note", "Information"];

/// Alpha Vantage intraday source.
///
/// The client is used as given: no timeout is applied unless the caller
/// supplies a configured client through [`AlphaVantageSource::with_client`].
#[derive(Debug, Clone)]
pub struct AlphaVantageSource {
    client: Client,
    base_url: String,
}

impl Default for AlphaVantageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AlphaVantageSource {
    /// Create a new source against the public API.
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a new source with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: ALPHA_VANTAGE_BASE_URL.to_string(),
        }
    }

    /// Point the source at a different host (e.g. a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the query endpoint URL.
    fn url(&self) -> String {
        format!("{}/query", self.base_url)
    }

    /// Make the GET request and return the decoded JSON object.
    async fn get(&self, request: &RemoteRequest, api_key: &ApiKey) -> Result<Map<String, Value>> {
        let mut query = request.query_pairs();
        debug!(
            symbol = %request.symbol,
            interval = %request.granularity,
            outputsize = request.output_size().as_str(),
            month = ?request.month().map(|m| m.to_string()),
            "Alpha Vantage request"
        );
        query.push(("apikey", api_key.expose().to_string()));

        let response = self
            .client
            .get(self.url())
            .query(&query)
            .send()
            .await
            .map_err(|e| DataError::Network(e.without_url().to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                provider: PROVIDER.to_string(),
                message: "HTTP 429".to_string(),
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DataError::Network(format!("HTTP {status}: {text}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DataError::Network(e.without_url().to_string()))?;

        match serde_json::from_str(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(DataError::MalformedPayload(
                "response is not a JSON object".to_string(),
            )),
            Err(e) => Err(DataError::MalformedPayload(format!(
                "response is not JSON: {e}"
            ))),
        }
    }
}

/// Extract the time series for `request` from a decoded response envelope.
fn parse_envelope(
    request: &RemoteRequest,
    mut envelope: Map<String, Value>,
) -> Result<IntradayDataset> {
    if let Some(message) = envelope.get(ERROR_FIELD) {
        return Err(DataError::Provider {
            provider: PROVIDER.to_string(),
            message: notice_text(message),
        });
    }

    let series_field = format!("Time Series ({})", request.granularity);
    let Some(series) = envelope.remove(&series_field) else {
        if let Some(notice) = NOTICE_FIELDS.iter().find_map(|f| envelope.get(*f)) {
            return Err(DataError::RateLimited {
                provider: PROVIDER.to_string(),
                message: notice_text(notice),
            });
        }
        let keys: Vec<&str> = envelope.keys().map(String::as_str).collect();
        return Err(DataError::MalformedPayload(format!(
            "missing {series_field:?}; response fields: {keys:?}"
        )));
    };

    serde_json::from_value(series)
        .map_err(|e| DataError::MalformedPayload(format!("{series_field}: {e}")))
}

fn notice_text(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToString::to_string)
}

#[async_trait]
impl RemoteSource for AlphaVantageSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_intraday(
        &self,
        request: &RemoteRequest,
        api_key: &ApiKey,
    ) -> Result<IntradayDataset> {
        let envelope = self.get(request, api_key).await?;
        let data = parse_envelope(request, envelope)?;
        debug!(symbol = %request.symbol, bars = data.len(), "Alpha Vantage response parsed");
        Ok(data)
    }
}
