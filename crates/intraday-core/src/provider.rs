//! Remote source trait for live intraday data.
//!
//! This module defines [`RemoteSource`] and the [`RemoteRequest`] it receives.
//! The request owns the query shape so that every source (and every test
//! double) agrees on which parameters a given period implies.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    config::ApiKey,
    error::Result,
    frequency::Granularity,
    types::{IntradayDataset, Month, Period, Symbol},
};

/// How much history the provider should return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputSize {
    /// Only the most recent bars.
    Compact,
    /// The full series for the requested span.
    Full,
}

impl OutputSize {
    /// Returns the query parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }
}

/// One live intraday request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteRequest {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Specific month or latest.
    pub period: Period,
    /// Bar interval.
    pub granularity: Granularity,
}

impl RemoteRequest {
    /// Creates a new request.
    #[must_use]
    pub const fn new(symbol: Symbol, period: Period, granularity: Granularity) -> Self {
        Self {
            symbol,
            period,
            granularity,
        }
    }

    /// `Full` for a specific month, `Compact` for latest.
    #[must_use]
    pub const fn output_size(&self) -> OutputSize {
        match self.period {
            Period::Latest => OutputSize::Compact,
            Period::Month(_) => OutputSize::Full,
        }
    }

    /// Month query parameter; absent for latest.
    #[must_use]
    pub const fn month(&self) -> Option<Month> {
        self.period.month()
    }

    /// Query parameters, excluding the API key.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("function", "TIME_SERIES_INTRADAY".to_string()),
            ("symbol", self.symbol.to_string()),
            ("interval", self.granularity.to_string()),
            ("outputsize", self.output_size().as_str().to_string()),
        ];
        if let Some(month) = self.month() {
            pairs.push(("month", month.to_string()));
        }
        pairs
    }
}

/// Live upstream source of intraday bars.
///
/// A call issues exactly one upstream request; there is no retry at this layer.
#[async_trait]
pub trait RemoteSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g., "Alpha Vantage").
    fn name(&self) -> &str;

    /// Fetches the series described by `request`.
    async fn fetch_intraday(
        &self,
        request: &RemoteRequest,
        api_key: &ApiKey,
    ) -> Result<IntradayDataset>;
}
