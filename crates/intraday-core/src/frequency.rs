//! Bar granularity definitions.
//!
//! This module defines [`Granularity`], the bar interval of an intraday series.
//! The same string form is used for the cache key and the provider `interval`
//! query parameter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Bar interval of an intraday time series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// One-minute bars.
    #[serde(rename = "1min")]
    OneMinute,
    /// Five-minute bars.
    #[serde(rename = "5min")]
    FiveMinute,
    /// Fifteen-minute bars.
    #[serde(rename = "15min")]
    FifteenMinute,
    /// Thirty-minute bars.
    #[serde(rename = "30min")]
    ThirtyMinute,
    /// Sixty-minute bars.
    #[serde(rename = "60min")]
    SixtyMinute,
}

impl Granularity {
    /// All supported granularities, finest first.
    pub const ALL: [Self; 5] = [
        Self::OneMinute,
        Self::FiveMinute,
        Self::FifteenMinute,
        Self::ThirtyMinute,
        Self::SixtyMinute,
    ];

    /// Returns the interval string (e.g. `"1min"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1min",
            Self::FiveMinute => "5min",
            Self::FifteenMinute => "15min",
            Self::ThirtyMinute => "30min",
            Self::SixtyMinute => "60min",
        }
    }

    /// Returns the bar length in minutes.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        match self {
            Self::OneMinute => 1,
            Self::FiveMinute => 5,
            Self::FifteenMinute => 15,
            Self::ThirtyMinute => 30,
            Self::SixtyMinute => 60,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| {
                DataError::InvalidParameter(format!(
                    "unknown granularity {s:?}; expected one of 1min, 5min, 15min, 30min, 60min"
                ))
            })
    }
}
