//! Core data types for intraday market data.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`Month`] / [`Period`] - The calendar month (or "latest") a dataset covers
//! - [`PriceBar`] - One timestamped bar, close price plus opaque fields
//! - [`IntradayDataset`] - Timestamp-ordered collection of bars
//! - [`CacheKey`] - Lookup key for a cached dataset

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;
use crate::frequency::Granularity;

/// A trading symbol/ticker.
///
/// Symbols are kept exactly as supplied; they become part of cache file names.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A calendar month, written `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Creates a month, returning `None` when `month` is outside 1..=12 or the
    /// year does not fit four digits.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if year < 0 || year > 9999 || month < 1 || month > 12 {
            return None;
        }
        Some(Self { year, month })
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month number (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || DataError::InvalidParameter(format!("invalid month {s:?}; expected YYYY-MM"));

        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let date =
            NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").map_err(|_| invalid())?;
        Self::new(date.year(), date.month()).ok_or_else(invalid)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The span a dataset request covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Period {
    /// Whatever the provider currently considers the most recent bars.
    Latest,
    /// A specific calendar month.
    Month(Month),
}

impl Period {
    /// Returns the specific month, if any.
    #[must_use]
    pub const fn month(&self) -> Option<Month> {
        match self {
            Self::Latest => None,
            Self::Month(m) => Some(*m),
        }
    }

    /// Returns true for [`Period::Latest`].
    #[must_use]
    pub const fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }
}

impl From<Month> for Period {
    fn from(m: Month) -> Self {
        Self::Month(m)
    }
}

impl From<Option<Month>> for Period {
    fn from(m: Option<Month>) -> Self {
        m.map_or(Self::Latest, Self::Month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Month(m) => m.fmt(f),
        }
    }
}

impl FromStr for Period {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("latest") {
            Ok(Self::Latest)
        } else {
            s.parse().map(Self::Month)
        }
    }
}

/// A single timestamped price bar.
///
/// Only the closing price (`"4. close"`) is interpreted; every other field is
/// carried through unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    #[serde(rename = "4. close")]
    close: Value,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl PriceBar {
    /// Key of the closing price within a bar object.
    pub const CLOSE_FIELD: &'static str = "4. close";

    /// Creates a bar with the given raw close value and no other fields.
    #[must_use]
    pub fn new(close: impl Into<Value>) -> Self {
        Self {
            close: close.into(),
            fields: Map::new(),
        }
    }

    /// Adds an opaque field (e.g. `"1. open"`).
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the raw close value as it appeared in the source.
    #[must_use]
    pub const fn raw_close(&self) -> &Value {
        &self.close
    }

    /// Parses the close as a finite float.
    ///
    /// Accepts both JSON numbers and numeric strings (the provider sends
    /// strings). Returns `None` for anything else.
    #[must_use]
    pub fn close_price(&self) -> Option<f64> {
        let price = match &self.close {
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            Value::Number(n) => n.as_f64()?,
            _ => return None,
        };
        price.is_finite().then_some(price)
    }

    /// Returns an opaque field by name.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Intraday bars keyed by timestamp string (`YYYY-MM-DD HH:MM:SS`).
///
/// Timestamps are fixed-width and zero-padded, so the map's lexicographic
/// order is chronological order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntradayDataset {
    bars: BTreeMap<String, PriceBar>,
}

impl IntradayDataset {
    /// Creates an empty dataset.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bars: BTreeMap::new(),
        }
    }

    /// Inserts a bar, returning the previous bar at that timestamp.
    pub fn insert(&mut self, timestamp: impl Into<String>, bar: PriceBar) -> Option<PriceBar> {
        self.bars.insert(timestamp.into(), bar)
    }

    /// Returns the bar at a timestamp.
    #[must_use]
    pub fn get(&self, timestamp: &str) -> Option<&PriceBar> {
        self.bars.get(timestamp)
    }

    /// Returns the number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if there are no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Iterates bars in ascending timestamp order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &PriceBar)> + ExactSizeIterator {
        self.bars.iter().map(|(ts, bar)| (ts.as_str(), bar))
    }
}

impl FromIterator<(String, PriceBar)> for IntradayDataset {
    fn from_iter<I: IntoIterator<Item = (String, PriceBar)>>(iter: I) -> Self {
        Self {
            bars: iter.into_iter().collect(),
        }
    }
}

/// Lookup key of a cached dataset.
///
/// A key always names a concrete month; "latest" data is never addressable in
/// the local store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Month covered by the entry.
    pub month: Month,
    /// Bar interval of the entry.
    pub granularity: Granularity,
}

impl CacheKey {
    /// Creates a new cache key.
    #[must_use]
    pub const fn new(symbol: Symbol, month: Month, granularity: Granularity) -> Self {
        Self {
            symbol,
            month,
            granularity,
        }
    }

    /// File name of this entry: `{symbol}_{YYYY-MM}_{granularity}.json`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_{}_{}.json", self.symbol, self.month, self.granularity)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.symbol, self.month, self.granularity)
    }
}
