//! Climb pattern analysis over an intraday series.
//!
//! The analyzer samples three closing prices from the most recent window of
//! bars: the earliest bar, the mid-window bar and the latest bar. It then
//! compares the gain over the recent half of the window with the gain over
//! the older half.
//!
//! [`analyze`] assumes one-minute bars: its 30-bar window spans about 30
//! minutes and the mid anchor sits 15 bars before the latest one. For coarser
//! series use [`analyze_granular`], which scales the window to the same
//! 30-minute horizon or refuses when the granularity is too coarse for it.

use serde::Serialize;
use thiserror::Error;

use intraday_core::{Granularity, IntradayDataset};

/// Time span the climb window covers.
pub const HORIZON_MINUTES: u32 = 30;

/// Smallest window that still has distinct earliest, mid and latest anchors.
const MIN_WINDOW_BARS: usize = 3;

/// Number of most recent bars inspected and where the mid anchor sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClimbWindow {
    bars: usize,
}

impl ClimbWindow {
    /// Thirty one-minute bars.
    pub const ONE_MINUTE: Self = Self { bars: 30 };

    /// Scale the 30-minute horizon to `granularity`.
    ///
    /// Returns `None` when fewer than three bars would fit (coarser than
    /// five-minute bars).
    #[must_use]
    pub fn for_granularity(granularity: Granularity) -> Option<Self> {
        let bars = (HORIZON_MINUTES / granularity.minutes()) as usize;
        (bars >= MIN_WINDOW_BARS).then_some(Self { bars })
    }

    /// Number of bars in the window.
    #[must_use]
    pub const fn bars(&self) -> usize {
        self.bars
    }

    /// Index of the mid anchor within the window (14 for a 30-bar window).
    #[must_use]
    pub const fn mid_index(&self) -> usize {
        self.bars - 1 - self.bars / 2
    }
}

/// Why a dataset could not be analyzed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClimbError {
    /// No dataset was supplied.
    #[error("no data provided")]
    NoData,

    /// The dataset is shorter than the window.
    #[error("insufficient data points: found {found}, need {required}")]
    InsufficientData {
        /// Bars present.
        found: usize,
        /// Bars the window requires.
        required: usize,
    },

    /// At least one close could not be read as a number.
    #[error("data contains non-numeric price(s), first at {timestamp}")]
    NonNumericPrice {
        /// Timestamp of the first offending bar.
        timestamp: String,
    },

    /// The granularity is too coarse for the climb horizon.
    #[error("{0} bars are too coarse for a 30-minute climb window")]
    UnsupportedGranularity(Granularity),
}

/// Momentum computed from the three anchor prices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimbSignal {
    /// `latest - mid`.
    pub gain_current_window: f64,
    /// `mid - earliest`.
    pub gain_previous_window: f64,
    /// Close of the most recent bar.
    pub latest_price: f64,
    /// `gain_current_window > 0`; a flat recent half is not a climb.
    pub is_climbing: bool,
}

/// Flat, serializable analysis report.
///
/// Either `error` is `None` and `latest_price` is set, or `error` is set and
/// every numeric field is zeroed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClimbAnalysis {
    /// Caller-supplied label, usually the symbol.
    pub symbol: String,
    /// `latest - mid`, or `0` on failure.
    pub gain_current_window: f64,
    /// `mid - earliest`, or `0` on failure.
    pub gain_previous_window: f64,
    /// Whether the recent half of the window gained.
    pub is_climbing: bool,
    /// Close of the most recent bar.
    pub latest_price: Option<f64>,
    /// Failure description.
    pub error: Option<String>,
}

impl ClimbAnalysis {
    /// Build the report for an analysis outcome.
    #[must_use]
    pub fn from_outcome(
        symbol: impl Into<String>,
        outcome: Result<ClimbSignal, ClimbError>,
    ) -> Self {
        let symbol = symbol.into();
        match outcome {
            Ok(signal) => Self {
                symbol,
                gain_current_window: signal.gain_current_window,
                gain_previous_window: signal.gain_previous_window,
                is_climbing: signal.is_climbing,
                latest_price: Some(signal.latest_price),
                error: None,
            },
            Err(e) => Self {
                symbol,
                gain_current_window: 0.0,
                gain_previous_window: 0.0,
                is_climbing: false,
                latest_price: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Returns true when the analysis succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Analyze one-minute bars with the default 30-bar window.
#[must_use]
pub fn analyze(symbol: &str, dataset: Option<&IntradayDataset>) -> ClimbAnalysis {
    ClimbAnalysis::from_outcome(symbol, try_analyze(dataset, ClimbWindow::ONE_MINUTE))
}

/// Analyze bars of the given granularity over the 30-minute horizon.
#[must_use]
pub fn analyze_granular(
    symbol: &str,
    dataset: Option<&IntradayDataset>,
    granularity: Granularity,
) -> ClimbAnalysis {
    let outcome = ClimbWindow::for_granularity(granularity)
        .ok_or(ClimbError::UnsupportedGranularity(granularity))
        .and_then(|window| try_analyze(dataset, window));
    ClimbAnalysis::from_outcome(symbol, outcome)
}

/// Compute the climb signal over the last `window.bars()` bars.
///
/// Every close in the dataset must parse, not only those inside the window.
///
/// # Errors
/// Returns [`ClimbError`] when the dataset is missing, too short, or holds a
/// non-numeric close.
pub fn try_analyze(
    dataset: Option<&IntradayDataset>,
    window: ClimbWindow,
) -> Result<ClimbSignal, ClimbError> {
    let dataset = dataset.ok_or(ClimbError::NoData)?;

    if dataset.len() < window.bars() {
        return Err(ClimbError::InsufficientData {
            found: dataset.len(),
            required: window.bars(),
        });
    }

    let prices = dataset
        .iter()
        .map(|(timestamp, bar)| {
            bar.close_price().ok_or_else(|| ClimbError::NonNumericPrice {
                timestamp: timestamp.to_string(),
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let recent = &prices[prices.len() - window.bars()..];
    let earliest = recent[0];
    let mid = recent[window.mid_index()];
    let latest = recent[window.bars() - 1];

    let gain_current_window = latest - mid;
    let gain_previous_window = mid - earliest;

    Ok(ClimbSignal {
        gain_current_window,
        gain_previous_window,
        latest_price: latest,
        is_climbing: gain_current_window > 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use intraday_core::PriceBar;

    /// One-minute timestamps starting at 09:30.
    fn timestamp(i: usize) -> String {
        let minutes = 9 * 60 + 30 + i;
        format!("2024-01-02 {:02}:{:02}:00", minutes / 60, minutes % 60)
    }

    fn series(closes: &[f64]) -> IntradayDataset {
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| (timestamp(i), PriceBar::new(format!("{close:.4}"))))
            .collect()
    }

    #[test]
    fn test_missing_dataset() {
        let result = analyze("IBM", None);

        assert_eq!(result.error.as_deref(), Some("no data provided"));
        assert!(!result.is_climbing);
        assert_eq!(result.latest_price, None);
    }

    #[test]
    fn test_short_series_is_an_error_with_zeroed_fields() {
        let closes: Vec<f64> = (0..29).map(|i| 100.0 + f64::from(i)).collect();
        let result = analyze("IBM", Some(&series(&closes)));

        assert!(!result.is_ok());
        assert!(result.error.as_deref().unwrap().contains("found 29"));
        assert!(!result.is_climbing);
        assert_eq!(result.gain_current_window, 0.0);
        assert_eq!(result.gain_previous_window, 0.0);
        assert_eq!(result.latest_price, None);
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let outcome = try_analyze(Some(&IntradayDataset::new()), ClimbWindow::ONE_MINUTE);
        assert_eq!(
            outcome,
            Err(ClimbError::InsufficientData {
                found: 0,
                required: 30
            })
        );
    }

    #[test]
    fn test_rising_ramp() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + f64::from(i)).collect();
        let result = analyze("IBM", Some(&series(&closes)));

        // Anchors: w[0] = 100, w[14] = 114, w[29] = 129.
        assert_eq!(result.error, None);
        assert_eq!(result.gain_current_window, 15.0);
        assert_eq!(result.gain_previous_window, 14.0);
        assert!(result.is_climbing);
        assert_eq!(result.latest_price, Some(129.0));
    }

    #[test]
    fn test_flat_series_is_not_climbing() {
        let result = analyze("IBM", Some(&series(&[50.0; 30])));

        assert!(result.is_ok());
        assert_eq!(result.gain_current_window, 0.0);
        assert_eq!(result.gain_previous_window, 0.0);
        assert!(!result.is_climbing);
        assert_eq!(result.latest_price, Some(50.0));
    }

    #[test]
    fn test_tie_in_current_window_is_not_climbing() {
        // Rises until the mid anchor, then returns to the same close at the end.
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + f64::from(i)).collect();
        closes[29] = closes[14];
        let result = analyze("IBM", Some(&series(&closes)));

        assert_eq!(result.gain_current_window, 0.0);
        assert!(result.gain_previous_window > 0.0);
        assert!(!result.is_climbing);
    }

    #[test]
    fn test_falling_series_is_not_climbing() {
        let closes: Vec<f64> = (0..30).map(|i| 200.0 - f64::from(i)).collect();
        let result = analyze("IBM", Some(&series(&closes)));

        assert!(result.gain_current_window < 0.0);
        assert!(!result.is_climbing);
    }

    #[test]
    fn test_only_the_last_thirty_bars_count() {
        let mut closes = vec![1_000.0; 10];
        closes.extend((0..30).map(|i| 10.0 + f64::from(i)));
        let signal = try_analyze(Some(&series(&closes)), ClimbWindow::ONE_MINUTE).unwrap();

        assert_eq!(signal.gain_previous_window, 14.0);
        assert_eq!(signal.gain_current_window, 15.0);
        assert_eq!(signal.latest_price, 39.0);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + f64::from(i)).collect();
        let reversed: IntradayDataset = closes
            .iter()
            .enumerate()
            .rev()
            .map(|(i, close)| (timestamp(i), PriceBar::new(*close)))
            .collect();

        let signal = try_analyze(Some(&reversed), ClimbWindow::ONE_MINUTE).unwrap();
        assert_eq!(signal.latest_price, 129.0);
    }

    #[test]
    fn test_non_numeric_price_outside_window_still_fails() {
        let mut data = series(&[100.0; 35]);
        data.insert(timestamp(0), PriceBar::new("n/a"));

        let result = analyze("IBM", Some(&data));

        assert!(
            result
                .error
                .as_deref()
                .unwrap()
                .starts_with("data contains non-numeric price(s)")
        );
        assert!(!result.is_climbing);
        assert_eq!(result.latest_price, None);
    }

    #[test]
    fn test_window_sizes() {
        assert_eq!(ClimbWindow::ONE_MINUTE.mid_index(), 14);
        assert_eq!(
            ClimbWindow::for_granularity(Granularity::OneMinute),
            Some(ClimbWindow::ONE_MINUTE)
        );

        let five = ClimbWindow::for_granularity(Granularity::FiveMinute).unwrap();
        assert_eq!(five.bars(), 6);
        assert_eq!(five.mid_index(), 2);

        assert_eq!(ClimbWindow::for_granularity(Granularity::FifteenMinute), None);
        assert_eq!(ClimbWindow::for_granularity(Granularity::SixtyMinute), None);
    }

    #[test]
    fn test_granular_five_minute_bars() {
        let closes = [10.0, 11.0, 12.0, 12.0, 13.0, 15.0];
        let result = analyze_granular("IBM", Some(&series(&closes)), Granularity::FiveMinute);

        assert!(result.is_ok());
        assert_eq!(result.gain_current_window, 3.0);
        assert_eq!(result.gain_previous_window, 2.0);
        assert!(result.is_climbing);
    }

    #[test]
    fn test_granular_rejects_coarse_bars() {
        let result = analyze_granular("IBM", Some(&series(&[1.0; 30])), Granularity::SixtyMinute);

        assert!(!result.is_ok());
        assert!(result.error.as_deref().unwrap().contains("60min"));
    }

    #[test]
    fn test_report_serializes_flat() {
        let result = analyze("IBM", None);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["symbol"], "IBM");
        assert_eq!(json["is_climbing"], false);
        assert!(json["latest_price"].is_null());
        assert_eq!(json["error"], "no data provided");
    }
}
