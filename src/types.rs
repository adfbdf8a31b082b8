// =============================================================================
// Shared types used across the Vantage screening engine
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ScreenError;

/// A single daily OHLCV bar.
///
/// Bars are always handled oldest-first; `validate_series` enforces ordering
/// and field sanity before any indicator math runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// The timeframes the screener derives trade levels for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
}

impl Timeframe {
    /// All timeframes, in report order.
    pub const ALL: [Timeframe; 3] = [Timeframe::Daily, Timeframe::Weekly, Timeframe::Monthly];

    /// Tail-window size in daily bars: Daily = last bar, Weekly = last 5,
    /// Monthly = last 20 (approximate trading-day counts).
    pub fn tail_bars(&self) -> usize {
        match self {
            Timeframe::Daily => 1,
            Timeframe::Weekly => 5,
            Timeframe::Monthly => 20,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "Daily"),
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
        }
    }
}

/// Validate an OHLCV series before analysis.
///
/// Checks, in order:
/// - every price field is finite and strictly positive
/// - `low <= min(open, close)` and `high >= max(open, close)`
/// - dates are strictly ascending (implies uniqueness)
///
/// Returns `InvalidSeries` describing the first violation found.
pub fn validate_series(bars: &[Bar]) -> Result<(), ScreenError> {
    for (i, bar) in bars.iter().enumerate() {
        let prices = [bar.open, bar.high, bar.low, bar.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(ScreenError::InvalidSeries(format!(
                "bar {} ({}) has a non-finite or non-positive price",
                i, bar.date
            )));
        }
        if bar.low > bar.open.min(bar.close) || bar.high < bar.open.max(bar.close) {
            return Err(ScreenError::InvalidSeries(format!(
                "bar {} ({}) has high/low outside the open/close range",
                i, bar.date
            )));
        }
        if i > 0 && bars[i - 1].date >= bar.date {
            return Err(ScreenError::InvalidSeries(format!(
                "bar {} ({}) is not strictly after its predecessor ({})",
                i,
                bar.date,
                bars[i - 1].date
            )));
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn valid_series_passes() {
        let bars = vec![bar(1, 100.0), bar(2, 101.0), bar(3, 99.5)];
        assert!(validate_series(&bars).is_ok());
    }

    #[test]
    fn empty_series_is_valid() {
        assert!(validate_series(&[]).is_ok());
    }

    #[test]
    fn duplicate_date_rejected() {
        let bars = vec![bar(1, 100.0), bar(1, 101.0)];
        assert!(matches!(
            validate_series(&bars),
            Err(ScreenError::InvalidSeries(_))
        ));
    }

    #[test]
    fn descending_dates_rejected() {
        let bars = vec![bar(5, 100.0), bar(3, 101.0)];
        assert!(validate_series(&bars).is_err());
    }

    #[test]
    fn nan_price_rejected() {
        let mut b = bar(1, 100.0);
        b.high = f64::NAN;
        assert!(validate_series(&[b]).is_err());
    }

    #[test]
    fn negative_price_rejected() {
        let mut b = bar(1, 100.0);
        b.low = -3.0;
        assert!(validate_series(&[b]).is_err());
    }

    #[test]
    fn high_below_close_rejected() {
        let mut b = bar(1, 100.0);
        b.high = 99.0;
        assert!(validate_series(&[b]).is_err());
    }

    #[test]
    fn tail_bars_sizes() {
        assert_eq!(Timeframe::Daily.tail_bars(), 1);
        assert_eq!(Timeframe::Weekly.tail_bars(), 5);
        assert_eq!(Timeframe::Monthly.tail_bars(), 20);
    }
}
