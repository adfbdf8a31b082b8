// =============================================================================
// Per-ticker error taxonomy
// =============================================================================
//
// Every failure mode of a single ticker analysis is represented here. All
// variants are caught at the per-ticker boundary and converted into an
// error-tagged row in the screening report; nothing aborts the batch.

use serde::Serialize;

/// Reasons a single ticker's analysis can fail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum ScreenError {
    /// The series is shorter than the longest-window indicator in use needs.
    InsufficientData { required: usize, actual: usize },
    /// A source row was missing a required OHLCV field.
    MissingColumn(String),
    /// The market-data source failed (network, HTTP status, unknown ticker).
    UpstreamFetchFailure(String),
    /// A computation resolved to an undefined value where a defined one was
    /// required (zero-range StochRSI, zero-over-zero RSI).
    UndefinedIndicatorValue(String),
    /// Bars arrived out of order, duplicated, or with non-finite fields.
    InvalidSeries(String),
}

impl std::fmt::Display for ScreenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientData { required, actual } => write!(
                f,
                "not enough data to compute indicators: have {actual} bars, need {required}"
            ),
            Self::MissingColumn(name) => write!(f, "missing required column: {name}"),
            Self::UpstreamFetchFailure(reason) => write!(f, "data fetch failed: {reason}"),
            Self::UndefinedIndicatorValue(what) => {
                write!(f, "indicator value undefined: {what}")
            }
            Self::InvalidSeries(reason) => write!(f, "invalid price series: {reason}"),
        }
    }
}

impl std::error::Error for ScreenError {}
