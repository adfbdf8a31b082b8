// =============================================================================
// Trade-level derivation — buy / exit / stop-loss per timeframe
// =============================================================================
//
// For each timeframe window:
//   buy  = Lower Bollinger anchor, gated on the driving oscillator reading
//          oversold; otherwise the last close (when `fallback_to_close`) or
//          unavailable.
//   exit = symmetric with the Upper Bollinger anchor and overbought.
//   stop = buy - k·ATR, or buy × (1 - pct), per `stop_loss_mode`; always
//          unavailable when buy is.
//
// Internal math keeps full precision; rounding happens only at presentation.

use serde::Serialize;

use crate::screener_config::{ScreenerConfig, StopLossMode};
use crate::types::Timeframe;

/// Oscillator state at decision time, already resolved against the
/// configured thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct OscReading {
    pub value: Option<f64>,
    pub oversold: bool,
    pub overbought: bool,
}

/// Everything the level derivation needs to know about one timeframe window.
#[derive(Debug, Clone, Default)]
pub struct WindowInputs {
    /// Defined Lower-Bollinger values across the window (tail policy) or the
    /// last resampled value alone (resample policy).
    pub lower_bb: Vec<f64>,
    /// Defined Upper-Bollinger values, same convention.
    pub upper_bb: Vec<f64>,
    /// Close of the window's final bar.
    pub last_close: f64,
    /// ATR at the window's final bar, when defined.
    pub atr: Option<f64>,
    pub reading: OscReading,
}

/// Derived trade levels for one ticker and timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelResult {
    pub timeframe: Timeframe,
    pub buy: Option<f64>,
    pub exit: Option<f64>,
    pub stop_loss: Option<f64>,
    /// The driving oscillator value at decision time.
    pub driver_value: Option<f64>,
}

impl LevelResult {
    /// A window that could not be scored at all (e.g. empty after
    /// resampling).
    pub fn unavailable(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            buy: None,
            exit: None,
            stop_loss: None,
            driver_value: None,
        }
    }
}

/// Derive buy/exit/stop levels for one window under the given configuration.
pub fn derive_levels(
    config: &ScreenerConfig,
    timeframe: Timeframe,
    window: &WindowInputs,
) -> LevelResult {
    let buy_anchor = mean(&window.lower_bb);
    let exit_anchor = mean(&window.upper_bb);
    let fallback = config.fallback_to_close.then_some(window.last_close);

    let buy = if window.reading.oversold {
        buy_anchor.or(fallback)
    } else {
        fallback
    };
    let exit = if window.reading.overbought {
        exit_anchor.or(fallback)
    } else {
        fallback
    };

    let stop_loss = buy.and_then(|b| match config.stop_loss_mode {
        StopLossMode::AtrMultiple => window.atr.map(|atr| b - config.sl_atr_multiplier * atr),
        StopLossMode::Percent => Some(b * (1.0 - config.sl_pct)),
    });

    LevelResult {
        timeframe,
        buy,
        exit,
        stop_loss,
        driver_value: window.reading.value,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
