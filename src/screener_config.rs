// =============================================================================
// Screener Configuration — JSON settings with atomic save
// =============================================================================
//
// Central configuration hub for the screening engine. Every tunable lives
// here: ticker list, indicator periods, oversold/overbought thresholds,
// windowing policy, and stop-loss mode.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_tickers() -> Vec<String> {
    vec![
        "AAPL".to_string(),
        "MSFT".to_string(),
        "GOOGL".to_string(),
        "AMZN".to_string(),
        "NVDA".to_string(),
    ]
}

fn default_lookback_days() -> u32 {
    365
}

fn default_rescan_interval_secs() -> u64 {
    900
}

fn default_rsi_period() -> usize {
    14
}

fn default_atr_period() -> usize {
    14
}

fn default_bb_window() -> usize {
    20
}

fn default_bb_num_std() -> f64 {
    2.0
}

fn default_macd_short() -> usize {
    12
}

fn default_macd_long() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_ema_periods() -> Vec<usize> {
    vec![20]
}

fn default_ma_short() -> usize {
    50
}

fn default_ma_long() -> usize {
    200
}

fn default_rsi_oversold() -> f64 {
    30.0
}

fn default_rsi_overbought() -> f64 {
    70.0
}

fn default_stoch_oversold() -> f64 {
    0.2
}

fn default_stoch_overbought() -> f64 {
    0.8
}

fn default_sl_atr_multiplier() -> f64 {
    1.0
}

fn default_sl_pct() -> f64 {
    0.03
}

// =============================================================================
// Policy enums
// =============================================================================

/// How weekly/monthly views are built from the daily series.
///
/// The two strategies are interchangeable but must never be mixed within one
/// run; the policy is always explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowingPolicy {
    /// Daily = last 1, Weekly = last 5, Monthly = last 20 daily bars.
    /// Cheap approximation; indicators are not recomputed.
    TailWindow,
    /// Aggregate daily bars into true weekly/monthly OHLCV bars, then
    /// recompute every indicator on the resampled series.
    Resample,
}

impl Default for WindowingPolicy {
    fn default() -> Self {
        Self::Resample
    }
}

impl std::fmt::Display for WindowingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TailWindow => write!(f, "tail_window"),
            Self::Resample => write!(f, "resample"),
        }
    }
}

/// Which oscillator gates the buy/exit signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalDriver {
    Rsi,
    StochRsi,
    Macd,
}

impl Default for SignalDriver {
    fn default() -> Self {
        Self::Rsi
    }
}

impl std::fmt::Display for SignalDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rsi => write!(f, "rsi"),
            Self::StochRsi => write!(f, "stoch_rsi"),
            Self::Macd => write!(f, "macd"),
        }
    }
}

/// How the stop-loss distance is derived from the buy price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopLossMode {
    /// `stop = buy - k × ATR`
    AtrMultiple,
    /// `stop = buy × (1 - pct)`
    Percent,
}

impl Default for StopLossMode {
    fn default() -> Self {
        Self::AtrMultiple
    }
}

// =============================================================================
// ScreenerConfig
// =============================================================================

/// Top-level screening configuration.
///
/// Every field has a serde default so that older JSON files missing new
/// fields will still deserialise correctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerConfig {
    // --- Universe -----------------------------------------------------------
    /// Tickers to screen, in report order.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,

    /// Calendar days of daily history to request from the data source.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Seconds between automatic re-screens. `0` disables the rescan loop.
    #[serde(default = "default_rescan_interval_secs")]
    pub rescan_interval_secs: u64,

    // --- Indicator periods --------------------------------------------------
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_atr_period")]
    pub atr_period: usize,

    #[serde(default = "default_bb_window")]
    pub bb_window: usize,

    #[serde(default = "default_bb_num_std")]
    pub bb_num_std: f64,

    #[serde(default = "default_macd_short")]
    pub macd_short: usize,

    #[serde(default = "default_macd_long")]
    pub macd_long: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    /// Extra EMA overlays computed for the charts.
    #[serde(default = "default_ema_periods")]
    pub ema_periods: Vec<usize>,

    #[serde(default = "default_ma_short")]
    pub ma_short: usize,

    #[serde(default = "default_ma_long")]
    pub ma_long: usize,

    // --- Optional indicator columns ----------------------------------------
    #[serde(default = "default_true")]
    pub enable_macd: bool,

    #[serde(default = "default_true")]
    pub enable_stoch_rsi: bool,

    #[serde(default = "default_true")]
    pub enable_moving_averages: bool,

    #[serde(default = "default_true")]
    pub enable_support_resistance: bool,

    // --- Signal policy ------------------------------------------------------
    /// Weekly/monthly construction strategy. Explicit per run, never mixed.
    #[serde(default)]
    pub windowing: WindowingPolicy,

    /// Which oscillator decides oversold/overbought.
    #[serde(default)]
    pub driver: SignalDriver,

    /// When no signal fires, fall back to the last close instead of
    /// reporting the level as unavailable.
    #[serde(default = "default_true")]
    pub fallback_to_close: bool,

    #[serde(default)]
    pub stop_loss_mode: StopLossMode,

    /// ATR multiplier for [`StopLossMode::AtrMultiple`].
    #[serde(default = "default_sl_atr_multiplier")]
    pub sl_atr_multiplier: f64,

    /// Fractional distance for [`StopLossMode::Percent`].
    #[serde(default = "default_sl_pct")]
    pub sl_pct: f64,

    // --- Thresholds ---------------------------------------------------------
    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,

    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,

    #[serde(default = "default_stoch_oversold")]
    pub stoch_oversold: f64,

    #[serde(default = "default_stoch_overbought")]
    pub stoch_overbought: f64,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        serde_json::from_str("{}").expect("empty config must deserialise via defaults")
    }
}

impl ScreenerConfig {
    /// Minimum number of daily bars a series must have before this
    /// configuration will score it.
    ///
    /// Derived from the longest-window indicator in use: Bollinger window,
    /// RSI warm-up (`period + 1` closes), ATR window, the StochRSI double
    /// warm-up when enabled, and the long moving average when enabled.
    pub fn required_history(&self) -> usize {
        let mut required = self.bb_window.max(self.rsi_period + 1).max(self.atr_period);
        if self.enable_stoch_rsi || self.driver == SignalDriver::StochRsi {
            required = required.max(2 * self.rsi_period);
        }
        if self.enable_moving_averages {
            required = required.max(self.ma_long);
        }
        required
    }

    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read screener config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse screener config from {}", path.display()))?;

        info!(
            path = %path.display(),
            tickers = ?config.tickers,
            windowing = %config.windowing,
            "screener config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise screener config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "screener config saved (atomic)");
        Ok(())
    }
}
