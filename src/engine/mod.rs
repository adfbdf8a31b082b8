// =============================================================================
// Indicator Engine — pure per-ticker analysis
// =============================================================================
//
// Pipeline for one ticker:
//   1. Validate the series (ordering, finite positive prices)
//   2. Gate on required history for the configured indicator set
//   3. Compute all indicator columns on the daily series
//   4. Build the daily/weekly/monthly window per the windowing policy
//   5. Derive buy/exit/stop levels per window
//
// Everything here is a pure function of (bars, config): identical inputs
// produce bit-identical output.

pub mod levels;
pub mod timeframe;

use crate::error::ScreenError;
use crate::indicators::bollinger::{calculate_bollinger, BollingerBands};
use crate::indicators::macd::{calculate_macd, MacdSeries};
use crate::indicators::support_resistance::{find_levels, SupportResistance};
use crate::indicators::{atr, ema, ma, rsi, stoch_rsi};
use crate::screener_config::{ScreenerConfig, SignalDriver, WindowingPolicy};
use crate::types::{validate_series, Bar, Timeframe};

use levels::{derive_levels, LevelResult, OscReading, WindowInputs};
use timeframe::{resample, tail_slice};

/// All indicator columns for one series, aligned bar-for-bar.
///
/// Optional columns are `None` when disabled by configuration; within a
/// column, `None` marks a bar where the rolling window lacked history.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub rsi: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,
    pub bollinger: BollingerBands,
    pub macd: Option<MacdSeries>,
    pub stoch_rsi: Option<Vec<Option<f64>>>,
    pub ma_short: Option<Vec<Option<f64>>>,
    pub ma_long: Option<Vec<Option<f64>>>,
    /// `(period, column)` for each configured EMA overlay.
    pub emas: Vec<(usize, Vec<f64>)>,
    pub support_resistance: Option<SupportResistance>,
}

/// Successful analysis of one ticker: indicator columns on the daily series
/// plus derived levels for every timeframe.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerAnalysis {
    pub ticker: String,
    pub bars: Vec<Bar>,
    pub indicators: IndicatorSet,
    pub levels: Vec<LevelResult>,
    pub last_close: f64,
}

/// Pure screening computation over already-fetched series.
pub struct IndicatorEngine {
    config: ScreenerConfig,
}

impl IndicatorEngine {
    pub fn new(config: ScreenerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Compute every configured indicator column over `bars`.
    pub fn compute(&self, bars: &[Bar]) -> IndicatorSet {
        let cfg = &self.config;
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let want_stoch = cfg.enable_stoch_rsi || cfg.driver == SignalDriver::StochRsi;
        let want_macd = cfg.enable_macd || cfg.driver == SignalDriver::Macd;

        IndicatorSet {
            rsi: rsi::calculate_rsi(&closes, cfg.rsi_period),
            atr: atr::calculate_atr(bars, cfg.atr_period),
            bollinger: calculate_bollinger(&closes, cfg.bb_window, cfg.bb_num_std),
            macd: want_macd
                .then(|| calculate_macd(&closes, cfg.macd_short, cfg.macd_long, cfg.macd_signal)),
            stoch_rsi: want_stoch.then(|| stoch_rsi::calculate_stoch_rsi(&closes, cfg.rsi_period)),
            ma_short: cfg
                .enable_moving_averages
                .then(|| ma::calculate_sma(&closes, cfg.ma_short)),
            ma_long: cfg
                .enable_moving_averages
                .then(|| ma::calculate_sma(&closes, cfg.ma_long)),
            emas: cfg
                .ema_periods
                .iter()
                .map(|&p| (p, ema::calculate_ema(&closes, p)))
                .collect(),
            support_resistance: cfg.enable_support_resistance.then(|| find_levels(bars)),
        }
    }

    /// Analyse one ticker's series end to end.
    ///
    /// Fails locally with a [`ScreenError`] for invalid or too-short series;
    /// the caller converts that into an error-tagged report row.
    pub fn analyze(&self, ticker: &str, bars: &[Bar]) -> Result<TickerAnalysis, ScreenError> {
        validate_series(bars)?;

        let required = self.config.required_history();
        if bars.len() < required {
            return Err(ScreenError::InsufficientData {
                required,
                actual: bars.len(),
            });
        }

        let indicators = self.compute(bars);
        let levels = Timeframe::ALL
            .iter()
            .map(|&tf| match self.config.windowing {
                WindowingPolicy::TailWindow => self.score_tail_window(bars, &indicators, tf),
                WindowingPolicy::Resample => self.score_resampled(bars, tf),
            })
            .collect();

        Ok(TickerAnalysis {
            ticker: ticker.to_string(),
            bars: bars.to_vec(),
            indicators,
            levels,
            // bars is non-empty: required_history() is always >= 1
            last_close: bars[bars.len() - 1].close,
        })
    }

    /// Tail policy: score the trailing daily bars without recomputation.
    fn score_tail_window(
        &self,
        bars: &[Bar],
        indicators: &IndicatorSet,
        tf: Timeframe,
    ) -> LevelResult {
        let window = tail_slice(bars, tf);
        if window.is_empty() {
            return LevelResult::unavailable(tf);
        }

        let start = bars.len() - window.len();
        let last = bars.len() - 1;
        let inputs = WindowInputs {
            lower_bb: indicators.bollinger.lower[start..].iter().flatten().copied().collect(),
            upper_bb: indicators.bollinger.upper[start..].iter().flatten().copied().collect(),
            last_close: bars[last].close,
            atr: indicators.atr[last],
            reading: self.oscillator_reading(indicators, last),
        };
        derive_levels(&self.config, tf, &inputs)
    }

    /// Resample policy: rebuild the series at the coarser granularity,
    /// recompute every indicator, and score its final bar.
    fn score_resampled(&self, bars: &[Bar], tf: Timeframe) -> LevelResult {
        let coarse = resample(bars, tf);
        let Some(last_bar) = coarse.last() else {
            return LevelResult::unavailable(tf);
        };

        let indicators = self.compute(&coarse);
        let last = coarse.len() - 1;
        let inputs = WindowInputs {
            lower_bb: indicators.bollinger.lower[last].into_iter().collect(),
            upper_bb: indicators.bollinger.upper[last].into_iter().collect(),
            last_close: last_bar.close,
            atr: indicators.atr[last],
            reading: self.oscillator_reading(&indicators, last),
        };
        derive_levels(&self.config, tf, &inputs)
    }

    /// Resolve the configured driver oscillator at bar `idx`.
    ///
    /// An unavailable value reads as neither oversold nor overbought, which
    /// routes level derivation to the fallback path.
    fn oscillator_reading(&self, indicators: &IndicatorSet, idx: usize) -> OscReading {
        let cfg = &self.config;
        match cfg.driver {
            SignalDriver::Rsi => {
                let value = indicators.rsi[idx];
                OscReading {
                    value,
                    oversold: value.is_some_and(|v| v < cfg.rsi_oversold),
                    overbought: value.is_some_and(|v| v > cfg.rsi_overbought),
                }
            }
            SignalDriver::StochRsi => {
                let value = indicators
                    .stoch_rsi
                    .as_ref()
                    .and_then(|column| column[idx]);
                OscReading {
                    value,
                    oversold: value.is_some_and(|v| v < cfg.stoch_oversold),
                    overbought: value.is_some_and(|v| v > cfg.stoch_overbought),
                }
            }
            SignalDriver::Macd => match &indicators.macd {
                Some(series) if idx < series.macd.len() => {
                    let macd = series.macd[idx];
                    let signal = series.signal[idx];
                    OscReading {
                        value: Some(macd),
                        oversold: macd < signal,
                        overbought: macd > signal,
                    }
                }
                _ => OscReading::default(),
            },
        }
    }
}
