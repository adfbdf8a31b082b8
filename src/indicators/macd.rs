// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD   = EMA(close, short) - EMA(close, long)
//   Signal = EMA(MACD, signal)
//
// Both lines use the first-value-seeded no-adjust EMA recursion, so they are
// defined for every bar. MACD crossing above its signal line is read as
// bullish momentum; below as bearish.

use crate::indicators::ema::calculate_ema;

/// Aligned MACD and signal-line columns.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Compute MACD and its signal line over `closes`.
///
/// Returns empty columns when the input is empty or any span is zero.
pub fn calculate_macd(closes: &[f64], short: usize, long: usize, signal: usize) -> MacdSeries {
    if closes.is_empty() || short == 0 || long == 0 || signal == 0 {
        return MacdSeries {
            macd: Vec::new(),
            signal: Vec::new(),
        };
    }

    let short_ema = calculate_ema(closes, short);
    let long_ema = calculate_ema(closes, long);

    let macd: Vec<f64> = short_ema
        .iter()
        .zip(long_ema.iter())
        .map(|(s, l)| s - l)
        .collect();
    let signal_line = calculate_ema(&macd, signal);

    MacdSeries {
        macd,
        signal: signal_line,
    }
}
