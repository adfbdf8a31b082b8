// =============================================================================
// Stochastic RSI
// =============================================================================
//
// The stochastic oscillator applied to the RSI series instead of price:
//
//   StochRSI = (RSI - min(RSI, period)) / (max(RSI, period) - min(RSI, period))
//
// where min/max are rolling over the trailing `period` RSI values. Output is
// in [0, 1]. A zero-width range (rolling max == rolling min) is undefined
// and surfaces as `None` — it must never raise.

use crate::indicators::rsi::calculate_rsi;

/// Compute the StochRSI column for `closes`, aligned to the input.
///
/// A slot is defined only when the trailing `period` RSI values are all
/// defined, so the warm-up is roughly twice the RSI warm-up.
pub fn calculate_stoch_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let rsi = calculate_rsi(closes, period);
    stoch_of_rsi(&rsi, period)
}

/// Apply the stochastic transform to an already-computed RSI column.
pub fn stoch_of_rsi(rsi: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; rsi.len()];
    if period == 0 || rsi.len() < period {
        return out;
    }

    for i in (period - 1)..rsi.len() {
        let window = &rsi[i + 1 - period..=i];
        if window.iter().any(Option::is_none) {
            continue;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in window.iter().flatten() {
            min = min.min(*v);
            max = max.max(*v);
        }

        let range = max - min;
        if range > 0.0 {
            // Window values lie within [min, max], so this is always in [0, 1].
            out[i] = window[period - 1].map(|current| (current - min) / range);
        }
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stoch_rsi_empty_input() {
        assert!(calculate_stoch_rsi(&[], 14).is_empty());
    }

    #[test]
    fn stoch_rsi_alignment() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.9).sin() * 5.0).collect();
        let series = calculate_stoch_rsi(&closes, 14);
        assert_eq!(series.len(), closes.len());
    }

    #[test]
    fn stoch_rsi_values_in_unit_interval() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.7).sin() * 9.0).collect();
        for v in calculate_stoch_rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=1.0).contains(&v), "StochRSI {v} out of [0, 1]");
        }
    }

    #[test]
    fn stoch_rsi_zero_range_is_unavailable() {
        // Monotonic rise pins RSI at 100: rolling max == rolling min, so the
        // transform is undefined everywhere.
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        assert!(calculate_stoch_rsi(&closes, 14).iter().all(Option::is_none));
    }

    #[test]
    fn stoch_rsi_flat_series_is_unavailable() {
        // Flat closes leave RSI itself undefined, which propagates through.
        let closes = vec![100.0; 60];
        assert!(calculate_stoch_rsi(&closes, 14).iter().all(Option::is_none));
    }

    #[test]
    fn stoch_rsi_hits_bounds() {
        // Alternating strong swings: the current RSI is regularly the window
        // extreme, so both 0.0 and 1.0 should appear.
        let mut closes = Vec::new();
        let mut price = 100.0;
        for i in 0..120 {
            price += if (i / 10) % 2 == 0 { 2.0 } else { -2.0 };
            closes.push(price);
        }
        let series: Vec<f64> = calculate_stoch_rsi(&closes, 14).into_iter().flatten().collect();
        assert!(!series.is_empty());
        let max = series.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = series.iter().cloned().fold(f64::INFINITY, f64::min);
        assert!(max > 0.99, "expected a window extreme near 1.0, got {max}");
        assert!(min < 0.01, "expected a window extreme near 0.0, got {min}");
    }
}
