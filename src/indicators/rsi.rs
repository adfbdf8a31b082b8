// =============================================================================
// Relative Strength Index (RSI) — rolling-mean variant
// =============================================================================
//
// Step 1 — Compute day-over-day close deltas.
// Step 2 — gain = rolling mean of max(delta, 0) over `period` deltas
//          loss = rolling mean of max(-delta, 0) over `period` deltas
// Step 3 — RS  = gain / loss
//          RSI = 100 - 100 / (1 + RS)
//
// This is the plain rolling-mean formulation (not Wilder's recursive
// smoothing): each output depends only on the most recent `period` deltas.
//
// Thresholds:  RSI > 70 => overbought,  RSI < 30 => oversold.
// =============================================================================

/// Compute the RSI column for `closes`, aligned to the input.
///
/// The returned vector has exactly `closes.len()` entries. The first `period`
/// entries are `None` (an RSI value needs `period` deltas of history).
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - `loss == 0` with gains present => RSI clamped to 100.0
/// - `gain == 0 && loss == 0` (flat window) => `None` — zero-over-zero is
///   undefined and must surface as unavailable, never as a sentinel
/// - non-finite input deltas => `None` for every window containing them
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    // Bar index i consumes deltas[i - period .. i]; valid from i = period.
    for i in period..closes.len() {
        let window = &deltas[i - period..i];
        if window.iter().any(|d| !d.is_finite()) {
            continue;
        }

        let (sum_gain, sum_loss) = window.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l + d.abs())
            }
        });

        let gain = sum_gain / period as f64;
        let loss = sum_loss / period as f64;

        out[i] = if gain == 0.0 && loss == 0.0 {
            None
        } else if loss == 0.0 {
            Some(100.0)
        } else {
            let rs = gain / loss;
            Some(100.0 - 100.0 / (1.0 + rs))
        };
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
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert_eq!(calculate_rsi(&[1.0, 2.0, 3.0], 0), vec![None, None, None]);
    }

    #[test]
    fn rsi_insufficient_data_all_none() {
        // 14 closes => 13 deltas, fewer than period = 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert!(calculate_rsi(&closes, 14).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_alignment_and_warmup() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), closes.len());
        assert!(series[..14].iter().all(Option::is_none));
        assert!(series[14..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_is_unavailable() {
        // Constant closes: zero-over-zero — every slot stays None.
        let closes = vec![100.0; 30];
        assert!(calculate_rsi(&closes, 14).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13, 44.01, 44.90,
        ];
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_last_value_valid_on_15_bars() {
        // 15 bars give exactly 14 deltas: only the final slot is defined.
        let closes = vec![
            100.0, 102.0, 101.0, 105.0, 99.0, 103.0, 107.0, 110.0, 108.0, 112.0, 115.0, 111.0,
            109.0, 113.0, 117.0,
        ];
        let series = calculate_rsi(&closes, 14);
        assert!(series[..14].iter().all(Option::is_none));
        let last = series[14].expect("15th bar RSI should be defined");
        assert!((0.0..=100.0).contains(&last));
    }

    #[test]
    fn rsi_uses_only_recent_window() {
        // A big early spike must fall out of the window once `period` deltas
        // have passed — outputs for identical tails must match.
        let mut a: Vec<f64> = vec![100.0, 500.0];
        let mut b: Vec<f64> = vec![100.0, 100.5];
        let tail: Vec<f64> = (1..=20).map(|x| 100.0 + x as f64 * 0.3).collect();
        a.extend(&tail);
        b.extend(&tail);
        let ra = calculate_rsi(&a, 5);
        let rb = calculate_rsi(&b, 5);
        assert_eq!(ra.last().unwrap(), rb.last().unwrap());
    }
}
