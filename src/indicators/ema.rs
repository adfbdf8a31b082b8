// =============================================================================
// Exponential Moving Average (EMA) — no-adjust recursion
// =============================================================================
//
// Formula:
//   α     = 2 / (span + 1)
//   EMA_0 = value_0
//   EMA_t = α · value_t + (1 - α) · EMA_{t-1}
//
// Seeded by the first value rather than an SMA warm-up, so the column is
// defined for every bar from index 0. This matches the "no-adjust"
// exponential recursion used throughout the MACD pipeline.
// =============================================================================

/// Compute the EMA series for `values` with the given `span`.
///
/// Returns a vector of the same length as the input; empty input or
/// `span == 0` yields an empty vector.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let alpha = 2.0 / (span + 1) as f64;
    let mut out = Vec::with_capacity(values.len());
    let mut prev = values[0];
    out.push(prev);

    for &v in &values[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        out.push(prev);
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
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_span_zero() {
        assert!(calculate_ema(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn ema_seeded_by_first_value() {
        let ema = calculate_ema(&[42.0, 42.0, 42.0], 10);
        assert_eq!(ema, vec![42.0, 42.0, 42.0]);
    }

    #[test]
    fn ema_full_alignment() {
        let values: Vec<f64> = (1..=25).map(|x| x as f64).collect();
        assert_eq!(calculate_ema(&values, 12).len(), 25);
    }

    #[test]
    fn ema_known_values() {
        // span 3 => α = 0.5. Seed 2.0, then 0.5·4 + 0.5·2 = 3, 0.5·8 + 0.5·3 = 5.5
        let ema = calculate_ema(&[2.0, 4.0, 8.0], 3);
        assert!((ema[0] - 2.0).abs() < 1e-12);
        assert!((ema[1] - 3.0).abs() < 1e-12);
        assert!((ema[2] - 5.5).abs() < 1e-12);
    }

    #[test]
    fn ema_tracks_rising_series_from_below() {
        let values: Vec<f64> = (1..=50).map(|x| x as f64).collect();
        let ema = calculate_ema(&values, 10);
        for (e, v) in ema.iter().zip(values.iter()).skip(1) {
            assert!(e < v, "EMA should lag a strictly rising series");
        }
    }
}
