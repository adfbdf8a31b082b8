// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Rolling mean of close over `n` bars. Used for the 50-day and 200-day trend
// lines in the report charts.

/// Compute the SMA column for `closes`, aligned to the input.
///
/// The first `n - 1` entries are `None`. `n == 0` yields an all-`None`
/// column.
pub fn calculate_sma(closes: &[f64], n: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if n == 0 || closes.len() < n {
        return out;
    }

    // Maintain a running sum instead of re-summing every window.
    let mut sum: f64 = closes[..n].iter().sum();
    out[n - 1] = finite_mean(sum, n);
    for i in n..closes.len() {
        sum += closes[i] - closes[i - n];
        out[i] = finite_mean(sum, n);
    }

    out
}

fn finite_mean(sum: f64, n: usize) -> Option<f64> {
    let mean = sum / n as f64;
    mean.is_finite().then_some(mean)
}
