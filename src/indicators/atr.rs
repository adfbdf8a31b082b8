// =============================================================================
// Average True Range (ATR) — rolling-mean variant
// =============================================================================
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
// The very first bar has no previous close; its TR is simply H - L.
//
// ATR is the plain rolling mean of TR over `period` bars (not Wilder's
// recursive smoothing), so each output depends only on the most recent
// `period` true ranges.
// =============================================================================

use crate::types::Bar;

/// Compute the ATR column for `bars`, aligned to the input.
///
/// The first `period - 1` entries are `None`; from index `period - 1` onward
/// each entry is the mean of the trailing `period` true ranges.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - any non-finite TR in the window => `None` for that slot
pub fn calculate_atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return out;
    }

    let tr: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let hl = bar.high - bar.low;
            if i == 0 {
                hl
            } else {
                let prev_close = bars[i - 1].close;
                let hc = (bar.high - prev_close).abs();
                let lc = (bar.low - prev_close).abs();
                hl.max(hc).max(lc)
            }
        })
        .collect();

    for i in (period - 1)..bars.len() {
        let window = &tr[i + 1 - period..=i];
        if window.iter().all(|v| v.is_finite()) {
            out[i] = Some(window.iter().sum::<f64>() / period as f64);
        }
    }

    out
}
