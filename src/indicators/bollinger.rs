// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = rolling SMA of close over `window` bars.
// Upper / lower = middle ± `num_std` × rolling population standard deviation.
//
// All three columns are aligned to the input: the first `window - 1` entries
// are `None`.

/// Aligned Bollinger Band columns.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// # Edge cases
/// - `window == 0` or a series shorter than `window` => all-`None` columns
/// - a flat window has zero deviation: upper == middle == lower
/// - non-finite closes poison every window containing them (=> `None`)
pub fn calculate_bollinger(closes: &[f64], window: usize, num_std: f64) -> BollingerBands {
    let n = closes.len();
    let mut bands = BollingerBands {
        upper: vec![None; n],
        middle: vec![None; n],
        lower: vec![None; n],
    };
    if window == 0 || n < window {
        return bands;
    }

    for i in (window - 1)..n {
        let slice = &closes[i + 1 - window..=i];
        if slice.iter().any(|v| !v.is_finite()) {
            continue;
        }

        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / window as f64;
        let std_dev = variance.sqrt();

        bands.middle[i] = Some(mean);
        bands.upper[i] = Some(mean + num_std * std_dev);
        bands.lower[i] = Some(mean - num_std * std_dev);
    }

    bands
}
