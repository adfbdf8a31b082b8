// =============================================================================
// Support / Resistance — local extrema scan
// =============================================================================
//
// An interior bar is a support when its low is strictly below both
// neighbours' lows, and a resistance when its high is strictly above both
// neighbours' highs. The scan skips the first two and last two bars so a
// candidate always has settled bars on both sides.

use crate::types::Bar;

/// Ordered support and resistance price levels found in `bars`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupportResistance {
    pub supports: Vec<f64>,
    pub resistances: Vec<f64>,
}

/// Scan `bars` for local extrema. Series with fewer than 5 bars produce no
/// levels.
pub fn find_levels(bars: &[Bar]) -> SupportResistance {
    let mut levels = SupportResistance::default();
    if bars.len() < 5 {
        return levels;
    }

    for i in 2..bars.len() - 2 {
        let bar = &bars[i];
        if bar.low < bars[i - 1].low && bar.low < bars[i + 1].low {
            levels.supports.push(bar.low);
        }
        if bar.high > bars[i - 1].high && bar.high > bars[i + 1].high {
            levels.resistances.push(bar.high);
        }
    }

    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: i32, high: f64, low: f64) -> Bar {
        let mid = (high + low) / 2.0;
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + chrono::Duration::days(day.into()),
            open: mid,
            high,
            low,
            close: mid,
            volume: 500,
        }
    }

    #[test]
    fn too_short_series_has_no_levels() {
        let bars: Vec<Bar> = (0..4).map(|i| bar(i, 101.0, 99.0)).collect();
        assert_eq!(find_levels(&bars), SupportResistance::default());
    }

    #[test]
    fn finds_a_single_valley_and_peak() {
        let bars = vec![
            bar(0, 101.0, 99.0),
            bar(1, 102.0, 100.0),
            bar(2, 100.5, 95.0), // valley at 95
            bar(3, 103.0, 100.0),
            bar(4, 110.0, 101.0), // peak at 110
            bar(5, 104.0, 100.5),
            bar(6, 105.0, 101.0),
        ];
        let levels = find_levels(&bars);
        assert_eq!(levels.supports, vec![95.0]);
        assert_eq!(levels.resistances, vec![110.0]);
    }

    #[test]
    fn flat_series_has_no_levels() {
        // Strict inequality: equal neighbours never qualify.
        let bars: Vec<Bar> = (0..10).map(|i| bar(i, 101.0, 99.0)).collect();
        let levels = find_levels(&bars);
        assert!(levels.supports.is_empty());
        assert!(levels.resistances.is_empty());
    }

    #[test]
    fn edges_are_excluded() {
        // Extremes at bars 0, 1, n-2 and n-1 must be ignored.
        let bars = vec![
            bar(0, 120.0, 80.0),
            bar(1, 119.0, 81.0),
            bar(2, 105.0, 98.0),
            bar(3, 106.0, 97.0),
            bar(4, 105.5, 98.5),
            bar(5, 121.0, 79.0),
            bar(6, 122.0, 78.0),
        ];
        let levels = find_levels(&bars);
        assert_eq!(levels.supports, vec![97.0]);
        assert_eq!(levels.resistances, vec![106.0]);
    }

    #[test]
    fn levels_preserve_scan_order() {
        let bars = vec![
            bar(0, 101.0, 99.0),
            bar(1, 102.0, 100.0),
            bar(2, 101.0, 94.0),
            bar(3, 102.0, 100.0),
            bar(4, 101.0, 92.0),
            bar(5, 102.0, 100.0),
            bar(6, 101.0, 99.0),
        ];
        let levels = find_levels(&bars);
        assert_eq!(levels.supports, vec![94.0, 92.0]);
    }
}
