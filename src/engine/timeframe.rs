// =============================================================================
// Timeframe windowing — tail windows and calendar resampling
// =============================================================================
//
// Two interchangeable strategies build the weekly/monthly views of a daily
// series:
//
//   TailWindow — the most recent {1, 5, 20} daily bars stand in for the
//                daily/weekly/monthly windows. No recomputation.
//   Resample   — daily bars are aggregated into true weekly/monthly OHLCV
//                bars (open = first, high = max, low = min, close = last,
//                volume = sum, grouped by ISO week / calendar month) and all
//                indicators are recomputed on the aggregate.
//
// The policy is chosen once per run via `ScreenerConfig::windowing`.

use chrono::Datelike;

use crate::types::{Bar, Timeframe};

/// The trailing slice of `bars` that a tail window covers.
///
/// Returns an empty slice when the series has fewer bars than the window
/// needs — an empty window must never be scored.
pub fn tail_slice(bars: &[Bar], timeframe: Timeframe) -> &[Bar] {
    let n = timeframe.tail_bars();
    if bars.len() < n {
        &[]
    } else {
        &bars[bars.len() - n..]
    }
}

/// Aggregate a daily series into `timeframe` granularity.
///
/// Daily input passes through unchanged. Each aggregate bar is labelled with
/// the date of its last daily bar, which keeps output dates strictly
/// ascending. Groups follow the calendar: ISO week for Weekly, year + month
/// for Monthly.
pub fn resample(bars: &[Bar], timeframe: Timeframe) -> Vec<Bar> {
    if timeframe == Timeframe::Daily {
        return bars.to_vec();
    }

    let group_key = |bar: &Bar| -> (i32, u32) {
        match timeframe {
            Timeframe::Weekly => {
                let week = bar.date.iso_week();
                (week.year(), week.week())
            }
            Timeframe::Monthly => (bar.date.year(), bar.date.month()),
            Timeframe::Daily => unreachable!(),
        }
    };

    let mut out: Vec<Bar> = Vec::new();
    let mut current_key: Option<(i32, u32)> = None;

    for bar in bars {
        let key = group_key(bar);
        match (current_key, out.last_mut()) {
            (Some(open_key), Some(agg)) if open_key == key => {
                agg.high = agg.high.max(bar.high);
                agg.low = agg.low.min(bar.low);
                agg.close = bar.close;
                agg.volume += bar.volume;
                agg.date = bar.date;
            }
            _ => {
                current_key = Some(key);
                out.push(bar.clone());
            }
        }
    }

    out
}
