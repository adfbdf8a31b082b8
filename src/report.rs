// =============================================================================
// Screening Report — summary rows, CSV export, chart series
// =============================================================================
//
// The presentation boundary: everything here is a serialisable snapshot of
// one screening run. Levels are rounded to 2 decimal places at this layer
// only; the engine keeps full precision.

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::TickerAnalysis;
use crate::error::ScreenError;
use crate::screener_config::ScreenerConfig;

/// Round for presentation. Engine output is never rounded.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Rounded trade levels for one timeframe.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimeframeLevels {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<f64>,
}

/// Summary row for a successfully screened ticker.
#[derive(Debug, Clone, Serialize)]
pub struct TickerSummary {
    pub last_close: f64,
    pub daily: TimeframeLevels,
    pub weekly: TimeframeLevels,
    pub monthly: TimeframeLevels,
}

/// One row of the report: a summary or a failure reason, never both.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningResult {
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TickerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScreeningResult {
    pub fn ok(analysis: &TickerAnalysis) -> Self {
        let tf = |i: usize| {
            let level = &analysis.levels[i];
            TimeframeLevels {
                buy: level.buy.map(round2),
                exit: level.exit.map(round2),
                stop_loss: level.stop_loss.map(round2),
                driver: level.driver_value.map(round2),
            }
        };
        Self {
            ticker: analysis.ticker.clone(),
            summary: Some(TickerSummary {
                last_close: round2(analysis.last_close),
                daily: tf(0),
                weekly: tf(1),
                monthly: tf(2),
            }),
            error: None,
        }
    }

    pub fn failed(ticker: &str, error: &ScreenError) -> Self {
        Self {
            ticker: ticker.to_string(),
            summary: None,
            error: Some(error.to_string()),
        }
    }
}

/// Snapshot of one complete screening run, in input ticker order.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    /// ISO 8601 timestamp of the run.
    pub generated_at: String,
    pub windowing: String,
    pub driver: String,
    pub results: Vec<ScreeningResult>,
}

impl ScreeningReport {
    pub fn new(config: &ScreenerConfig, results: Vec<ScreeningResult>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            windowing: config.windowing.to_string(),
            driver: config.driver.to_string(),
            results,
        }
    }

    /// Column names of the summary table, also the CSV header.
    pub const COLUMNS: [&'static str; 12] = [
        "Ticker",
        "Last Close",
        "Daily Buy",
        "Daily Exit",
        "Daily Stop Loss",
        "Weekly Buy",
        "Weekly Exit",
        "Weekly Stop Loss",
        "Monthly Buy",
        "Monthly Exit",
        "Monthly Stop Loss",
        "Error",
    ];

    /// Render the report as CSV. The header row matches [`Self::COLUMNS`]
    /// exactly; unavailable levels render as `N/A`.
    pub fn to_csv(&self) -> String {
        let mut out = Self::COLUMNS.join(",");
        out.push('\n');

        for row in &self.results {
            let mut fields: Vec<String> = vec![csv_escape(&row.ticker)];
            match &row.summary {
                Some(summary) => {
                    fields.push(format!("{:.2}", summary.last_close));
                    for tf in [&summary.daily, &summary.weekly, &summary.monthly] {
                        fields.push(level_cell(tf.buy));
                        fields.push(level_cell(tf.exit));
                        fields.push(level_cell(tf.stop_loss));
                    }
                    fields.push(String::new());
                }
                None => {
                    // 10 value columns stay empty on a failed row.
                    fields.extend(std::iter::repeat(String::new()).take(10));
                    fields.push(csv_escape(row.error.as_deref().unwrap_or("unknown error")));
                }
            }
            out.push_str(&fields.join(","));
            out.push('\n');
        }

        out
    }
}

fn level_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// =============================================================================
// Chart series
// =============================================================================

/// Per-ticker time series for the charting front end: close price plus the
/// configured overlays, all aligned to `dates`.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub ticker: String,
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub upper_bb: Vec<Option<f64>>,
    pub lower_bb: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma_short: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma_long: Option<Vec<Option<f64>>>,
    /// Configured EMA overlays.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emas: Vec<EmaOverlay>,
    /// The driving oscillator column (RSI by default).
    pub oscillator: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supports: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resistances: Vec<f64>,
}

/// One EMA line for the charts.
#[derive(Debug, Clone, Serialize)]
pub struct EmaOverlay {
    pub period: usize,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn from_analysis(analysis: &TickerAnalysis) -> Self {
        let set = &analysis.indicators;
        let (supports, resistances) = set
            .support_resistance
            .as_ref()
            .map(|sr| (sr.supports.clone(), sr.resistances.clone()))
            .unwrap_or_default();

        Self {
            ticker: analysis.ticker.clone(),
            dates: analysis.bars.iter().map(|b| b.date).collect(),
            close: analysis.bars.iter().map(|b| b.close).collect(),
            upper_bb: set.bollinger.upper.clone(),
            lower_bb: set.bollinger.lower.clone(),
            ma_short: set.ma_short.clone(),
            ma_long: set.ma_long.clone(),
            emas: set
                .emas
                .iter()
                .map(|(period, values)| EmaOverlay {
                    period: *period,
                    values: values.clone(),
                })
                .collect(),
            oscillator: set.rsi.clone(),
            supports,
            resistances,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::IndicatorEngine;
    use crate::types::Bar;
    use chrono::NaiveDate;

    fn analysis() -> TickerAnalysis {
        let config = ScreenerConfig {
            enable_moving_averages: false,
            enable_stoch_rsi: false,
            enable_macd: false,
            ..ScreenerConfig::default()
        };
        let bars: Vec<Bar> = (0..40)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.4).sin() * 5.0;
                Bar {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 100,
                }
            })
            .collect();
        IndicatorEngine::new(config).analyze("AAPL", &bars).unwrap()
    }

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(93.3333333), 93.33);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn ok_row_is_rounded() {
        let row = ScreeningResult::ok(&analysis());
        let summary = row.summary.unwrap();
        let buy = summary.daily.buy.unwrap();
        assert_eq!(buy, round2(buy));
        assert!(row.error.is_none());
    }

    #[test]
    fn failed_row_carries_reason() {
        let row = ScreeningResult::failed(
            "ZZZZ",
            &ScreenError::UpstreamFetchFailure("timeout".into()),
        );
        assert!(row.summary.is_none());
        assert_eq!(row.error.unwrap(), "data fetch failed: timeout");
    }

    #[test]
    fn csv_header_matches_columns() {
        let report = ScreeningReport::new(&ScreenerConfig::default(), vec![]);
        let csv = report.to_csv();
        assert_eq!(csv.lines().next().unwrap(), ScreeningReport::COLUMNS.join(","));
    }

    #[test]
    fn csv_has_one_row_per_result() {
        let rows = vec![
            ScreeningResult::ok(&analysis()),
            ScreeningResult::failed(
                "ZZZZ",
                &ScreenError::UpstreamFetchFailure("no data for ZZZZ".into()),
            ),
        ];
        let report = ScreeningReport::new(&ScreenerConfig::default(), rows);
        let csv = report.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("AAPL,"));
        assert!(lines[2].starts_with("ZZZZ,"));
        assert!(lines[2].contains("no data for ZZZZ"));
        // Every row has exactly as many fields as the header.
        for line in &lines {
            assert_eq!(line.split(',').count(), ScreeningReport::COLUMNS.len());
        }
    }

    #[test]
    fn csv_unavailable_levels_render_na() {
        let mut analysis = analysis();
        for level in &mut analysis.levels {
            level.buy = None;
            level.stop_loss = None;
        }
        let report = ScreeningReport::new(
            &ScreenerConfig::default(),
            vec![ScreeningResult::ok(&analysis)],
        );
        assert!(report.to_csv().lines().nth(1).unwrap().contains("N/A"));
    }

    #[test]
    fn csv_escapes_embedded_delimiters() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn chart_series_is_aligned() {
        let a = analysis();
        let chart = ChartSeries::from_analysis(&a);
        assert_eq!(chart.dates.len(), a.bars.len());
        assert_eq!(chart.close.len(), a.bars.len());
        assert_eq!(chart.upper_bb.len(), a.bars.len());
        assert_eq!(chart.oscillator.len(), a.bars.len());
        assert!(chart.ma_short.is_none());
        assert_eq!(chart.emas.len(), 1);
        assert_eq!(chart.emas[0].period, 20);
        assert_eq!(chart.emas[0].values.len(), a.bars.len());
    }
}
