// =============================================================================
// Screener — batch run over the configured ticker list
// =============================================================================
//
// Tickers are screened sequentially, in input order. A failure for one ticker
// is recorded as an error row and never aborts the batch.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::engine::IndicatorEngine;
use crate::market_data::MarketDataSource;
use crate::report::{ChartSeries, ScreeningReport, ScreeningResult};
use crate::screener_config::ScreenerConfig;

/// Output of one full batch: the summary report plus per-ticker chart data
/// for every ticker that screened successfully.
#[derive(Debug, Clone)]
pub struct ScreeningRun {
    pub report: ScreeningReport,
    pub charts: HashMap<String, ChartSeries>,
}

/// Screen every configured ticker against `source`.
pub async fn run_screen(source: &dyn MarketDataSource, config: &ScreenerConfig) -> ScreeningRun {
    let engine = IndicatorEngine::new(config.clone());
    let mut results = Vec::with_capacity(config.tickers.len());
    let mut charts = HashMap::new();

    for ticker in &config.tickers {
        let outcome = match source.fetch_daily(ticker, config.lookback_days).await {
            Ok(bars) => engine.analyze(ticker, &bars),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(analysis) => {
                info!(
                    ticker,
                    bars = analysis.bars.len(),
                    last_close = analysis.last_close,
                    "screened"
                );
                charts.insert(ticker.clone(), ChartSeries::from_analysis(&analysis));
                results.push(ScreeningResult::ok(&analysis));
            }
            Err(e) => {
                warn!(ticker, error = %e, "screening failed");
                results.push(ScreeningResult::failed(ticker, &e));
            }
        }
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    info!(
        total = results.len(),
        failed,
        "screening run complete"
    );

    ScreeningRun {
        report: ScreeningReport::new(config, results),
        charts,
    }
}
