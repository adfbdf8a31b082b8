// =============================================================================
// MarketDataSource trait + in-memory fixture source
// =============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::ScreenError;
use crate::types::Bar;

/// Supplies daily OHLCV history for a ticker.
///
/// Implementations may be slow (network I/O) and may fail; both are surfaced
/// as a per-ticker [`ScreenError`] and never abort a batch.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch up to `lookback_days` calendar days of daily bars for `ticker`,
    /// oldest first.
    async fn fetch_daily(&self, ticker: &str, lookback_days: u32) -> Result<Vec<Bar>, ScreenError>;
}

/// In-memory source backed by pre-loaded series. Used by tests and demo mode;
/// unknown tickers fail the same way a network source would.
#[derive(Default)]
pub struct MemorySource {
    series: RwLock<HashMap<String, Vec<Bar>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the series for a ticker.
    pub fn insert(&self, ticker: impl Into<String>, bars: Vec<Bar>) {
        self.series.write().insert(ticker.into(), bars);
    }
}

#[async_trait]
impl MarketDataSource for MemorySource {
    async fn fetch_daily(&self, ticker: &str, _lookback_days: u32) -> Result<Vec<Bar>, ScreenError> {
        self.series
            .read()
            .get(ticker)
            .cloned()
            .ok_or_else(|| ScreenError::UpstreamFetchFailure(format!("no data for {ticker}")))
    }
}
