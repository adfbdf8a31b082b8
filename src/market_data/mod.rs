// =============================================================================
// Market Data Module
// =============================================================================
//
// The screener treats market data as an opaque external collaborator: a
// source that, given a ticker and a lookback, yields an ordered daily OHLCV
// series or fails with an `UpstreamFetchFailure`.

pub mod source;
pub mod stooq;

pub use source::{MarketDataSource, MemorySource};
pub use stooq::StooqSource;
