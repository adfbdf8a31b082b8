// =============================================================================
// Stooq Daily-Bar Source — HTTP CSV endpoint
// =============================================================================
//
// Stooq serves historical daily OHLCV data as plain CSV, no API key needed:
//
//   GET https://stooq.com/q/d/l/?s=aapl.us&d1=20240101&d2=20240630&i=d
//
//   Date,Open,High,Low,Close,Volume
//   2024-01-02,185.64,186.95,183.88,185.64,82488700
//
// US tickers are suffixed with `.us` unless the caller already qualified the
// symbol. An unknown ticker yields a "No data" body rather than an error
// status.
// =============================================================================

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::error::ScreenError;
use crate::market_data::MarketDataSource;
use crate::types::Bar;

/// HTTP market-data source backed by the Stooq CSV endpoint.
#[derive(Clone)]
pub struct StooqSource {
    base_url: String,
    client: reqwest::Client,
}

impl Default for StooqSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StooqSource {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: "https://stooq.com".to_string(),
            client,
        }
    }

    /// Use a non-default base URL (test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut source = Self::new();
        source.base_url = base_url.into();
        source
    }

    /// Stooq qualifies US symbols with a `.us` suffix.
    fn normalise_symbol(ticker: &str) -> String {
        let lower = ticker.trim().to_lowercase();
        if lower.contains('.') {
            lower
        } else {
            format!("{lower}.us")
        }
    }
}

#[async_trait]
impl MarketDataSource for StooqSource {
    async fn fetch_daily(&self, ticker: &str, lookback_days: u32) -> Result<Vec<Bar>, ScreenError> {
        let symbol = Self::normalise_symbol(ticker);
        let to = Utc::now().date_naive();
        let from = to - Duration::days(i64::from(lookback_days));
        let url = format!(
            "{}/q/d/l/?s={}&d1={}&d2={}&i=d",
            self.base_url,
            symbol,
            from.format("%Y%m%d"),
            to.format("%Y%m%d"),
        );

        debug!(ticker, url = %url, "fetching daily bars");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScreenError::UpstreamFetchFailure(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScreenError::UpstreamFetchFailure(format!(
                "HTTP {status} for {ticker}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ScreenError::UpstreamFetchFailure(format!("body read failed: {e}")))?;

        let bars = parse_csv(&body)?;
        if bars.is_empty() {
            warn!(ticker, "source returned no rows");
        }
        Ok(bars)
    }
}

/// Parse the Stooq CSV payload into bars, oldest first.
///
/// A body without the expected header (e.g. the literal "No data" page) is an
/// upstream failure; a data row with fewer than six fields is a
/// `MissingColumn`.
pub fn parse_csv(body: &str) -> Result<Vec<Bar>, ScreenError> {
    const HEADER: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

    let mut lines = body.lines().filter(|l| !l.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| ScreenError::UpstreamFetchFailure("empty response body".into()))?;

    let names: Vec<&str> = header.split(',').map(str::trim).collect();
    for required in HEADER {
        if !names.contains(&required) {
            return Err(ScreenError::MissingColumn(required.to_string()));
        }
    }

    let mut bars = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < HEADER.len() {
            return Err(ScreenError::MissingColumn(
                HEADER
                    .get(fields.len())
                    .copied()
                    .unwrap_or("Volume")
                    .to_string(),
            ));
        }

        let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d").map_err(|e| {
            ScreenError::InvalidSeries(format!("bad date '{}': {e}", fields[0]))
        })?;

        let price = |i: usize, name: &str| -> Result<f64, ScreenError> {
            fields[i]
                .parse::<f64>()
                .map_err(|_| ScreenError::MissingColumn(name.to_string()))
        };

        // Stooq occasionally reports volume as a float or leaves it empty.
        let volume = if fields[5].is_empty() {
            0
        } else {
            fields[5].parse::<f64>().unwrap_or(0.0).round().max(0.0) as u64
        };

        bars.push(Bar {
            date,
            open: price(1, "Open")?,
            high: price(2, "High")?,
            low: price(3, "Low")?,
            close: price(4, "Close")?,
            volume,
        });
    }

    Ok(bars)
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalise_adds_us_suffix() {
        assert_eq!(StooqSource::normalise_symbol(" AAPL "), "aapl.us");
        assert_eq!(StooqSource::normalise_symbol("BMW.DE"), "bmw.de");
    }

    #[test]
    fn parse_well_formed_csv() {
        let body = "Date,Open,High,Low,Close,Volume\n\
                    2024-01-02,185.64,186.95,183.88,185.64,82488700\n\
                    2024-01-03,184.22,185.88,183.43,184.25,58414500\n";
        let bars = parse_csv(body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!((bars[1].close - 184.25).abs() < 1e-9);
        assert_eq!(bars[0].volume, 82_488_700);
    }

    #[test]
    fn parse_rejects_missing_header() {
        let err = parse_csv("No data\n").unwrap_err();
        assert!(matches!(err, ScreenError::MissingColumn(_)));
    }

    #[test]
    fn parse_rejects_short_row() {
        let body = "Date,Open,High,Low,Close,Volume\n2024-01-02,185.64,186.95\n";
        let err = parse_csv(body).unwrap_err();
        assert_eq!(err, ScreenError::MissingColumn("Low".to_string()));
    }

    #[test]
    fn parse_rejects_bad_price() {
        let body = "Date,Open,High,Low,Close,Volume\n2024-01-02,x,186.95,183.88,185.64,1\n";
        assert_eq!(
            parse_csv(body).unwrap_err(),
            ScreenError::MissingColumn("Open".to_string())
        );
    }

    #[test]
    fn parse_tolerates_empty_volume() {
        let body = "Date,Open,High,Low,Close,Volume\n2024-01-02,1.0,2.0,0.5,1.5,\n";
        let bars = parse_csv(body).unwrap();
        assert_eq!(bars[0].volume, 0);
    }

    #[test]
    fn parse_empty_body_is_upstream_failure() {
        assert!(matches!(
            parse_csv(""),
            Err(ScreenError::UpstreamFetchFailure(_))
        ));
    }
}
