// =============================================================================
// Vantage Screener — Main Entry Point
// =============================================================================
//
// Boots the HTTP API, runs an initial screening pass over the configured
// tickers, then rescans on a fixed interval until shut down.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod engine;
mod error;
mod indicators;
mod market_data;
mod report;
mod screener;
mod screener_config;
mod types;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::ApiContext;
use crate::app_state::AppState;
use crate::market_data::{MarketDataSource, StooqSource};
use crate::screener::run_screen;
use crate::screener_config::ScreenerConfig;

const CONFIG_PATH: &str = "screener_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           Vantage Screener — Starting Up                 ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = ScreenerConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ScreenerConfig::default()
    });

    // Override tickers from env if available.
    if let Ok(tickers) = std::env::var("VANTAGE_TICKERS") {
        config.tickers = tickers
            .split(',')
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
    }

    info!(tickers = ?config.tickers, "Configured watch list");
    info!(
        windowing = %config.windowing,
        driver = %config.driver,
        lookback_days = config.lookback_days,
        "Screening parameters"
    );

    // ── 2. Build shared state & data source ──────────────────────────────
    let state = Arc::new(AppState::new(config, CONFIG_PATH));
    let source: Arc<dyn MarketDataSource> = Arc::new(StooqSource::new());

    // ── 3. Start the API server ──────────────────────────────────────────
    let bind_addr =
        std::env::var("VANTAGE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());

    let api_ctx = ApiContext {
        state: state.clone(),
        source: source.clone(),
    };
    let bind_addr_clone = bind_addr.clone();
    tokio::spawn(async move {
        let app = api::router(api_ctx);
        let listener = match tokio::net::TcpListener::bind(&bind_addr_clone).await {
            Ok(l) => l,
            Err(e) => {
                error!(addr = %bind_addr_clone, error = %e, "Failed to bind API server");
                return;
            }
        };
        info!(addr = %bind_addr_clone, "API server listening");
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server failed");
        }
    });

    // ── 4. Rescan loop ───────────────────────────────────────────────────
    let scan_state = state.clone();
    let scan_source = source.clone();
    tokio::spawn(async move {
        // Initial pass right away, then on the configured interval.
        loop {
            let config = scan_state.config.read().clone();
            info!(tickers = config.tickers.len(), "screening pass starting");

            let run = run_screen(scan_source.as_ref(), &config).await;
            for result in &run.report.results {
                if let Some(reason) = &result.error {
                    scan_state.push_error(format!("{}: {reason}", result.ticker));
                }
            }
            scan_state.store_run(run);

            let interval_secs = scan_state.config.read().rescan_interval_secs;
            if interval_secs == 0 {
                info!("rescan interval is 0 — automatic rescans disabled");
                return;
            }
            tokio::time::sleep(tokio::time::Duration::from_secs(interval_secs)).await;
        }
    });

    info!("All subsystems running. Press Ctrl+C to stop.");

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping gracefully");

    if let Err(e) = state.config.read().save(CONFIG_PATH) {
        error!(error = %e, "Failed to save config on shutdown");
    }

    info!("Vantage Screener shut down complete.");
    Ok(())
}
