// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. The service is a read-mostly reporting
// surface; the only mutating endpoints are POST /screen (trigger a run now)
// and POST /config (replace the runtime configuration).
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::market_data::MarketDataSource;
use crate::screener::run_screen;
use crate::screener_config::ScreenerConfig;

/// Shared handler context: application state plus the market-data source used
/// by on-demand screening runs.
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<AppState>,
    pub source: Arc<dyn MarketDataSource>,
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(ctx: ApiContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/report", get(report))
        .route("/api/v1/report.csv", get(report_csv))
        .route("/api/v1/charts/:ticker", get(chart))
        .route("/api/v1/screen", post(screen_now))
        .route("/api/v1/config", get(get_config))
        .route("/api/v1/config", post(set_config))
        .layer(cors)
        .with_state(ctx)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    uptime_seconds: u64,
    server_time: i64,
}

async fn health(State(ctx): State<ApiContext>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        state_version: ctx.state.current_state_version(),
        uptime_seconds: ctx.state.uptime_seconds(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Report
// =============================================================================

async fn report(State(ctx): State<ApiContext>) -> impl IntoResponse {
    match ctx.state.last_report.read().clone() {
        Some(report) => Json(report).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "no screening run has completed yet" })),
        )
            .into_response(),
    }
}

async fn report_csv(State(ctx): State<ApiContext>) -> impl IntoResponse {
    match ctx.state.last_report.read().as_ref() {
        Some(report) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            report.to_csv(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "no screening run has completed yet" })),
        )
            .into_response(),
    }
}

// =============================================================================
// Charts
// =============================================================================

async fn chart(
    State(ctx): State<ApiContext>,
    Path(ticker): Path<String>,
) -> impl IntoResponse {
    let ticker = ticker.to_uppercase();
    match ctx.state.charts.read().get(&ticker) {
        Some(series) => Json(series.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("no chart data for {ticker}") })),
        )
            .into_response(),
    }
}

// =============================================================================
// Screen now
// =============================================================================

#[derive(Deserialize, Default)]
struct ScreenRequest {
    /// One-off ticker override; the stored configuration is untouched.
    #[serde(default)]
    tickers: Option<Vec<String>>,
}

async fn screen_now(
    State(ctx): State<ApiContext>,
    body: Option<Json<ScreenRequest>>,
) -> impl IntoResponse {
    let mut config = ctx.state.config.read().clone();
    if let Some(Json(req)) = body {
        if let Some(tickers) = req.tickers {
            config.tickers = tickers
                .into_iter()
                .map(|t| t.trim().to_uppercase())
                .filter(|t| !t.is_empty())
                .collect();
        }
    }
    info!(tickers = config.tickers.len(), "screening run requested");

    let run = run_screen(ctx.source.as_ref(), &config).await;
    let report = run.report.clone();
    ctx.state.store_run(run);

    Json(report)
}

// =============================================================================
// Configuration
// =============================================================================

async fn get_config(State(ctx): State<ApiContext>) -> impl IntoResponse {
    Json(ctx.state.config.read().clone())
}

async fn set_config(
    State(ctx): State<ApiContext>,
    Json(new_config): Json<ScreenerConfig>,
) -> impl IntoResponse {
    info!(
        tickers = new_config.tickers.len(),
        windowing = %new_config.windowing,
        "configuration update"
    );

    *ctx.state.config.write() = new_config.clone();
    ctx.state.increment_version();

    // Persist so the new settings survive a restart. A failed save keeps the
    // in-memory update.
    if let Err(e) = new_config.save(&ctx.state.config_path) {
        warn!(error = %e, path = %ctx.state.config_path, "failed to persist config");
        ctx.state.push_error(format!("config save failed: {e}"));
    }

    Json(new_config)
}
