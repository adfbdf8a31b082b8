// =============================================================================
// Central Application State — Vantage Screener
// =============================================================================
//
// The single source of truth shared by the HTTP API and the rescan loop.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for all mutable shared data.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

use crate::report::{ChartSeries, ScreeningReport};
use crate::screener::ScreeningRun;
use crate::screener_config::ScreenerConfig;

/// A recorded error event for the operational error log.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    /// ISO 8601 timestamp.
    pub at: String,
}

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

/// Central application state shared across async tasks via `Arc<AppState>`.
pub struct AppState {
    /// Monotonically increasing version counter, incremented on every
    /// meaningful state mutation. Lets pollers detect fresh data cheaply.
    pub state_version: AtomicU64,

    pub config: RwLock<ScreenerConfig>,
    /// Where the config file lives on disk, for saves triggered over the API.
    pub config_path: String,

    /// The latest completed screening run, if any.
    pub last_report: RwLock<Option<ScreeningReport>>,
    /// Chart data keyed by ticker, from the same run as `last_report`.
    pub charts: RwLock<HashMap<String, ChartSeries>>,

    pub recent_errors: RwLock<Vec<ErrorRecord>>,

    /// Instant when the service started. Used for uptime reporting.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: ScreenerConfig, config_path: impl Into<String>) -> Self {
        Self {
            state_version: AtomicU64::new(1),
            config: RwLock::new(config),
            config_path: config_path.into(),
            last_report: RwLock::new(None),
            charts: RwLock::new(HashMap::new()),
            recent_errors: RwLock::new(Vec::new()),
            start_time: std::time::Instant::now(),
        }
    }

    /// Atomically increment the state version after a mutation.
    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    /// Install the result of a completed screening run.
    pub fn store_run(&self, run: ScreeningRun) {
        *self.last_report.write() = Some(run.report);
        *self.charts.write() = run.charts;
        self.increment_version();
    }

    /// Record an error message. The log is capped at [`MAX_RECENT_ERRORS`];
    /// oldest entries are evicted first.
    pub fn push_error(&self, msg: String) {
        let record = ErrorRecord {
            message: msg,
            at: Utc::now().to_rfc3339(),
        };

        let mut errors = self.recent_errors.write();
        errors.push(record);
        while errors.len() > MAX_RECENT_ERRORS {
            errors.remove(0);
        }
        drop(errors);

        self.increment_version();
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
