//! Axum-based HTTP status endpoint.
//!
//! Read-only by design: the device accepts no remote commands, it only
//! reports what the clock discipline is doing. Endpoints:
//!
//! - GET `/api/status` - current [`TimeStatus`] as JSON
//! - GET `/healthz` - liveness probe
//!
//! The main loop owns the time source; it publishes snapshots into a
//! [`StatusCell`] and the handlers read the latest one. That keeps the
//! timing core free of any service dependency and the handlers free of
//! locks around the real state.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_gpstime::services::{serve_status, StatusCell};
//!
//! let cell = Arc::new(StatusCell::new());
//!
//! // Main loop, once per iteration:
//! cell.publish(gps.status());
//!
//! // Server task:
//! serve_status(cell.clone(), &config.web).await?;
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

use axum::{extract::State, routing::get, Json, Router};

use crate::config::WebConfig;
use crate::source::TimeStatus;

/// Source of status snapshots for the HTTP handlers.
pub trait StatusProvider: Send + Sync + 'static {
    /// The snapshot to serve right now.
    fn status(&self) -> TimeStatus;
}

/// Snapshot cell the main loop publishes into.
///
/// Before the first publish it reports the default (invalid, all-zero)
/// status, which is also what a freshly booted device would report.
#[derive(Debug, Default)]
pub struct StatusCell {
    latest: RwLock<TimeStatus>,
}

impl StatusCell {
    /// Creates a cell holding the default status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the published snapshot.
    pub fn publish(&self, status: TimeStatus) {
        *self.latest.write().expect("status cell poisoned") = status;
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> TimeStatus {
        *self.latest.read().expect("status cell poisoned")
    }
}

impl StatusProvider for StatusCell {
    fn status(&self) -> TimeStatus {
        self.latest()
    }
}

// ============================================================================
// Routes
// ============================================================================

/// GET /api/status - current time source state.
async fn get_status<P: StatusProvider>(State(provider): State<Arc<P>>) -> Json<TimeStatus> {
    Json(provider.status())
}

/// GET /healthz - liveness probe.
async fn healthz() -> &'static str {
    "ok"
}

/// Builds the status router over any provider.
pub fn router<P: StatusProvider>(provider: Arc<P>) -> Router {
    Router::new()
        .route("/api/status", get(get_status::<P>))
        .route("/healthz", get(healthz))
        .with_state(provider)
}

/// Binds and serves the status endpoint until the task is dropped.
pub async fn serve_status<P: StatusProvider>(
    provider: Arc<P>,
    config: &WebConfig,
) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("status server listening on {addr}");
    axum::serve(listener, router(provider)).await?;
    Ok(())
}
