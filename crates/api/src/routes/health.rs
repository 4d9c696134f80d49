//! Health check endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// `up` or `down`.
    pub database: &'static str,
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = match state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Database ping failed");
            false
        }
    };

    let (status, body) = if database_up {
        (StatusCode::OK, HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            database: "up",
        })
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, HealthResponse {
            status: "degraded",
            version: env!("CARGO_PKG_VERSION"),
            database: "down",
        })
    };

    (status, Json(body))
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
