//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for partners, clients, transfers and commissions
//! - The release batch endpoint
//! - JSON error rendering for repository and domain errors

pub mod error;
pub mod routes;

use std::sync::Arc;

use alianza_shared::BusinessConfig;
use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Business calendar used to derive "today" for release decisions.
    pub business: Arc<BusinessConfig>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
