//! API route definitions.

use alianza_core::commission::CommissionPeriod;
use alianza_shared::types::PageRequest;
use axum::Router;

use crate::{AppState, error::ApiError};

pub mod clients;
pub mod commissions;
pub mod executives;
pub mod health;
pub mod partners;
pub mod releases;
pub mod transfers;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(partners::routes())
        .merge(executives::routes())
        .merge(clients::routes())
        .merge(transfers::routes())
        .merge(commissions::routes())
        .merge(releases::routes())
}

/// Normalized page request from optional query parameters.
pub(crate) fn page_request(page: Option<u32>, per_page: Option<u32>) -> PageRequest {
    let defaults = PageRequest::default();
    PageRequest {
        page: page.unwrap_or(defaults.page),
        per_page: per_page.unwrap_or(defaults.per_page),
    }
    .normalized()
}

/// Period filter from optional `month`/`year` query parameters. Both or
/// neither must be present.
pub(crate) fn period_filter(
    month: Option<u32>,
    year: Option<i32>,
) -> Result<Option<CommissionPeriod>, ApiError> {
    match (month, year) {
        (None, None) => Ok(None),
        (Some(month), Some(year)) => Ok(Some(CommissionPeriod::new(month, year)?)),
        _ => Err(ApiError::validation("month and year must be given together")),
    }
}
