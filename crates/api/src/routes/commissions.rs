//! Commission read routes for the reporting UI.

use alianza_db::repositories::{CommissionFilter, CommissionRepository};
use alianza_shared::types::PageResponse;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{page_request, period_filter};
use crate::{AppState, error::ApiError};

/// Creates the commission routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/commissions", get(list_commissions))
        .route("/commissions/payouts", get(partner_payouts))
}

/// Query parameters shared by the commission endpoints.
#[derive(Debug, Deserialize)]
pub struct CommissionQuery {
    /// Released (`true`) or held (`false`) rows.
    pub released: Option<bool>,
    /// Period month; requires `year`.
    pub month: Option<u32>,
    /// Period year; requires `month`.
    pub year: Option<i32>,
    /// Partner.
    pub partner_id: Option<Uuid>,
    /// Client.
    pub client_id: Option<Uuid>,
    /// Transfer.
    pub transfer_id: Option<Uuid>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl CommissionQuery {
    fn filter(&self) -> Result<CommissionFilter, ApiError> {
        Ok(CommissionFilter {
            released: self.released,
            period: period_filter(self.month, self.year)?,
            partner_id: self.partner_id,
            client_id: self.client_id,
            transfer_id: self.transfer_id,
        })
    }
}

/// GET `/commissions` - List commission rows.
async fn list_commissions(
    State(state): State<AppState>,
    Query(query): Query<CommissionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.filter()?;
    let page = page_request(query.page, query.per_page);

    let (rows, total) = CommissionRepository::new((*state.db).clone())
        .list(&filter, page.offset(), page.limit())
        .await?;

    let response = PageResponse::new(rows, page.page, page.per_page, total);
    Ok((StatusCode::OK, Json(json!(response))))
}

/// GET `/commissions/payouts` - Per-partner totals.
async fn partner_payouts(
    State(state): State<AppState>,
    Query(query): Query<CommissionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.filter()?;

    let payouts = CommissionRepository::new((*state.db).clone())
        .payouts(&filter)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "payouts": payouts }))))
}
