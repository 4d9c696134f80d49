//! Partner ("alianza") routes.

use alianza_db::{
    entities::partners,
    repositories::{CreatePartnerInput, PartnerFilter, PartnerRepository, UpdatePartnerInput},
};
use alianza_shared::types::PageResponse;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::page_request;
use crate::{AppState, error::ApiError};

/// Creates the partner routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/partners", get(list_partners).post(create_partner))
        .route("/partners/{partner_id}", get(get_partner).patch(update_partner))
}

/// Request body for creating a partner.
#[derive(Debug, Deserialize)]
pub struct CreatePartnerRequest {
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for updating a partner.
#[derive(Debug, Deserialize)]
pub struct UpdatePartnerRequest {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New email; an empty string clears it.
    #[serde(default)]
    pub email: Option<String>,
    /// New active flag.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Query parameters for listing partners.
#[derive(Debug, Deserialize)]
pub struct ListPartnersQuery {
    /// Active filter.
    pub is_active: Option<bool>,
    /// Name substring.
    pub search: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Partner response.
#[derive(Debug, Serialize)]
pub struct PartnerResponse {
    /// Partner ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Active flag.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
    /// Last update time.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<partners::Model> for PartnerResponse {
    fn from(p: partners::Model) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// GET `/partners` - List partners.
async fn list_partners(
    State(state): State<AppState>,
    Query(query): Query<ListPartnersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page_request(query.page, query.per_page);
    let filter = PartnerFilter {
        is_active: query.is_active,
        search: query.search,
    };

    let (rows, total) = PartnerRepository::new((*state.db).clone())
        .list(&filter, page.offset(), page.limit())
        .await?;

    let response = PageResponse::new(rows, page.page, page.per_page, total).map(PartnerResponse::from);
    Ok((StatusCode::OK, Json(json!(response))))
}

/// POST `/partners` - Create a partner.
async fn create_partner(
    State(state): State<AppState>,
    Json(payload): Json<CreatePartnerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let partner = PartnerRepository::new((*state.db).clone())
        .create(CreatePartnerInput {
            name: payload.name,
            email: payload.email,
        })
        .await?;

    info!(partner_id = %partner.id, "Partner created");
    Ok((StatusCode::CREATED, Json(json!(PartnerResponse::from(partner)))))
}

/// GET `/partners/{partner_id}` - Get a partner.
async fn get_partner(
    State(state): State<AppState>,
    Path(partner_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let partner = PartnerRepository::new((*state.db).clone())
        .find_by_id(partner_id)
        .await?;

    Ok((StatusCode::OK, Json(json!(PartnerResponse::from(partner)))))
}

/// PATCH `/partners/{partner_id}` - Update a partner.
async fn update_partner(
    State(state): State<AppState>,
    Path(partner_id): Path<Uuid>,
    Json(payload): Json<UpdatePartnerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = UpdatePartnerInput {
        name: payload.name,
        email: payload.email.map(|e| Some(e).filter(|e| !e.trim().is_empty())),
        is_active: payload.is_active,
    };

    let partner = PartnerRepository::new((*state.db).clone())
        .update(partner_id, input)
        .await?;

    info!(partner_id = %partner.id, "Partner updated");
    Ok((StatusCode::OK, Json(json!(PartnerResponse::from(partner)))))
}
