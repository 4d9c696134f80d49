//! Executive routes.

use alianza_core::client::ExecutiveAssignment;
use alianza_db::{
    entities::executives,
    repositories::{CreateExecutiveInput, ExecutiveRepository, UpdateExecutiveInput},
};
use alianza_shared::types::{ExecutiveId, PageResponse};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::page_request;
use crate::{AppState, error::ApiError};

/// Creates the executive routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/executives", get(list_executives).post(create_executive))
        .route(
            "/executives/{executive_id}",
            get(get_executive).patch(update_executive),
        )
}

/// Executive assignment in client and transfer request bodies. A role left
/// out is unset.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ExecutivesRequest {
    /// Lead executive.
    #[serde(default)]
    pub executive_id: Option<Uuid>,
    /// Second executive.
    #[serde(default)]
    pub secondary_executive_id: Option<Uuid>,
    /// Support executive.
    #[serde(default)]
    pub support_executive_id: Option<Uuid>,
}

impl From<ExecutivesRequest> for ExecutiveAssignment {
    fn from(e: ExecutivesRequest) -> Self {
        Self {
            executive: e.executive_id.map(ExecutiveId::from_uuid),
            secondary: e.secondary_executive_id.map(ExecutiveId::from_uuid),
            support: e.support_executive_id.map(ExecutiveId::from_uuid),
        }
    }
}

/// Request body for creating an executive.
#[derive(Debug, Deserialize)]
pub struct CreateExecutiveRequest {
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for updating an executive. An empty email clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateExecutiveRequest {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New email.
    #[serde(default)]
    pub email: Option<String>,
    /// New active flag.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Query parameters for listing executives.
#[derive(Debug, Deserialize)]
pub struct ListExecutivesQuery {
    /// Active filter.
    pub is_active: Option<bool>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// GET `/executives` - List executives.
async fn list_executives(
    State(state): State<AppState>,
    Query(query): Query<ListExecutivesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page_request(query.page, query.per_page);

    let (rows, total): (Vec<executives::Model>, u64) =
        ExecutiveRepository::new((*state.db).clone())
            .list(query.is_active, page.offset(), page.limit())
            .await?;

    Ok((
        StatusCode::OK,
        Json(json!(PageResponse::new(rows, page.page, page.per_page, total))),
    ))
}

/// POST `/executives` - Create an executive.
async fn create_executive(
    State(state): State<AppState>,
    Json(payload): Json<CreateExecutiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let executive = ExecutiveRepository::new((*state.db).clone())
        .create(CreateExecutiveInput {
            name: payload.name,
            email: payload.email,
        })
        .await?;

    info!(executive_id = %executive.id, "Executive created");
    Ok((StatusCode::CREATED, Json(json!(executive))))
}

/// GET `/executives/{executive_id}` - Get an executive.
async fn get_executive(
    State(state): State<AppState>,
    Path(executive_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let executive = ExecutiveRepository::new((*state.db).clone())
        .find_by_id(executive_id)
        .await?;

    Ok((StatusCode::OK, Json(json!(executive))))
}

/// PATCH `/executives/{executive_id}` - Update an executive.
async fn update_executive(
    State(state): State<AppState>,
    Path(executive_id): Path<Uuid>,
    Json(payload): Json<UpdateExecutiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = UpdateExecutiveInput {
        name: payload.name,
        email: payload.email.map(Some),
        is_active: payload.is_active,
    };

    let executive = ExecutiveRepository::new((*state.db).clone())
        .update(executive_id, input)
        .await?;

    info!(executive_id = %executive.id, "Executive updated");
    Ok((StatusCode::OK, Json(json!(executive))))
}
