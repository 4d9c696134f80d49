//! Client routes.
//!
//! Commission splits are entered and shown in the 0-100 percentage scale;
//! storage keeps 0-1 fractions.

use alianza_core::client::{AdministrativeCategory, SlotInput};
use alianza_core::percent::{fraction_to_percent, fraction_to_percent_label};
use alianza_db::{
    entities::{client_commission_slots, clients},
    repositories::{
        ClientFilter, ClientRepository, ClientWithSlots, CreateClientInput, UpdateClientInput,
    },
};
use alianza_shared::types::{PageResponse, PartnerId};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::executives::ExecutivesRequest;
use super::page_request;
use crate::{AppState, error::ApiError};

/// Creates the client routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/{client_id}", get(get_client).patch(update_client))
}

/// A percentage as sent by a form: JSON string or number. Numbers keep their
/// exact decimal text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PercentInput {
    /// `"6.5"`
    Text(String),
    /// `6.5`
    Number(serde_json::Number),
}

impl PercentInput {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// One commission slot in a request.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotRequest {
    /// Partner receiving the commission.
    #[serde(default)]
    pub partner_id: Option<Uuid>,
    /// Percentage in the 0-100 scale.
    #[serde(default)]
    pub percentage: Option<PercentInput>,
}

impl From<SlotRequest> for SlotInput {
    fn from(slot: SlotRequest) -> Self {
        Self {
            partner_id: slot.partner_id.map(PartnerId::from_uuid),
            percentage: slot.percentage.map(PercentInput::into_text),
        }
    }
}

/// Request body for creating a client.
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    /// Business name.
    pub business_name: String,
    /// Administrative category code, e.g. `"CONFEDIN"`.
    #[serde(default)]
    pub ac: Option<String>,
    /// Service label.
    #[serde(default)]
    pub service: String,
    /// Assigned executives.
    #[serde(default)]
    pub executives: ExecutivesRequest,
    /// Up to 12 commission slots.
    #[serde(default)]
    pub slots: Vec<SlotRequest>,
}

/// Request body for updating a client.
#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    /// New business name.
    #[serde(default)]
    pub business_name: Option<String>,
    /// New category code; an empty string clears it.
    #[serde(default)]
    pub ac: Option<String>,
    /// New service label.
    #[serde(default)]
    pub service: Option<String>,
    /// Replacement executives; roles left out are cleared.
    #[serde(default)]
    pub executives: Option<ExecutivesRequest>,
    /// Replacement slot list.
    #[serde(default)]
    pub slots: Option<Vec<SlotRequest>>,
}

/// Query parameters for listing clients.
#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    /// Business name substring.
    pub search: Option<String>,
    /// Category code.
    pub ac: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Commission slot in a response.
#[derive(Debug, Serialize)]
pub struct SlotResponse {
    /// 1-based position.
    pub position: i16,
    /// Partner.
    pub partner_id: Option<Uuid>,
    /// Stored fraction.
    pub fraction: Option<Decimal>,
    /// Editable percentage, 6 decimals.
    pub percentage: Option<Decimal>,
}

impl From<client_commission_slots::Model> for SlotResponse {
    fn from(slot: client_commission_slots::Model) -> Self {
        Self {
            position: slot.position,
            partner_id: slot.partner_id,
            fraction: slot.percentage,
            percentage: slot.percentage.map(fraction_to_percent),
        }
    }
}

/// Client response.
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    /// Client ID.
    pub id: Uuid,
    /// Canonical business name.
    pub business_name: String,
    /// Administrative category.
    pub ac: Option<AdministrativeCategory>,
    /// Service label.
    pub service: String,
    /// Aggregate rate as a fraction.
    pub service_commission_rate: Decimal,
    /// Aggregate rate as a two-decimal percentage label.
    pub service_commission_percent: Decimal,
    /// Lead executive.
    pub executive_id: Option<Uuid>,
    /// Second executive.
    pub secondary_executive_id: Option<Uuid>,
    /// Support executive.
    pub support_executive_id: Option<Uuid>,
    /// Slots; omitted in list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<SlotResponse>>,
}

impl From<clients::Model> for ClientResponse {
    fn from(c: clients::Model) -> Self {
        Self {
            id: c.id,
            business_name: c.business_name,
            ac: c.ac.map(AdministrativeCategory::from),
            service: c.service,
            service_commission_percent: fraction_to_percent_label(c.service_commission_rate),
            service_commission_rate: c.service_commission_rate,
            executive_id: c.executive_id,
            secondary_executive_id: c.secondary_executive_id,
            support_executive_id: c.support_executive_id,
            slots: None,
        }
    }
}

impl From<ClientWithSlots> for ClientResponse {
    fn from(c: ClientWithSlots) -> Self {
        Self {
            slots: Some(c.slots.into_iter().map(SlotResponse::from).collect()),
            ..Self::from(c.client)
        }
    }
}

/// Parses an optional category code; blank means none.
fn parse_category(code: Option<&str>) -> Result<Option<AdministrativeCategory>, ApiError> {
    match code.map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => Ok(Some(code.parse()?)),
    }
}

/// GET `/clients` - List clients.
async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page_request(query.page, query.per_page);
    let filter = ClientFilter {
        search: query.search,
        ac: parse_category(query.ac.as_deref())?,
    };

    let (rows, total) = ClientRepository::new((*state.db).clone())
        .list(&filter, page.offset(), page.limit())
        .await?;

    let response = PageResponse::new(rows, page.page, page.per_page, total).map(ClientResponse::from);
    Ok((StatusCode::OK, Json(json!(response))))
}

/// POST `/clients` - Create a client with its commission slots.
async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = CreateClientInput {
        business_name: payload.business_name,
        ac: parse_category(payload.ac.as_deref())?,
        service: payload.service,
        executives: payload.executives.into(),
        slots: payload.slots.into_iter().map(SlotInput::from).collect(),
    };

    let client = ClientRepository::new((*state.db).clone())
        .create(input)
        .await?;

    info!(client_id = %client.client.id, "Client created");
    Ok((StatusCode::CREATED, Json(json!(ClientResponse::from(client)))))
}

/// GET `/clients/{client_id}` - Get a client with its slots.
async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let client = ClientRepository::new((*state.db).clone())
        .find_by_id(client_id)
        .await?;

    Ok((StatusCode::OK, Json(json!(ClientResponse::from(client)))))
}

/// PATCH `/clients/{client_id}` - Update a client.
async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ac = match payload.ac.as_deref() {
        None => None,
        Some(code) => Some(parse_category(Some(code))?),
    };
    let input = UpdateClientInput {
        business_name: payload.business_name,
        ac,
        service: payload.service,
        executives: payload.executives.map(Into::into),
        slots: payload
            .slots
            .map(|slots| slots.into_iter().map(SlotInput::from).collect()),
    };

    let today = state.business.today()?;
    let client = ClientRepository::new((*state.db).clone())
        .update(client_id, input, today)
        .await?;

    info!(client_id = %client.client.id, "Client updated");
    Ok((StatusCode::OK, Json(json!(ClientResponse::from(client)))))
}
