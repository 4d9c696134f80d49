//! Transfer ("dispersion") routes.
//!
//! Writes go through the repository's transactional path, so the response
//! already carries the derived commission figures and regenerated rows.
//! Amounts are range-checked before any database access.

use alianza_core::commission::TransferCalculator;
use alianza_db::{
    entities::{
        commissions,
        sea_orm_active_enums::{
            InvoicingCompany, PaymentMethod, PaymentStatus, PeriodStatus, ProcessStatus,
        },
        transfers,
    },
    repositories::{
        CreateTransferInput, TransferFilter, TransferRepository, TransferWithCommissions,
        UpdateTransferInput,
    },
};
use alianza_shared::types::PageResponse;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::executives::ExecutivesRequest;
use super::{page_request, period_filter};
use crate::{AppState, error::ApiError};

/// Creates the transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transfers", get(list_transfers).post(create_transfer))
        .route(
            "/transfers/{transfer_id}",
            get(get_transfer).patch(update_transfer).delete(delete_transfer),
        )
}

/// Request body for creating a transfer.
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    /// Owning client.
    #[serde(default)]
    pub client_id: Option<Uuid>,
    /// Transfer date (YYYY-MM-DD).
    pub transfer_date: NaiveDate,
    /// Base amount; omitted means zero.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Executives; roles left out are taken from the client.
    #[serde(default)]
    pub executives: ExecutivesRequest,
    /// Payment status, default `pending`.
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// Processing status, default `pending`.
    #[serde(default)]
    pub process_status: Option<ProcessStatus>,
    /// Free-text period label.
    #[serde(default)]
    pub period_label: Option<String>,
    /// Period invoicing status, default `pending`.
    #[serde(default)]
    pub period_status: Option<PeriodStatus>,
    /// Invoicing company.
    #[serde(default)]
    pub invoicing_company: Option<InvoicingCompany>,
    /// Invoice number.
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// Fee invoice number.
    #[serde(default)]
    pub fee_invoice_number: Option<String>,
    /// Payment method.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Whether an invoice was requested.
    #[serde(default)]
    pub invoice_requested: bool,
    /// Comments.
    #[serde(default)]
    pub comments: Option<String>,
}

/// Request body for updating a transfer.
///
/// Absent fields are left unchanged. Nullable text fields are cleared with an
/// empty string.
#[derive(Debug, Deserialize)]
pub struct UpdateTransferRequest {
    /// New owning client.
    #[serde(default)]
    pub client_id: Option<Uuid>,
    /// New date.
    #[serde(default)]
    pub transfer_date: Option<NaiveDate>,
    /// New base amount.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Replacement executives; roles left out are taken from the client.
    #[serde(default)]
    pub executives: Option<ExecutivesRequest>,
    /// New payment status.
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// New processing status.
    #[serde(default)]
    pub process_status: Option<ProcessStatus>,
    /// New period label.
    #[serde(default)]
    pub period_label: Option<String>,
    /// New period status.
    #[serde(default)]
    pub period_status: Option<PeriodStatus>,
    /// New invoicing company.
    #[serde(default)]
    pub invoicing_company: Option<InvoicingCompany>,
    /// New invoice number.
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// New fee invoice number.
    #[serde(default)]
    pub fee_invoice_number: Option<String>,
    /// New payment method.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// New invoice-requested flag.
    #[serde(default)]
    pub invoice_requested: Option<bool>,
    /// New comments.
    #[serde(default)]
    pub comments: Option<String>,
}

/// Query parameters for listing transfers.
#[derive(Debug, Deserialize)]
pub struct ListTransfersQuery {
    /// Owning client.
    pub client_id: Option<Uuid>,
    /// Payment status.
    pub payment_status: Option<PaymentStatus>,
    /// Processing status.
    pub process_status: Option<ProcessStatus>,
    /// Lead executive.
    pub executive_id: Option<Uuid>,
    /// Month of the transfer date; requires `year`.
    pub month: Option<u32>,
    /// Year of the transfer date; requires `month`.
    pub year: Option<i32>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Transfer response, with commissions on single-item responses.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// Stored transfer.
    #[serde(flatten)]
    pub transfer: transfers::Model,
    /// Generated commission rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commissions: Option<Vec<commissions::Model>>,
}

impl From<transfers::Model> for TransferResponse {
    fn from(transfer: transfers::Model) -> Self {
        Self {
            transfer,
            commissions: None,
        }
    }
}

impl From<TransferWithCommissions> for TransferResponse {
    fn from(t: TransferWithCommissions) -> Self {
        Self {
            transfer: t.transfer,
            commissions: Some(t.commissions),
        }
    }
}

/// Keeps non-blank text, mapping blanks to `None`.
fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl From<CreateTransferRequest> for CreateTransferInput {
    fn from(p: CreateTransferRequest) -> Self {
        Self {
            client_id: p.client_id,
            transfer_date: p.transfer_date,
            amount: p.amount,
            executives: p.executives.into(),
            payment_status: p.payment_status.unwrap_or(PaymentStatus::Pending),
            process_status: p.process_status.unwrap_or(ProcessStatus::Pending),
            period_label: p.period_label.and_then(non_blank),
            period_status: p.period_status.unwrap_or(PeriodStatus::Pending),
            invoicing_company: p.invoicing_company,
            invoice_number: p.invoice_number.and_then(non_blank),
            fee_invoice_number: p.fee_invoice_number.and_then(non_blank),
            payment_method: p.payment_method,
            invoice_requested: p.invoice_requested,
            comments: p.comments.and_then(non_blank),
        }
    }
}

impl From<UpdateTransferRequest> for UpdateTransferInput {
    fn from(p: UpdateTransferRequest) -> Self {
        Self {
            client_id: p.client_id,
            transfer_date: p.transfer_date,
            amount: p.amount,
            executives: p.executives.map(Into::into),
            payment_status: p.payment_status,
            process_status: p.process_status,
            period_label: p.period_label.map(non_blank),
            period_status: p.period_status,
            invoicing_company: p.invoicing_company.map(Some),
            invoice_number: p.invoice_number.map(non_blank),
            fee_invoice_number: p.fee_invoice_number.map(non_blank),
            payment_method: p.payment_method.map(Some),
            invoice_requested: p.invoice_requested,
            comments: p.comments.map(non_blank),
        }
    }
}

/// GET `/transfers` - List transfers.
async fn list_transfers(
    State(state): State<AppState>,
    Query(query): Query<ListTransfersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page_request(query.page, query.per_page);
    let filter = TransferFilter {
        client_id: query.client_id,
        payment_status: query.payment_status,
        process_status: query.process_status,
        executive_id: query.executive_id,
        period: period_filter(query.month, query.year)?,
    };

    let (rows, total) = TransferRepository::new((*state.db).clone())
        .list(&filter, page.offset(), page.limit())
        .await?;

    let response =
        PageResponse::new(rows, page.page, page.per_page, total).map(TransferResponse::from);
    Ok((StatusCode::OK, Json(json!(response))))
}

/// POST `/transfers` - Record a transfer and generate its commissions.
async fn create_transfer(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransferRequest>,
) -> Result<impl IntoResponse, ApiError> {
    TransferCalculator::check_amount(payload.amount)?;
    let today = state.business.today()?;
    let transfer = TransferRepository::new((*state.db).clone())
        .create(payload.into(), today)
        .await?;

    info!(transfer_id = %transfer.transfer.id, "Transfer recorded");
    Ok((StatusCode::CREATED, Json(json!(TransferResponse::from(transfer)))))
}

/// GET `/transfers/{transfer_id}` - Get a transfer with its commissions.
async fn get_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let transfer = TransferRepository::new((*state.db).clone())
        .find_by_id(transfer_id)
        .await?;

    Ok((StatusCode::OK, Json(json!(TransferResponse::from(transfer)))))
}

/// PATCH `/transfers/{transfer_id}` - Update a transfer and regenerate its commissions.
async fn update_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<Uuid>,
    Json(payload): Json<UpdateTransferRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.amount.is_some() {
        TransferCalculator::check_amount(payload.amount)?;
    }
    let today = state.business.today()?;
    let transfer = TransferRepository::new((*state.db).clone())
        .update(transfer_id, payload.into(), today)
        .await?;

    Ok((StatusCode::OK, Json(json!(TransferResponse::from(transfer)))))
}

/// DELETE `/transfers/{transfer_id}` - Delete a transfer and its commissions.
async fn delete_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let today = state.business.today()?;
    TransferRepository::new((*state.db).clone())
        .delete(transfer_id, today)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
