//! Transfer ("dispersion") repository and the commission write path.
//!
//! Every create, update and delete runs in a single database transaction:
//!
//! 1. Unset executives are taken from the client and the calculator derives the transfer's commission figures.
//! 2. The transfer row is written.
//! 3. Its commission rows are deleted and regenerated from the client's slots.
//! 4. The release rule is re-evaluated for the affected period, and for the
//!    previous one when the transfer moved.
//!
//! Any failure rolls the whole write back.

use alianza_core::client::{CommissionSplits, ExecutiveAssignment, MAX_COMMISSION_SLOTS};
use alianza_core::commission::{
    CommissionDraft, CommissionGenerator, CommissionPeriod, TransferCalculator, TransferCommission,
    TransferSnapshot,
};
use alianza_core::error::CommissionError;
use alianza_shared::types::{ClientId, ExecutiveId, TransferId};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::client::load_slots;
use super::executive::missing_executive;
use super::release::{ReleaseError, evaluate_client_period, stored_month};
use crate::entities::{
    clients, commissions,
    sea_orm_active_enums::{
        InvoicingCompany, PaymentMethod, PaymentStatus, PeriodStatus, ProcessStatus,
    },
    transfers,
};
use crate::mapping::{client_executives, client_terms, commission_slot};

/// Error types for transfer operations.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Transfer not found.
    #[error("Transfer not found: {0}")]
    NotFound(Uuid),

    /// Referenced client does not exist.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// An assigned executive does not exist.
    #[error("Executive not found: {0}")]
    ExecutiveNotFound(Uuid),

    /// Calculation or configuration error.
    #[error(transparent)]
    Commission(#[from] CommissionError),

    /// Release evaluation failed.
    #[error(transparent)]
    Release(#[from] ReleaseError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Transfer with its generated commission rows.
#[derive(Debug, Clone)]
pub struct TransferWithCommissions {
    /// The transfer record.
    pub transfer: transfers::Model,
    /// Commission rows ordered by slot.
    pub commissions: Vec<commissions::Model>,
}

/// Input for creating a transfer.
#[derive(Debug, Clone)]
pub struct CreateTransferInput {
    /// Owning client; required.
    pub client_id: Option<Uuid>,
    /// Transfer date.
    pub transfer_date: NaiveDate,
    /// Base amount; `None` is stored as zero.
    pub amount: Option<Decimal>,
    /// Executives; unset roles are taken from the client.
    pub executives: ExecutiveAssignment,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Processing status.
    pub process_status: ProcessStatus,
    /// Free-text period label.
    pub period_label: Option<String>,
    /// Period invoicing status.
    pub period_status: PeriodStatus,
    /// Invoicing company.
    pub invoicing_company: Option<InvoicingCompany>,
    /// Invoice number.
    pub invoice_number: Option<String>,
    /// Fee invoice number.
    pub fee_invoice_number: Option<String>,
    /// Payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Whether an invoice was requested.
    pub invoice_requested: bool,
    /// Comments.
    pub comments: Option<String>,
}

impl CreateTransferInput {
    /// Minimal pending transfer for a client.
    #[must_use]
    pub fn new(client_id: Uuid, transfer_date: NaiveDate, amount: Decimal) -> Self {
        Self {
            client_id: Some(client_id),
            transfer_date,
            amount: Some(amount),
            executives: ExecutiveAssignment::default(),
            payment_status: PaymentStatus::Pending,
            process_status: ProcessStatus::Pending,
            period_label: None,
            period_status: PeriodStatus::Pending,
            invoicing_company: None,
            invoice_number: None,
            fee_invoice_number: None,
            payment_method: None,
            invoice_requested: false,
            comments: None,
        }
    }
}

/// Input for updating a transfer. `None` leaves a field unchanged;
/// `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransferInput {
    /// New owning client.
    pub client_id: Option<Uuid>,
    /// New date.
    pub transfer_date: Option<NaiveDate>,
    /// New base amount.
    pub amount: Option<Decimal>,
    /// Replacement executives; roles left unset are taken from the client.
    pub executives: Option<ExecutiveAssignment>,
    /// New payment status.
    pub payment_status: Option<PaymentStatus>,
    /// New processing status.
    pub process_status: Option<ProcessStatus>,
    /// New period label.
    pub period_label: Option<Option<String>>,
    /// New period status.
    pub period_status: Option<PeriodStatus>,
    /// New invoicing company.
    pub invoicing_company: Option<Option<InvoicingCompany>>,
    /// New invoice number.
    pub invoice_number: Option<Option<String>>,
    /// New fee invoice number.
    pub fee_invoice_number: Option<Option<String>>,
    /// New payment method.
    pub payment_method: Option<Option<PaymentMethod>>,
    /// New invoice-requested flag.
    pub invoice_requested: Option<bool>,
    /// New comments.
    pub comments: Option<Option<String>>,
}

/// Filter for listing transfers.
#[derive(Debug, Clone, Default)]
pub struct TransferFilter {
    /// Owning client.
    pub client_id: Option<Uuid>,
    /// Payment status.
    pub payment_status: Option<PaymentStatus>,
    /// Processing status.
    pub process_status: Option<ProcessStatus>,
    /// Lead executive.
    pub executive_id: Option<Uuid>,
    /// Calendar month of the transfer date.
    pub period: Option<CommissionPeriod>,
}

/// Transfer repository.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    db: DatabaseConnection,
}

impl TransferRepository {
    /// Creates a new transfer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a transfer, generates its commissions and evaluates the
    /// release of its period.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No client is given (`MissingClientReference`) or it does not exist
    /// - The amount is negative or above [`alianza_core::commission::MAX_AMOUNT`]
    /// - An executive does not exist
    /// - Database operation fails
    pub async fn create(
        &self,
        input: CreateTransferInput,
        today: NaiveDate,
    ) -> Result<TransferWithCommissions, TransferError> {
        let client_id = input
            .client_id
            .ok_or(CommissionError::MissingClientReference)?;

        let txn = self.db.begin().await?;

        let client = find_client(&txn, client_id).await?;
        let executives = assign_executives(&txn, input.executives, &client).await?;
        let figures = TransferCalculator::compute(input.amount, Some(&client_terms(&client)))?;

        let now = Utc::now().into();
        let transfer = transfers::ActiveModel {
            id: Set(Uuid::now_v7()),
            client_id: Set(client.id),
            transfer_date: Set(input.transfer_date),
            executive_id: Set(executives.executive.map(|id| id.into_inner())),
            secondary_executive_id: Set(executives.secondary.map(|id| id.into_inner())),
            support_executive_id: Set(executives.support.map(|id| id.into_inner())),
            amount: Set(figures.base_amount),
            payment_status: Set(input.payment_status),
            process_status: Set(input.process_status),
            period_label: Set(input.period_label),
            period_status: Set(input.period_status),
            service: Set(client.service.clone()),
            invoicing_company: Set(input.invoicing_company),
            invoice_number: Set(input.invoice_number),
            fee_invoice_number: Set(input.fee_invoice_number),
            payment_method: Set(input.payment_method),
            invoice_requested: Set(input.invoice_requested),
            comments: Set(input.comments),
            commission_rate: Set(figures.commission_rate),
            commission_amount: Set(figures.commission_amount),
            commission_amount_with_tax: Set(figures.commission_amount_with_tax),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let commissions = regenerate_commissions(&txn, &transfer).await?;
        release_affected(&txn, &transfer, None, today).await?;

        txn.commit().await?;

        log_saved("Transfer created", &transfer, &figures, commissions.len());

        Ok(TransferWithCommissions {
            transfer,
            commissions,
        })
    }

    /// Updates a transfer and replaces its commissions.
    ///
    /// When the client or the month changes, the period the transfer left is
    /// re-evaluated too.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown transfer plus the errors of
    /// [`TransferRepository::create`].
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateTransferInput,
        today: NaiveDate,
    ) -> Result<TransferWithCommissions, TransferError> {
        let txn = self.db.begin().await?;

        let existing = transfers::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(TransferError::NotFound(id))?;
        let previous = (existing.client_id, existing.transfer_date);
        let requested = input.executives.unwrap_or_else(|| stored_executives(&existing));

        let client = find_client(&txn, input.client_id.unwrap_or(existing.client_id)).await?;
        let executives = assign_executives(&txn, requested, &client).await?;
        let amount = input.amount.unwrap_or(existing.amount);
        let figures = TransferCalculator::compute(Some(amount), Some(&client_terms(&client)))?;

        let mut active: transfers::ActiveModel = existing.into();
        active.client_id = Set(client.id);
        active.amount = Set(figures.base_amount);
        active.service = Set(client.service.clone());
        active.executive_id = Set(executives.executive.map(|id| id.into_inner()));
        active.secondary_executive_id = Set(executives.secondary.map(|id| id.into_inner()));
        active.support_executive_id = Set(executives.support.map(|id| id.into_inner()));
        if let Some(transfer_date) = input.transfer_date {
            active.transfer_date = Set(transfer_date);
        }
        if let Some(payment_status) = input.payment_status {
            active.payment_status = Set(payment_status);
        }
        if let Some(process_status) = input.process_status {
            active.process_status = Set(process_status);
        }
        if let Some(period_label) = input.period_label {
            active.period_label = Set(period_label);
        }
        if let Some(period_status) = input.period_status {
            active.period_status = Set(period_status);
        }
        if let Some(invoicing_company) = input.invoicing_company {
            active.invoicing_company = Set(invoicing_company);
        }
        if let Some(invoice_number) = input.invoice_number {
            active.invoice_number = Set(invoice_number);
        }
        if let Some(fee_invoice_number) = input.fee_invoice_number {
            active.fee_invoice_number = Set(fee_invoice_number);
        }
        if let Some(payment_method) = input.payment_method {
            active.payment_method = Set(payment_method);
        }
        if let Some(invoice_requested) = input.invoice_requested {
            active.invoice_requested = Set(invoice_requested);
        }
        if let Some(comments) = input.comments {
            active.comments = Set(comments);
        }
        active.commission_rate = Set(figures.commission_rate);
        active.commission_amount = Set(figures.commission_amount);
        active.commission_amount_with_tax = Set(figures.commission_amount_with_tax);
        active.updated_at = Set(Utc::now().into());

        let transfer = active.update(&txn).await?;

        let commissions = regenerate_commissions(&txn, &transfer).await?;
        release_affected(&txn, &transfer, Some(previous), today).await?;

        txn.commit().await?;

        log_saved("Transfer updated", &transfer, &figures, commissions.len());

        Ok(TransferWithCommissions {
            transfer,
            commissions,
        })
    }

    /// Deletes a transfer with its commissions and re-evaluates the period
    /// it belonged to.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown transfer or a database error.
    pub async fn delete(&self, id: Uuid, today: NaiveDate) -> Result<(), TransferError> {
        let txn = self.db.begin().await?;

        let transfer = transfers::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(TransferError::NotFound(id))?;
        let client_id = transfer.client_id;
        let period = CommissionPeriod::containing(transfer.transfer_date)?;

        transfer.delete(&txn).await?;
        evaluate_client_period(&txn, client_id, period, today).await?;

        txn.commit().await?;

        info!(transfer_id = %id, client_id = %client_id, %period, "Transfer deleted");
        Ok(())
    }

    /// Finds a transfer with its commissions.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transfer does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<TransferWithCommissions, TransferError> {
        let transfer = transfers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransferError::NotFound(id))?;
        let commissions = commissions::Entity::find()
            .filter(commissions::Column::TransferId.eq(id))
            .order_by_asc(commissions::Column::Slot)
            .all(&self.db)
            .await?;

        Ok(TransferWithCommissions {
            transfer,
            commissions,
        })
    }

    /// Lists transfers, newest first, returning the page and the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        filter: &TransferFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<transfers::Model>, u64), TransferError> {
        let mut query = transfers::Entity::find();
        if let Some(client_id) = filter.client_id {
            query = query.filter(transfers::Column::ClientId.eq(client_id));
        }
        if let Some(payment_status) = filter.payment_status {
            query = query.filter(transfers::Column::PaymentStatus.eq(payment_status));
        }
        if let Some(process_status) = filter.process_status {
            query = query.filter(transfers::Column::ProcessStatus.eq(process_status));
        }
        if let Some(executive_id) = filter.executive_id {
            query = query.filter(transfers::Column::ExecutiveId.eq(executive_id));
        }
        if let Some(period) = filter.period {
            query = query
                .filter(transfers::Column::TransferDate.gte(period.start()))
                .filter(transfers::Column::TransferDate.lt(period.releasable_from()));
        }

        let total = query.clone().count(&self.db).await?;
        let transfers = query
            .order_by_desc(transfers::Column::TransferDate)
            .order_by_desc(transfers::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok((transfers, total))
    }
}

/// Loads a client inside the write transaction.
async fn find_client(
    txn: &DatabaseTransaction,
    client_id: Uuid,
) -> Result<clients::Model, TransferError> {
    clients::Entity::find_by_id(client_id)
        .one(txn)
        .await?
        .ok_or(TransferError::ClientNotFound(client_id))
}

/// Completes `requested` from the client's executives and checks that every
/// resulting executive exists.
async fn assign_executives(
    txn: &DatabaseTransaction,
    requested: ExecutiveAssignment,
    client: &clients::Model,
) -> Result<ExecutiveAssignment, TransferError> {
    let executives = requested.or_client(client_executives(client));
    match missing_executive(txn, &executives).await? {
        Some(missing) => Err(TransferError::ExecutiveNotFound(missing)),
        None => Ok(executives),
    }
}

fn stored_executives(transfer: &transfers::Model) -> ExecutiveAssignment {
    ExecutiveAssignment {
        executive: transfer.executive_id.map(ExecutiveId::from_uuid),
        secondary: transfer.secondary_executive_id.map(ExecutiveId::from_uuid),
        support: transfer.support_executive_id.map(ExecutiveId::from_uuid),
    }
}

/// Replaces every commission row of a transfer.
async fn regenerate_commissions(
    txn: &DatabaseTransaction,
    transfer: &transfers::Model,
) -> Result<Vec<commissions::Model>, TransferError> {
    let deleted = commissions::Entity::delete_many()
        .filter(commissions::Column::TransferId.eq(transfer.id))
        .exec(txn)
        .await?;

    let slots = load_slots(txn, transfer.client_id).await?;
    let splits = CommissionSplits::new(slots.iter().map(commission_slot).collect())?;
    let drafts = CommissionGenerator::generate(&snapshot(transfer), &splits)?;

    let now = Utc::now().into();
    let mut rows = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let mut row = commission_row(&draft)?;
        row.created_at = Set(now);
        row.updated_at = Set(now);
        rows.push(row.insert(txn).await?);
    }

    debug!(
        transfer_id = %transfer.id,
        deleted = deleted.rows_affected,
        created = rows.len(),
        "Commissions regenerated"
    );

    Ok(rows)
}

/// Re-evaluates the period of the saved transfer and, when it moved, the
/// period it came from.
async fn release_affected(
    txn: &DatabaseTransaction,
    transfer: &transfers::Model,
    previous: Option<(Uuid, NaiveDate)>,
    today: NaiveDate,
) -> Result<(), TransferError> {
    let period = CommissionPeriod::containing(transfer.transfer_date)?;
    evaluate_client_period(txn, transfer.client_id, period, today).await?;

    if let Some((previous_client, previous_date)) = previous {
        let previous_period = CommissionPeriod::containing(previous_date)?;
        if previous_client != transfer.client_id || previous_period != period {
            evaluate_client_period(txn, previous_client, previous_period, today).await?;
        }
    }

    Ok(())
}

/// Generator input for a stored transfer.
fn snapshot(transfer: &transfers::Model) -> TransferSnapshot {
    TransferSnapshot {
        transfer_id: TransferId::from_uuid(transfer.id),
        client_id: ClientId::from_uuid(transfer.client_id),
        date: transfer.transfer_date,
        base_amount: transfer.amount,
        payment_status: transfer.payment_status.into(),
        service: transfer.service.clone(),
    }
}

/// Active model for a generated row, without timestamps.
fn commission_row(draft: &CommissionDraft) -> Result<commissions::ActiveModel, CommissionError> {
    let slot = i16::try_from(draft.slot).map_err(|_| CommissionError::TooManySlots {
        count: draft.slot,
        max: MAX_COMMISSION_SLOTS,
    })?;

    Ok(commissions::ActiveModel {
        id: Set(Uuid::now_v7()),
        transfer_id: Set(draft.transfer_id.into_inner()),
        client_id: Set(draft.client_id.into_inner()),
        partner_id: Set(draft.partner_id.into_inner()),
        slot: Set(slot),
        service: Set(draft.service.clone()),
        percentage: Set(draft.percentage),
        amount: Set(draft.amount),
        period_month: Set(stored_month(draft.period()?)),
        period_year: Set(draft.period_year),
        releasable_from: Set(draft.releasable_from),
        released: Set(draft.released),
        transfer_date: Set(draft.transfer_date),
        transfer_payment_status: Set(draft.transfer_payment_status.into()),
        ..Default::default()
    })
}

fn log_saved(
    message: &'static str,
    transfer: &transfers::Model,
    figures: &TransferCommission,
    commissions: usize,
) {
    info!(
        transfer_id = %transfer.id,
        client_id = %transfer.client_id,
        amount = %figures.base_amount,
        commission_amount = %figures.commission_amount,
        commission_amount_with_tax = %figures.commission_amount_with_tax,
        commissions,
        "{message}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use alianza_shared::types::PartnerId;
    use rust_decimal_macros::dec;

    fn transfer(date: NaiveDate) -> transfers::Model {
        let now = Utc::now().into();
        transfers::Model {
            id: Uuid::now_v7(),
            client_id: Uuid::now_v7(),
            transfer_date: date,
            executive_id: Some(Uuid::now_v7()),
            secondary_executive_id: None,
            support_executive_id: None,
            amount: dec!(1000.00),
            payment_status: PaymentStatus::Paid,
            process_status: ProcessStatus::Pending,
            period_label: None,
            period_status: PeriodStatus::Pending,
            service: "PROCOM".to_string(),
            invoicing_company: None,
            invoice_number: None,
            fee_invoice_number: None,
            payment_method: None,
            invoice_requested: false,
            comments: None,
            commission_rate: dec!(10.0000),
            commission_amount: dec!(100.00),
            commission_amount_with_tax: dec!(116.00),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_snapshot_copies_transfer_fields() {
        let stored = transfer(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let snap = snapshot(&stored);

        assert_eq!(snap.transfer_id.into_inner(), stored.id);
        assert_eq!(snap.client_id.into_inner(), stored.client_id);
        assert_eq!(snap.base_amount, dec!(1000.00));
        assert!(snap.payment_status.is_paid());
        assert_eq!(snap.service, "PROCOM");
    }

    #[test]
    fn test_stored_executives_reads_columns() {
        let stored = transfer(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let executives = stored_executives(&stored);

        assert_eq!(
            executives.executive.map(ExecutiveId::into_inner),
            stored.executive_id
        );
        assert_eq!(executives.secondary, None);
        assert_eq!(executives.support, None);
    }

    #[test]
    fn test_commission_row_maps_draft() {
        let stored = transfer(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let partner = PartnerId::new();
        let splits = CommissionSplits::new(vec![alianza_core::client::CommissionSlot::new(
            partner,
            dec!(0.06),
        )])
        .unwrap();
        let drafts = CommissionGenerator::generate(&snapshot(&stored), &splits).unwrap();

        let row = commission_row(&drafts[0]).unwrap();
        assert_eq!(row.partner_id.unwrap(), partner.into_inner());
        assert_eq!(row.amount.unwrap(), dec!(60.00));
        assert_eq!(row.slot.unwrap(), 1);
        assert_eq!(row.period_month.unwrap(), 3);
        assert_eq!(row.period_year.unwrap(), 2024);
        assert_eq!(
            row.releasable_from.unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        );
        assert!(!row.released.unwrap());
        assert_eq!(row.transfer_payment_status.unwrap(), PaymentStatus::Paid);
    }
}
