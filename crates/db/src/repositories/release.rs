//! Release ("liberacion") engine.
//!
//! Evaluates the month-end release rule for a (client name group, period)
//! and flips the `released` flag of every commission row of that group and
//! period with a single `UPDATE`. Used inline by the transfer write path and
//! by the periodic batch.

use std::collections::BTreeSet;

use alianza_core::commission::{CommissionPeriod, PaymentStatus as DomainPaymentStatus};
use alianza_core::error::CommissionError;
use alianza_core::release::{ClientNameIndex, ReleaseRule, ReleaseScope, ReleaseState};
use alianza_shared::types::ClientId;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, TransactionTrait, sea_query::Expr,
};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::entities::{clients, commissions, sea_orm_active_enums::PaymentStatus, transfers};

/// Error types for release evaluation.
#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    /// Client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// Stored period could not be interpreted.
    #[error(transparent)]
    Commission(#[from] CommissionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result of evaluating one release period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodEvaluation {
    /// Normalized client name of the group.
    pub client_name: String,
    /// Evaluated period.
    pub period: CommissionPeriod,
    /// Resulting state.
    pub state: ReleaseState,
    /// Transfers of the group dated within the period.
    pub transfers: usize,
    /// Commission rows whose flag actually changed.
    pub rows_changed: u64,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseSummary {
    /// Distinct (client name, period) groups evaluated.
    pub periods: usize,
    /// Groups that ended released.
    pub released: usize,
    /// Groups that ended held.
    pub held: usize,
}

/// Release engine repository.
#[derive(Debug, Clone)]
pub struct ReleaseRepository {
    db: DatabaseConnection,
}

impl ReleaseRepository {
    /// Creates a new release repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Evaluates the period of one client's name group in its own transaction.
    ///
    /// Returns `None` when the group has no commission rows in the period.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` for an unknown client or a database error.
    pub async fn evaluate_client_period(
        &self,
        client_id: Uuid,
        period: CommissionPeriod,
        today: NaiveDate,
    ) -> Result<Option<PeriodEvaluation>, ReleaseError> {
        let txn = self.db.begin().await?;
        let evaluation = evaluate_client_period(&txn, client_id, period, today).await?;
        txn.commit().await?;
        Ok(evaluation)
    }

    /// Re-evaluates every period group matching `scope`.
    ///
    /// Groups are processed one after another, each in its own transaction;
    /// an error stops the run but never leaves a group half-updated.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored period is malformed.
    pub async fn run_batch(
        &self,
        scope: ReleaseScope,
        today: NaiveDate,
    ) -> Result<ReleaseSummary, ReleaseError> {
        let mut query = commissions::Entity::find()
            .select_only()
            .column(commissions::Column::ClientId)
            .column(commissions::Column::PeriodMonth)
            .column(commissions::Column::PeriodYear)
            .distinct();
        if scope.pending_only {
            query = query.filter(commissions::Column::Released.eq(false));
        }
        if let Some(period) = scope.period {
            query = query.filter(period_filter(period));
        }

        let rows: Vec<(Uuid, i16, i32)> = query.into_tuple().all(&self.db).await?;
        if rows.is_empty() {
            info!(pending_only = scope.pending_only, "No commissions to process");
            return Ok(ReleaseSummary::default());
        }

        let client_ids: BTreeSet<Uuid> = rows.iter().map(|(client_id, _, _)| *client_id).collect();
        let names: Vec<(Uuid, String)> = clients::Entity::find()
            .filter(clients::Column::Id.is_in(client_ids))
            .select_only()
            .column(clients::Column::Id)
            .column(clients::Column::NameKey)
            .into_tuple()
            .all(&self.db)
            .await?;
        let index = ClientNameIndex::new(
            names
                .iter()
                .map(|(id, name)| (ClientId::from_uuid(*id), name.as_str())),
        );

        let keyed = rows
            .into_iter()
            .map(|(client_id, month, year)| {
                Ok((ClientId::from_uuid(client_id), stored_period(month, year)?))
            })
            .collect::<Result<Vec<_>, CommissionError>>()?;
        let keys = index.release_keys(keyed);

        let mut summary = ReleaseSummary::default();
        for key in &keys {
            let txn = self.db.begin().await?;
            let evaluation = evaluate_group(&txn, &key.client_name, key.period, today).await?;
            txn.commit().await?;

            summary.periods += 1;
            match evaluation.map(|e| e.state) {
                Some(ReleaseState::Released) => summary.released += 1,
                Some(ReleaseState::Held) | None => summary.held += 1,
            }
        }

        info!(
            periods = summary.periods,
            released = summary.released,
            held = summary.held,
            %today,
            "Release batch finished"
        );

        Ok(summary)
    }
}

/// Evaluates the period of the name group `client_id` belongs to.
pub(crate) async fn evaluate_client_period(
    txn: &DatabaseTransaction,
    client_id: Uuid,
    period: CommissionPeriod,
    today: NaiveDate,
) -> Result<Option<PeriodEvaluation>, ReleaseError> {
    let client = clients::Entity::find_by_id(client_id)
        .one(txn)
        .await?
        .ok_or(ReleaseError::ClientNotFound(client_id))?;

    evaluate_group(txn, &client.name_key, period, today).await
}

/// Evaluates one (normalized name, period) group.
///
/// Every client with the same normalized name takes part, including clients
/// that have no commission rows themselves.
pub(crate) async fn evaluate_group(
    txn: &DatabaseTransaction,
    client_name: &str,
    period: CommissionPeriod,
    today: NaiveDate,
) -> Result<Option<PeriodEvaluation>, ReleaseError> {
    let group: Vec<Uuid> = clients::Entity::find()
        .filter(clients::Column::NameKey.eq(client_name))
        .select_only()
        .column(clients::Column::Id)
        .into_tuple()
        .all(txn)
        .await?;
    if group.is_empty() {
        return Ok(None);
    }

    let rows = commissions::Entity::find()
        .filter(commissions::Column::ClientId.is_in(group.iter().copied()))
        .filter(period_filter(period))
        .count(txn)
        .await?;
    if rows == 0 {
        debug!(client_name, %period, "No commission rows in period");
        return Ok(None);
    }

    let statuses: Vec<PaymentStatus> = transfers::Entity::find()
        .filter(transfers::Column::ClientId.is_in(group.iter().copied()))
        .filter(transfers::Column::TransferDate.gte(period.start()))
        .filter(transfers::Column::TransferDate.lt(period.releasable_from()))
        .select_only()
        .column(transfers::Column::PaymentStatus)
        .into_tuple()
        .all(txn)
        .await?;

    let state = ReleaseRule::evaluate(
        &period,
        today,
        statuses.iter().copied().map(DomainPaymentStatus::from),
    );
    let released = state.is_released();

    let result = commissions::Entity::update_many()
        .col_expr(commissions::Column::Released, Expr::value(released))
        .col_expr(commissions::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(commissions::Column::ClientId.is_in(group))
        .filter(period_filter(period))
        .filter(commissions::Column::Released.ne(released))
        .exec(txn)
        .await?;

    debug!(
        client_name,
        %period,
        ?state,
        transfers = statuses.len(),
        rows_changed = result.rows_affected,
        "Release period evaluated"
    );

    Ok(Some(PeriodEvaluation {
        client_name: client_name.to_string(),
        period,
        state,
        transfers: statuses.len(),
        rows_changed: result.rows_affected,
    }))
}

/// Condition matching commission rows of a period.
fn period_filter(period: CommissionPeriod) -> sea_orm::Condition {
    sea_orm::Condition::all()
        .add(commissions::Column::PeriodMonth.eq(stored_month(period)))
        .add(commissions::Column::PeriodYear.eq(period.year()))
}

/// Month as stored in `SMALLINT` columns.
pub(crate) fn stored_month(period: CommissionPeriod) -> i16 {
    i16::try_from(period.month()).unwrap_or_default()
}

/// Period of a stored (month, year) pair.
pub(crate) fn stored_period(month: i16, year: i32) -> Result<CommissionPeriod, CommissionError> {
    CommissionPeriod::new(u32::try_from(month).unwrap_or_default(), year)
}
