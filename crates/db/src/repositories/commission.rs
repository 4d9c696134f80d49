//! Commission read queries for the reporting UI.

use alianza_core::commission::{CommissionLine, CommissionPeriod, PartnerPayout, summarize_payouts};
use alianza_shared::types::PartnerId;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use uuid::Uuid;

use super::release::stored_month;
use crate::entities::commissions;

/// Filter for commission queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommissionFilter {
    /// Released or held rows only.
    pub released: Option<bool>,
    /// Rows of one period.
    pub period: Option<CommissionPeriod>,
    /// Rows owed to one partner.
    pub partner_id: Option<Uuid>,
    /// Rows of one client.
    pub client_id: Option<Uuid>,
    /// Rows of one transfer.
    pub transfer_id: Option<Uuid>,
}

impl CommissionFilter {
    fn apply(&self, mut query: Select<commissions::Entity>) -> Select<commissions::Entity> {
        if let Some(released) = self.released {
            query = query.filter(commissions::Column::Released.eq(released));
        }
        if let Some(period) = self.period {
            query = query
                .filter(commissions::Column::PeriodMonth.eq(stored_month(period)))
                .filter(commissions::Column::PeriodYear.eq(period.year()));
        }
        if let Some(partner_id) = self.partner_id {
            query = query.filter(commissions::Column::PartnerId.eq(partner_id));
        }
        if let Some(client_id) = self.client_id {
            query = query.filter(commissions::Column::ClientId.eq(client_id));
        }
        if let Some(transfer_id) = self.transfer_id {
            query = query.filter(commissions::Column::TransferId.eq(transfer_id));
        }
        query
    }
}

/// Commission repository.
#[derive(Debug, Clone)]
pub struct CommissionRepository {
    db: DatabaseConnection,
}

impl CommissionRepository {
    /// Creates a new commission repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists commission rows, newest period first, returning the page and
    /// the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        filter: &CommissionFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<commissions::Model>, u64), DbErr> {
        let query = filter.apply(commissions::Entity::find());

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(commissions::Column::PeriodYear)
            .order_by_desc(commissions::Column::PeriodMonth)
            .order_by_desc(commissions::Column::TransferDate)
            .order_by_asc(commissions::Column::Slot)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Per-partner totals for the rows matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn payouts(&self, filter: &CommissionFilter) -> Result<Vec<PartnerPayout>, DbErr> {
        let lines: Vec<(Uuid, Decimal, bool)> = filter
            .apply(commissions::Entity::find())
            .select_only()
            .column(commissions::Column::PartnerId)
            .column(commissions::Column::Amount)
            .column(commissions::Column::Released)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(summarize_payouts(lines.into_iter().map(
            |(partner_id, amount, released)| CommissionLine {
                partner_id: PartnerId::from_uuid(partner_id),
                amount,
                released,
            },
        )))
    }
}
