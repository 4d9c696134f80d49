//! Client repository.
//!
//! A client and its commission slots are written together: the slot rows are
//! replaced wholesale and the aggregate `service_commission_rate` is
//! recomputed from them on every save.
//!
//! Renaming a client can move it between name groups, so the release rule
//! is re-evaluated for every period of its transfers, in both groups.

use std::collections::BTreeSet;

use alianza_core::client::{
    AdministrativeCategory, CommissionSplits, ExecutiveAssignment, SlotInput,
    canonical_business_name,
};
use alianza_core::commission::CommissionPeriod;
use alianza_core::error::CommissionError;
use alianza_core::release::normalize_client_name;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::executive::missing_executive;
use super::release::{ReleaseError, evaluate_group, stored_period};
use crate::entities::{
    client_commission_slots, clients, commissions, partners, sea_orm_active_enums::AcCategory,
    transfers,
};
use crate::mapping::commission_slot;

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Client not found: {0}")]
    NotFound(Uuid),

    /// A slot references a partner that does not exist.
    #[error("Partner not found: {0}")]
    PartnerNotFound(Uuid),

    /// An assigned executive does not exist.
    #[error("Executive not found: {0}")]
    ExecutiveNotFound(Uuid),

    /// Business name is blank.
    #[error("Business name cannot be empty")]
    EmptyName,

    /// Invalid commission configuration.
    #[error(transparent)]
    Commission(#[from] CommissionError),

    /// Release re-evaluation after a rename failed.
    #[error(transparent)]
    Release(#[from] ReleaseError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Client with its ordered commission slots.
#[derive(Debug, Clone)]
pub struct ClientWithSlots {
    /// The client record.
    pub client: clients::Model,
    /// Slots ordered by position.
    pub slots: Vec<client_commission_slots::Model>,
}

/// Input for creating a client.
#[derive(Debug, Clone, Default)]
pub struct CreateClientInput {
    /// Business name as typed.
    pub business_name: String,
    /// Administrative category.
    pub ac: Option<AdministrativeCategory>,
    /// Service label.
    pub service: String,
    /// Assigned executives.
    pub executives: ExecutiveAssignment,
    /// Commission slots, percentages in the 0-100 scale.
    pub slots: Vec<SlotInput>,
}

/// Input for updating a client. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateClientInput {
    /// New business name.
    pub business_name: Option<String>,
    /// New category; `Some(None)` clears it.
    pub ac: Option<Option<AdministrativeCategory>>,
    /// New service label.
    pub service: Option<String>,
    /// Replacement executive assignment, all three roles at once.
    pub executives: Option<ExecutiveAssignment>,
    /// Replacement slot list.
    pub slots: Option<Vec<SlotInput>>,
}

/// Filter for listing clients.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    /// Substring of the business name.
    pub search: Option<String>,
    /// Administrative category.
    pub ac: Option<AdministrativeCategory>,
}

/// Client repository.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a client together with its commission slots.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The business name is blank
    /// - A percentage does not parse, is out of range, or there are more than 12 slots
    /// - A slot references an unknown partner or an executive does not exist
    /// - Database operation fails
    pub async fn create(&self, input: CreateClientInput) -> Result<ClientWithSlots, ClientError> {
        let business_name = canonical_name(&input.business_name)?;
        let splits = CommissionSplits::from_inputs(&input.slots)?;
        ensure_partners_exist(&self.db, &splits).await?;
        ensure_executives_exist(&self.db, &input.executives).await?;

        let txn = self.db.begin().await?;

        let now = Utc::now().into();
        let client = clients::ActiveModel {
            id: Set(Uuid::now_v7()),
            name_key: Set(normalize_client_name(&business_name)),
            business_name: Set(business_name),
            ac: Set(input.ac.map(Into::into)),
            service: Set(input.service.trim().to_string()),
            service_commission_rate: Set(splits.aggregate_rate()),
            executive_id: Set(input.executives.executive.map(|id| id.into_inner())),
            secondary_executive_id: Set(input.executives.secondary.map(|id| id.into_inner())),
            support_executive_id: Set(input.executives.support.map(|id| id.into_inner())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let slots = replace_slots(&txn, client.id, &splits).await?;

        txn.commit().await?;

        debug!(
            client_id = %client.id,
            slots = slots.len(),
            rate = %client.service_commission_rate,
            "Client created"
        );

        Ok(ClientWithSlots { client, slots })
    }

    /// Updates a client. When `slots` is given the whole slot list is
    /// replaced; the aggregate rate is recomputed either way.
    ///
    /// A rename that changes the normalized name re-evaluates, as of `today`,
    /// every period of the client's transfers for the group it left and the
    /// group it joined.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`ClientRepository::create`], plus
    /// `NotFound` for an unknown client.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateClientInput,
        today: NaiveDate,
    ) -> Result<ClientWithSlots, ClientError> {
        let client = clients::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        let new_splits = match &input.slots {
            Some(slots) => {
                let splits = CommissionSplits::from_inputs(slots)?;
                ensure_partners_exist(&self.db, &splits).await?;
                Some(splits)
            }
            None => None,
        };
        if let Some(executives) = &input.executives {
            ensure_executives_exist(&self.db, executives).await?;
        }
        let previous_key = client.name_key.clone();

        let txn = self.db.begin().await?;

        let (splits, slots) = match new_splits {
            Some(splits) => {
                let slots = replace_slots(&txn, id, &splits).await?;
                (splits, slots)
            }
            None => {
                let slots = load_slots(&txn, id).await?;
                let splits = CommissionSplits::new(slots.iter().map(commission_slot).collect())?;
                (splits, slots)
            }
        };

        let mut active: clients::ActiveModel = client.into();
        if let Some(name) = input.business_name {
            let business_name = canonical_name(&name)?;
            active.name_key = Set(normalize_client_name(&business_name));
            active.business_name = Set(business_name);
        }
        if let Some(ac) = input.ac {
            active.ac = Set(ac.map(Into::into));
        }
        if let Some(service) = input.service {
            active.service = Set(service.trim().to_string());
        }
        if let Some(executives) = input.executives {
            active.executive_id = Set(executives.executive.map(|id| id.into_inner()));
            active.secondary_executive_id = Set(executives.secondary.map(|id| id.into_inner()));
            active.support_executive_id = Set(executives.support.map(|id| id.into_inner()));
        }
        active.service_commission_rate = Set(splits.aggregate_rate());
        active.updated_at = Set(Utc::now().into());

        let client = active.update(&txn).await?;

        if client.name_key != previous_key {
            let periods = release_regrouped(&txn, &client, &previous_key, today).await?;
            info!(
                client_id = %client.id,
                from = %previous_key,
                to = %client.name_key,
                periods,
                "Client moved between name groups"
            );
        }

        txn.commit().await?;

        debug!(
            client_id = %client.id,
            slots = slots.len(),
            rate = %client.service_commission_rate,
            "Client updated"
        );

        Ok(ClientWithSlots { client, slots })
    }

    /// Finds a client with its slots.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the client does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<ClientWithSlots, ClientError> {
        let client = clients::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ClientError::NotFound(id))?;
        let slots = load_slots(&self.db, id).await?;

        Ok(ClientWithSlots { client, slots })
    }

    /// Lists clients ordered by business name, returning the page and the
    /// total count. Slots are not loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        filter: &ClientFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<clients::Model>, u64), ClientError> {
        let mut query = clients::Entity::find();
        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(clients::Column::BusinessName.contains(search.to_uppercase()));
        }
        if let Some(ac) = filter.ac {
            query = query.filter(clients::Column::Ac.eq(AcCategory::from(ac)));
        }

        let total = query.clone().count(&self.db).await?;
        let clients = query
            .order_by_asc(clients::Column::BusinessName)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok((clients, total))
    }
}

/// Canonical business name, rejecting blanks.
fn canonical_name(name: &str) -> Result<String, ClientError> {
    let canonical = canonical_business_name(name);
    if canonical.is_empty() {
        return Err(ClientError::EmptyName);
    }
    Ok(canonical)
}

/// Loads a client's slots ordered by position.
pub(crate) async fn load_slots<C: ConnectionTrait>(
    conn: &C,
    client_id: Uuid,
) -> Result<Vec<client_commission_slots::Model>, DbErr> {
    client_commission_slots::Entity::find()
        .filter(client_commission_slots::Column::ClientId.eq(client_id))
        .order_by_asc(client_commission_slots::Column::Position)
        .all(conn)
        .await
}

/// Checks that every partner referenced by the splits exists.
async fn ensure_partners_exist(
    db: &DatabaseConnection,
    splits: &CommissionSplits,
) -> Result<(), ClientError> {
    let mut ids: Vec<Uuid> = splits
        .slots()
        .iter()
        .filter_map(|slot| slot.partner_id.map(|p| p.into_inner()))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(());
    }

    let found: Vec<Uuid> = partners::Entity::find()
        .filter(partners::Column::Id.is_in(ids.iter().copied()))
        .select_only()
        .column(partners::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    match ids.into_iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(ClientError::PartnerNotFound(missing)),
        None => Ok(()),
    }
}

/// Checks that every assigned executive exists.
async fn ensure_executives_exist(
    db: &DatabaseConnection,
    executives: &ExecutiveAssignment,
) -> Result<(), ClientError> {
    match missing_executive(db, executives).await? {
        Some(missing) => Err(ClientError::ExecutiveNotFound(missing)),
        None => Ok(()),
    }
}

/// Re-evaluates the old and the new name group for every period the client
/// has transfers or commissions in. Returns the number of periods.
async fn release_regrouped(
    txn: &DatabaseTransaction,
    client: &clients::Model,
    previous_key: &str,
    today: NaiveDate,
) -> Result<usize, ClientError> {
    let mut periods = BTreeSet::new();

    let stored: Vec<(i16, i32)> = commissions::Entity::find()
        .filter(commissions::Column::ClientId.eq(client.id))
        .select_only()
        .column(commissions::Column::PeriodMonth)
        .column(commissions::Column::PeriodYear)
        .distinct()
        .into_tuple()
        .all(txn)
        .await?;
    for (month, year) in stored {
        periods.insert(stored_period(month, year)?);
    }

    let dates: Vec<NaiveDate> = transfers::Entity::find()
        .filter(transfers::Column::ClientId.eq(client.id))
        .select_only()
        .column(transfers::Column::TransferDate)
        .distinct()
        .into_tuple()
        .all(txn)
        .await?;
    for date in dates {
        periods.insert(CommissionPeriod::containing(date)?);
    }

    for period in &periods {
        evaluate_group(txn, previous_key, *period, today).await?;
        evaluate_group(txn, &client.name_key, *period, today).await?;
    }

    Ok(periods.len())
}

/// Deletes a client's slot rows and inserts the new ones at positions 1..=n.
async fn replace_slots(
    txn: &DatabaseTransaction,
    client_id: Uuid,
    splits: &CommissionSplits,
) -> Result<Vec<client_commission_slots::Model>, DbErr> {
    client_commission_slots::Entity::delete_many()
        .filter(client_commission_slots::Column::ClientId.eq(client_id))
        .exec(txn)
        .await?;

    let mut rows = Vec::with_capacity(splits.slots().len());
    for (position, slot) in (1_i16..).zip(splits.slots()) {
        let row = client_commission_slots::ActiveModel {
            id: Set(Uuid::now_v7()),
            client_id: Set(client_id),
            position: Set(position),
            partner_id: Set(slot.partner_id.map(|p| p.into_inner())),
            percentage: Set(slot.percentage),
        }
        .insert(txn)
        .await?;
        rows.push(row);
    }

    Ok(rows)
}
