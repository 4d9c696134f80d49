//! Executive repository.
//!
//! Executives are staff members assigned to clients and transfers. Client
//! and transfer writes reject references to executives that do not exist.

use alianza_core::client::ExecutiveAssignment;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::executives;

/// Error types for executive operations.
#[derive(Debug, thiserror::Error)]
pub enum ExecutiveError {
    /// Executive not found.
    #[error("Executive not found: {0}")]
    NotFound(Uuid),

    /// Executive name is blank.
    #[error("Executive name cannot be empty")]
    EmptyName,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an executive.
#[derive(Debug, Clone)]
pub struct CreateExecutiveInput {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
}

/// Input for updating an executive. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateExecutiveInput {
    /// New name.
    pub name: Option<String>,
    /// New email; `Some(None)` clears it.
    pub email: Option<Option<String>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Executive repository.
#[derive(Debug, Clone)]
pub struct ExecutiveRepository {
    db: DatabaseConnection,
}

impl ExecutiveRepository {
    /// Creates a new executive repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an executive.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub async fn create(
        &self,
        input: CreateExecutiveInput,
    ) -> Result<executives::Model, ExecutiveError> {
        let name = required_name(&input.name)?;

        let now = Utc::now().into();
        let executive = executives::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name),
            email: Set(input.email.and_then(blank_to_none)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(executive.insert(&self.db).await?)
    }

    /// Finds an executive by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the executive does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<executives::Model, ExecutiveError> {
        executives::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ExecutiveError::NotFound(id))
    }

    /// Lists executives ordered by name, optionally only active or inactive
    /// ones, returning the page and the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        is_active: Option<bool>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<executives::Model>, u64), ExecutiveError> {
        let mut query = executives::Entity::find();
        if let Some(is_active) = is_active {
            query = query.filter(executives::Column::IsActive.eq(is_active));
        }

        let total = query.clone().count(&self.db).await?;
        let executives = query
            .order_by_asc(executives::Column::Name)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok((executives, total))
    }

    /// Updates an executive.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the executive does not exist, `EmptyName` for a
    /// blank name.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateExecutiveInput,
    ) -> Result<executives::Model, ExecutiveError> {
        let executive = self.find_by_id(id).await?;
        let mut active: executives::ActiveModel = executive.into();

        if let Some(name) = input.name {
            active.name = Set(required_name(&name)?);
        }
        if let Some(email) = input.email {
            active.email = Set(email.and_then(blank_to_none));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }
}

/// Returns the first executive of `assignment` that does not exist.
pub(crate) async fn missing_executive<C: ConnectionTrait>(
    conn: &C,
    assignment: &ExecutiveAssignment,
) -> Result<Option<Uuid>, DbErr> {
    let ids: Vec<Uuid> = assignment.ids().into_iter().map(|id| id.into_inner()).collect();
    if ids.is_empty() {
        return Ok(None);
    }

    let found: Vec<Uuid> = executives::Entity::find()
        .filter(executives::Column::Id.is_in(ids.iter().copied()))
        .select_only()
        .column(executives::Column::Id)
        .into_tuple()
        .all(conn)
        .await?;

    Ok(ids.into_iter().find(|id| !found.contains(id)))
}

fn required_name(name: &str) -> Result<String, ExecutiveError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ExecutiveError::EmptyName);
    }
    Ok(name.to_string())
}

fn blank_to_none(email: String) -> Option<String> {
    let email = email.trim().to_lowercase();
    (!email.is_empty()).then_some(email)
}
