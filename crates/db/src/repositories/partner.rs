//! Partner ("alianza") repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::partners;

/// Error types for partner operations.
#[derive(Debug, thiserror::Error)]
pub enum PartnerError {
    /// Partner not found.
    #[error("Partner not found: {0}")]
    NotFound(Uuid),

    /// Partner name is blank.
    #[error("Partner name cannot be empty")]
    EmptyName,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a partner.
#[derive(Debug, Clone)]
pub struct CreatePartnerInput {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
}

/// Input for updating a partner. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdatePartnerInput {
    /// New name.
    pub name: Option<String>,
    /// New email; `Some(None)` clears it.
    pub email: Option<Option<String>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Filter for listing partners.
#[derive(Debug, Clone, Default)]
pub struct PartnerFilter {
    /// Only active or only inactive partners.
    pub is_active: Option<bool>,
    /// Substring of the name.
    pub search: Option<String>,
}

/// Partner repository.
#[derive(Debug, Clone)]
pub struct PartnerRepository {
    db: DatabaseConnection,
}

impl PartnerRepository {
    /// Creates a new partner repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a partner.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub async fn create(&self, input: CreatePartnerInput) -> Result<partners::Model, PartnerError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(PartnerError::EmptyName);
        }

        let now = Utc::now().into();
        let partner = partners::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name),
            email: Set(normalize_email(input.email)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(partner.insert(&self.db).await?)
    }

    /// Finds a partner by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the partner does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<partners::Model, PartnerError> {
        partners::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PartnerError::NotFound(id))
    }

    /// Lists partners ordered by name, returning the page and the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        filter: &PartnerFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<partners::Model>, u64), PartnerError> {
        let mut query = partners::Entity::find();
        if let Some(is_active) = filter.is_active {
            query = query.filter(partners::Column::IsActive.eq(is_active));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(partners::Column::Name.contains(search));
        }

        let total = query.clone().count(&self.db).await?;
        let partners = query
            .order_by_asc(partners::Column::Name)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok((partners, total))
    }

    /// Updates a partner.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the partner does not exist, `EmptyName` for a
    /// blank name.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdatePartnerInput,
    ) -> Result<partners::Model, PartnerError> {
        let partner = self.find_by_id(id).await?;
        let mut active: partners::ActiveModel = partner.into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(PartnerError::EmptyName);
            }
            active.name = Set(name);
        }
        if let Some(email) = input.email {
            active.email = Set(normalize_email(email));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }
}

/// Trims an email and maps blank input to `None`.
fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}
