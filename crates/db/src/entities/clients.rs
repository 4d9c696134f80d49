//! `SeaORM` Entity for clients table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AcCategory;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub business_name: String,
    pub name_key: String,
    pub ac: Option<AcCategory>,
    pub service: String,
    pub executive_id: Option<Uuid>,
    pub secondary_executive_id: Option<Uuid>,
    pub support_executive_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((9, 6)))")]
    pub service_commission_rate: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::client_commission_slots::Entity")]
    ClientCommissionSlots,
    #[sea_orm(has_many = "super::transfers::Entity")]
    Transfers,
    #[sea_orm(has_many = "super::commissions::Entity")]
    Commissions,
}

impl Related<super::client_commission_slots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientCommissionSlots.def()
    }
}

impl Related<super::transfers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transfers.def()
    }
}

impl Related<super::commissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
