//! `SeaORM` Entity for transfers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{
    InvoicingCompany, PaymentMethod, PaymentStatus, PeriodStatus, ProcessStatus,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub transfer_date: Date,
    pub executive_id: Option<Uuid>,
    pub secondary_executive_id: Option<Uuid>,
    pub support_executive_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub payment_status: PaymentStatus,
    pub process_status: ProcessStatus,
    pub period_label: Option<String>,
    pub period_status: PeriodStatus,
    pub service: String,
    pub invoicing_company: Option<InvoicingCompany>,
    pub invoice_number: Option<String>,
    pub fee_invoice_number: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub invoice_requested: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((9, 4)))")]
    pub commission_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub commission_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub commission_amount_with_tax: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Clients,
    #[sea_orm(has_many = "super::commissions::Entity")]
    Commissions,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::commissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
