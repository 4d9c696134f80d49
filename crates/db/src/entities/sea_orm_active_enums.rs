//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Administrative category of a client (`ac_category`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ac_category")]
#[serde(rename_all = "UPPERCASE")]
pub enum AcCategory {
    #[sea_orm(string_value = "CONFEDIN")]
    Confedin,
    #[sea_orm(string_value = "CAMARENCE")]
    Camarence,
    #[sea_orm(string_value = "HATRES")]
    Hatres,
    #[sea_orm(string_value = "SERVIARUGA")]
    Serviaruga,
    #[sea_orm(string_value = "ZAMORA")]
    Zamora,
    #[sea_orm(string_value = "INACTIVO")]
    Inactivo,
    #[sea_orm(string_value = "SERVICIO")]
    Servicio,
}

/// Payment status of a transfer (`payment_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Processing status of a transfer (`process_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "process_status")]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "applied")]
    Applied,
}

/// Invoicing status of a transfer's period (`period_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_status")]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "closed")]
    Closed,
    #[sea_orm(string_value = "stamped")]
    Stamped,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "sent_individually")]
    SentIndividually,
    #[sea_orm(string_value = "drive")]
    Drive,
}

/// Company issuing the invoice (`invoicing_company`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoicing_company")]
#[serde(rename_all = "lowercase")]
pub enum InvoicingCompany {
    #[sea_orm(string_value = "anmara")]
    Anmara,
    #[sea_orm(string_value = "morwell")]
    Morwell,
    #[sea_orm(string_value = "onopko")]
    Onopko,
}

/// SAT payment method (`payment_method`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "PPD")]
    #[serde(rename = "PPD")]
    Ppd,
    #[sea_orm(string_value = "PUE")]
    #[serde(rename = "PUE")]
    Pue,
}
