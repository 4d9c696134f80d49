//! Conversions between stored rows and domain values.

use alianza_core::client::{
    AdministrativeCategory, ClientTerms, CommissionSlot, ExecutiveAssignment,
};
use alianza_core::commission::PaymentStatus as DomainPaymentStatus;
use alianza_shared::types::{ClientId, ExecutiveId, PartnerId};

use crate::entities::{
    client_commission_slots, clients,
    sea_orm_active_enums::{AcCategory, PaymentStatus},
};

impl From<AcCategory> for AdministrativeCategory {
    fn from(value: AcCategory) -> Self {
        match value {
            AcCategory::Confedin => Self::Confedin,
            AcCategory::Camarence => Self::Camarence,
            AcCategory::Hatres => Self::Hatres,
            AcCategory::Serviaruga => Self::Serviaruga,
            AcCategory::Zamora => Self::Zamora,
            AcCategory::Inactivo => Self::Inactivo,
            AcCategory::Servicio => Self::Servicio,
        }
    }
}

impl From<AdministrativeCategory> for AcCategory {
    fn from(value: AdministrativeCategory) -> Self {
        match value {
            AdministrativeCategory::Confedin => Self::Confedin,
            AdministrativeCategory::Camarence => Self::Camarence,
            AdministrativeCategory::Hatres => Self::Hatres,
            AdministrativeCategory::Serviaruga => Self::Serviaruga,
            AdministrativeCategory::Zamora => Self::Zamora,
            AdministrativeCategory::Inactivo => Self::Inactivo,
            AdministrativeCategory::Servicio => Self::Servicio,
        }
    }
}

impl From<PaymentStatus> for DomainPaymentStatus {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Pending => Self::Pending,
            PaymentStatus::Paid => Self::Paid,
        }
    }
}

impl From<DomainPaymentStatus> for PaymentStatus {
    fn from(value: DomainPaymentStatus) -> Self {
        match value {
            DomainPaymentStatus::Pending => Self::Pending,
            DomainPaymentStatus::Paid => Self::Paid,
        }
    }
}

/// Calculator view of a client row.
pub fn client_terms(client: &clients::Model) -> ClientTerms {
    ClientTerms {
        client_id: ClientId::from_uuid(client.id),
        service_commission_rate: Some(client.service_commission_rate),
        category: client.ac.map(AdministrativeCategory::from),
    }
}

/// Executives assigned to a client row.
pub fn client_executives(client: &clients::Model) -> ExecutiveAssignment {
    ExecutiveAssignment {
        executive: client.executive_id.map(ExecutiveId::from_uuid),
        secondary: client.secondary_executive_id.map(ExecutiveId::from_uuid),
        support: client.support_executive_id.map(ExecutiveId::from_uuid),
    }
}

/// Domain view of a stored slot row.
pub fn commission_slot(row: &client_commission_slots::Model) -> CommissionSlot {
    CommissionSlot {
        partner_id: row.partner_id.map(PartnerId::from_uuid),
        percentage: row.percentage,
    }
}
