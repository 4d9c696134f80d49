//! `SeaORM` entity definitions.

pub mod prelude;

pub mod client_commission_slots;
pub mod clients;
pub mod commissions;
pub mod executives;
pub mod partners;
pub mod sea_orm_active_enums;
pub mod transfers;
