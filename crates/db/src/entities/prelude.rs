//! Entity re-exports.

pub use super::client_commission_slots::Entity as ClientCommissionSlots;
pub use super::clients::Entity as Clients;
pub use super::commissions::Entity as Commissions;
pub use super::executives::Entity as Executives;
pub use super::partners::Entity as Partners;
pub use super::transfers::Entity as Transfers;
