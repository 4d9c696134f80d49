//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod client;
pub mod commission;
pub mod executive;
pub mod partner;
pub mod release;
pub mod transfer;

pub use client::{
    ClientError, ClientFilter, ClientRepository, ClientWithSlots, CreateClientInput,
    UpdateClientInput,
};
pub use commission::{CommissionFilter, CommissionRepository};
pub use executive::{
    CreateExecutiveInput, ExecutiveError, ExecutiveRepository, UpdateExecutiveInput,
};
pub use partner::{
    CreatePartnerInput, PartnerError, PartnerFilter, PartnerRepository, UpdatePartnerInput,
};
pub use release::{PeriodEvaluation, ReleaseError, ReleaseRepository, ReleaseSummary};
pub use transfer::{
    CreateTransferInput, TransferError, TransferFilter, TransferRepository,
    TransferWithCommissions, UpdateTransferInput,
};
