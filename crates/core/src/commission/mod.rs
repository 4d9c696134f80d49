//! Transfer commission calculation and per-partner commission generation.

pub mod calculator;
pub mod generator;
pub mod payout;
pub mod period;
pub mod types;

#[cfg(test)]
mod props;

pub use calculator::{MAX_AMOUNT, TransferCalculator, TransferCommission};
pub use generator::{CommissionDraft, CommissionGenerator, TransferSnapshot};
pub use payout::{CommissionLine, PartnerPayout, summarize_payouts};
pub use period::{CommissionPeriod, first_day_next_month};
pub use types::PaymentStatus;
