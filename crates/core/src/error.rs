//! Commission domain errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by commission configuration, calculation and release rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommissionError {
    /// A percentage string could not be parsed as a decimal number.
    #[error("Invalid percentage: {0:?}")]
    InvalidPercentage(String),

    /// A stored fraction falls outside `[0, 1]`.
    #[error("Percentage out of range: {0} (expected a fraction between 0 and 1)")]
    PercentageOutOfRange(Decimal),

    /// More commission slots than a client can hold.
    #[error("Too many commission slots: {count} (maximum {max})")]
    TooManySlots {
        /// Number of slots supplied.
        count: usize,
        /// Maximum number of slots.
        max: usize,
    },

    /// A transfer was submitted without a client.
    #[error("Transfer has no client reference")]
    MissingClientReference,

    /// A transfer amount is negative.
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// An amount exceeds what can be computed and stored.
    #[error("Amount out of range: {0} (maximum {max})", max = crate::commission::MAX_AMOUNT)]
    AmountOutOfRange(Decimal),

    /// Month/year pair does not describe a valid calendar month.
    #[error("Invalid period: month {month}, year {year}")]
    InvalidPeriod {
        /// Month number.
        month: u32,
        /// Year.
        year: i32,
    },

    /// An enumerated value could not be recognized.
    #[error("Unknown {kind}: {value:?}")]
    UnknownValue {
        /// Which enumeration was being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}
