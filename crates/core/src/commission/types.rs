//! Commission-related value types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommissionError;

/// Payment status of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Not yet paid by the client.
    #[default]
    Pending,
    /// Paid in full.
    Paid,
}

impl PaymentStatus {
    /// Returns true if the transfer is paid.
    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Stored code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = CommissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Ok(Self::Pending),
            "paid" | "pagado" => Ok(Self::Paid),
            _ => Err(CommissionError::UnknownValue {
                kind: "payment status",
                value: s.to_string(),
            }),
        }
    }
}
