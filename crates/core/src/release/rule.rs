//! The month-end release rule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::commission::{CommissionPeriod, PaymentStatus};

/// Release state of a whole period group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseState {
    /// Not payable yet.
    Held,
    /// Payable.
    Released,
}

impl ReleaseState {
    /// Value stored in each row's `released` flag.
    #[must_use]
    pub const fn is_released(self) -> bool {
        matches!(self, Self::Released)
    }

    /// State corresponding to a stored flag.
    #[must_use]
    pub const fn from_flag(released: bool) -> Self {
        if released { Self::Released } else { Self::Held }
    }
}

/// Decides whether a period group is released.
pub struct ReleaseRule;

impl ReleaseRule {
    /// Evaluates the rule for one group and period.
    ///
    /// Released iff the month has closed (`today >= releasable_from`) and the
    /// group has at least one transfer in the period, all of them paid. Any
    /// other combination is `Held`, which lets a regressed period flip back.
    pub fn evaluate<I>(period: &CommissionPeriod, today: NaiveDate, statuses: I) -> ReleaseState
    where
        I: IntoIterator<Item = PaymentStatus>,
    {
        if !period.is_closed_on(today) {
            return ReleaseState::Held;
        }
        if Self::all_paid(statuses) {
            ReleaseState::Released
        } else {
            ReleaseState::Held
        }
    }

    /// True when there is at least one status and every status is paid.
    pub fn all_paid<I>(statuses: I) -> bool
    where
        I: IntoIterator<Item = PaymentStatus>,
    {
        let mut seen = false;
        for status in statuses {
            if !status.is_paid() {
                return false;
            }
            seen = true;
        }
        seen
    }
}

/// Normalizes a client name for grouping: collapse internal whitespace,
/// strip, uppercase.
#[must_use]
pub fn normalize_client_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
