//! Period selection for batch release runs.

use chrono::{Datelike, NaiveDate};

use crate::commission::CommissionPeriod;
use crate::error::CommissionError;

/// Period a batch run targets, and whether the requested month had to be
/// replaced by the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPeriod {
    /// Period to evaluate.
    pub period: CommissionPeriod,
    /// True when an out-of-range month was replaced by the previous month.
    pub fell_back: bool,
}

/// Resolves the `(month, year)` arguments of a batch run.
///
/// - No month: the calendar month before `today`; an explicit year still
///   applies.
/// - Month without year: that month of `today`'s year.
/// - Month outside 1-12: both arguments are dropped in favour of the month
///   before `today`, and `fell_back` is set.
///
/// # Errors
///
/// Returns `InvalidPeriod` only when the resulting year is not representable.
pub fn resolve_batch_period(
    month: Option<u32>,
    year: Option<i32>,
    today: NaiveDate,
) -> Result<ResolvedPeriod, CommissionError> {
    let previous = CommissionPeriod::previous_to(today)?;

    match month {
        Some(m) if !(1..=12).contains(&m) => Ok(ResolvedPeriod {
            period: previous,
            fell_back: true,
        }),
        Some(m) => Ok(ResolvedPeriod {
            period: CommissionPeriod::new(m, year.unwrap_or_else(|| today.year()))?,
            fell_back: false,
        }),
        None => Ok(ResolvedPeriod {
            period: CommissionPeriod::new(previous.month(), year.unwrap_or(previous.year()))?,
            fell_back: false,
        }),
    }
}
