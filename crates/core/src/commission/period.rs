//! Monthly commission periods.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate};

use crate::error::CommissionError;

/// A calendar month that commissions are grouped by.
///
/// The month following the period is when its commissions may be released
/// ("mes vencido"): a March period becomes releasable on April 1st.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommissionPeriod {
    start: NaiveDate,
    releasable_from: NaiveDate,
}

impl CommissionPeriod {
    /// Creates a period from a month (1-12) and year.
    ///
    /// # Errors
    ///
    /// Returns `CommissionError::InvalidPeriod` if the month is out of range
    /// or the year is not representable.
    pub fn new(month: u32, year: i32) -> Result<Self, CommissionError> {
        let invalid = || CommissionError::InvalidPeriod { month, year };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let releasable_from = start.checked_add_months(Months::new(1)).ok_or_else(invalid)?;
        Ok(Self {
            start,
            releasable_from,
        })
    }

    /// The period a date falls in.
    ///
    /// # Errors
    ///
    /// Returns `CommissionError::InvalidPeriod` at the edge of the calendar.
    pub fn containing(date: NaiveDate) -> Result<Self, CommissionError> {
        Self::new(date.month(), date.year())
    }

    /// The calendar month before the one containing `date`.
    ///
    /// # Errors
    ///
    /// Returns `CommissionError::InvalidPeriod` at the edge of the calendar.
    pub fn previous_to(date: NaiveDate) -> Result<Self, CommissionError> {
        let (month, year) = if date.month() == 1 {
            (12, date.year() - 1)
        } else {
            (date.month() - 1, date.year())
        };
        Self::new(month, year)
    }

    /// Month number, 1-12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.start.month()
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// First day of the period.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day of the following month; the release threshold.
    #[must_use]
    pub const fn releasable_from(&self) -> NaiveDate {
        self.releasable_from
    }

    /// Returns true if `date` falls within the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.releasable_from
    }

    /// Returns true once the month has closed as of `today`.
    #[must_use]
    pub fn is_closed_on(&self, today: NaiveDate) -> bool {
        today >= self.releasable_from
    }
}

impl fmt::Display for CommissionPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// First calendar day of the month after `date`.
///
/// # Errors
///
/// Returns `CommissionError::InvalidPeriod` at the edge of the calendar.
pub fn first_day_next_month(date: NaiveDate) -> Result<NaiveDate, CommissionError> {
    Ok(CommissionPeriod::containing(date)?.releasable_from())
}
