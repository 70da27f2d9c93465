//! The payroll month value type.
//!
//! A [`PayMonth`] is the unit payroll is calculated and stored for. It is
//! written as `YYYY-MM` on every boundary (HTTP, persistence keys, logs).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A calendar month that payroll is calculated for.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayMonth;
/// use chrono::NaiveDate;
///
/// let month: PayMonth = "2026-02".parse().unwrap();
/// assert_eq!(month.start_date(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
/// assert_eq!(month.next_month_start(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
/// assert!(month.contains_date(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()));
/// assert!(!month.contains_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
/// assert_eq!(month.to_string(), "2026-02");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PayMonth {
    start: NaiveDate,
    next_start: NaiveDate,
}

impl PayMonth {
    /// Creates a pay month from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidMonth {
            value: format!("{:04}-{:02}", year, month),
        };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_start = start
            .checked_add_months(Months::new(1))
            .ok_or_else(invalid)?;
        Ok(Self { start, next_start })
    }

    /// Returns the pay month containing the given date.
    pub fn of_date(date: NaiveDate) -> EngineResult<Self> {
        Self::new(date.year(), date.month())
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// The 1-based month number.
    pub fn month(&self) -> u32 {
        self.start.month()
    }

    /// The 1st of the month.
    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// The 1st of the following month.
    pub fn next_month_start(&self) -> NaiveDate {
        self.next_start
    }

    /// The last day of the month.
    pub fn end_date(&self) -> NaiveDate {
        self.next_start.pred_opt().unwrap_or(self.start)
    }

    /// Checks if a date falls inside the calendar month.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.next_start
    }

    /// The inclusive attendance window a caller must fetch for this month.
    ///
    /// Weeks whose Sunday falls inside the month can start in the previous
    /// month, and the month-boundary rule needs a look past its end.
    pub fn attendance_window(&self, days_before: u64, days_after: u64) -> (NaiveDate, NaiveDate) {
        let from = self
            .start
            .checked_sub_days(Days::new(days_before))
            .unwrap_or(NaiveDate::MIN);
        let to = self
            .start
            .checked_add_days(Days::new(days_after))
            .unwrap_or(NaiveDate::MAX);
        (from, to)
    }
}

impl fmt::Display for PayMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for PayMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidMonth {
            value: s.to_string(),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for PayMonth {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PayMonth> for String {
    fn from(month: PayMonth) -> Self {
        month.to_string()
    }
}
