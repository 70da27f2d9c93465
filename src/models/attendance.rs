//! Attendance and company holiday models.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The attendance status recorded for a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// A regular working day.
    #[default]
    Normal,
    /// An unexcused absence. Voids the weekly holiday allowance for its week.
    Absence,
    /// A day off for the staff member. Counts zero effective hours, never an absence.
    Holiday,
}

/// One attendance row for a staff member on a date.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let record = AttendanceRecord {
///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     total_hours: Decimal::new(-2, 0),
///     status: AttendanceStatus::Normal,
/// };
/// assert_eq!(record.worked_hours(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The calendar date of the record.
    pub date: NaiveDate,
    /// Hours recorded for the day.
    pub total_hours: Decimal,
    /// The attendance status for the day.
    #[serde(default)]
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Returns the recorded hours, with negative values clamped to zero.
    pub fn worked_hours(&self) -> Decimal {
        self.total_hours.max(Decimal::ZERO)
    }

    /// Returns the day of the week for the record.
    pub fn day_of_week(&self) -> Weekday {
        self.date.weekday()
    }
}

/// A date on which the store is closed for all staff.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompanyHoliday {
    /// The closed date.
    pub date: NaiveDate,
    /// Optional label (e.g. "Chuseok").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
