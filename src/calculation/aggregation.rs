//! Attendance aggregation.
//!
//! Splits an attendance window into the days of the target month (for base
//! pay) and ISO week buckets (for the weekly holiday allowance), computing
//! the effective hours of each day along the way.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AttendanceStatus, CalculationWarning, CompanyHoliday, PayMonth, StaffProfile,
};

/// Warning code for records whose hours were negative.
pub const NEGATIVE_HOURS_WARNING: &str = "NEGATIVE_HOURS_CLAMPED";

/// Warning code for a date that appeared more than once.
pub const DUPLICATE_DATE_WARNING: &str = "DUPLICATE_ATTENDANCE_DATE";

/// An ISO 8601 week, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekKey {
    /// ISO week-numbering year.
    pub iso_year: i32,
    /// ISO week number (1-53).
    pub week: u32,
}

impl WeekKey {
    /// Returns the ISO week containing the date.
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            iso_year: iso.year(),
            week: iso.week(),
        }
    }

    /// Returns the given weekday of this week.
    pub fn day(&self, weekday: Weekday) -> EngineResult<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.iso_year, self.week, weekday).ok_or_else(|| {
            EngineError::CalculationError {
                message: format!("Invalid ISO week {}-W{:02}", self.iso_year, self.week),
            }
        })
    }
}

/// One day of attendance after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAttendance {
    /// The date.
    pub date: NaiveDate,
    /// Recorded hours, negative values clamped to zero. Used for base pay.
    pub worked_hours: Decimal,
    /// Hours counted toward the weekly holiday allowance.
    pub effective_hours: Decimal,
    /// The recorded status.
    pub status: AttendanceStatus,
    /// Whether the store was closed that day.
    pub company_holiday: bool,
}

impl DayAttendance {
    /// True when the day counts as an absence. Closed days never do.
    pub fn is_absence(&self) -> bool {
        self.status == AttendanceStatus::Absence
    }
}

/// The attendance days falling into one ISO week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    /// The ISO week.
    pub key: WeekKey,
    /// Monday of the week.
    pub monday: NaiveDate,
    /// Sunday of the week.
    pub sunday: NaiveDate,
    /// Days with a record, in date order.
    pub days: Vec<DayAttendance>,
}

impl WeekBucket {
    /// Sum of effective hours across the week.
    pub fn effective_hours(&self) -> Decimal {
        self.days.iter().map(|d| d.effective_hours).sum()
    }

    /// True if any day in the week is an absence.
    pub fn has_absence(&self) -> bool {
        self.days.iter().any(DayAttendance::is_absence)
    }
}

/// The output of [`aggregate_attendance`].
#[derive(Debug, Clone)]
pub struct AttendanceAggregate {
    /// The target month.
    pub month: PayMonth,
    /// Days inside the calendar month, in date order.
    pub month_days: Vec<DayAttendance>,
    /// Every day of the window bucketed by ISO week, in chronological order.
    pub weeks: BTreeMap<WeekKey, WeekBucket>,
    /// Recoveries made while normalizing the input.
    pub warnings: Vec<CalculationWarning>,
}

/// Aggregates an attendance window for one staff member and month.
///
/// Effective hours are `0` on days with [`AttendanceStatus::Holiday`] or on a
/// company holiday, and the clamped recorded hours otherwise. When a date
/// occurs more than once the later record wins.
///
/// # Errors
///
/// Returns [`EngineError::NoAttendanceData`] if `records` is empty.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::aggregate_attendance;
/// use payroll_engine::models::{
///     AttendanceRecord, AttendanceStatus, CompanyHoliday, ContractType, PayMonth, StaffProfile,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let staff = StaffProfile {
///     id: "staff_001".to_string(),
///     name: String::new(),
///     contract_type: ContractType::Hourly,
///     hourly_wage: Decimal::new(10_000, 0),
///     monthly_salary: Decimal::ZERO,
///     insurance_4_major: false,
///     insurance_base_salary: Decimal::ZERO,
///     dependents_count: 1,
///     children_count: 0,
/// };
/// let records = vec![AttendanceRecord {
///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     total_hours: Decimal::new(6, 0),
///     status: AttendanceStatus::Normal,
/// }];
/// let holidays = vec![CompanyHoliday {
///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     name: None,
/// }];
///
/// let month = PayMonth::new(2026, 3).unwrap();
/// let aggregate = aggregate_attendance(&staff, &records, &holidays, month).unwrap();
/// assert_eq!(aggregate.month_days[0].worked_hours, Decimal::new(6, 0));
/// assert_eq!(aggregate.month_days[0].effective_hours, Decimal::ZERO);
/// ```
pub fn aggregate_attendance(
    staff: &StaffProfile,
    records: &[AttendanceRecord],
    holidays: &[CompanyHoliday],
    month: PayMonth,
) -> EngineResult<AttendanceAggregate> {
    if records.is_empty() {
        return Err(EngineError::NoAttendanceData {
            staff_id: staff.id.clone(),
            month: month.to_string(),
        });
    }

    let mut warnings = Vec::new();

    let mut by_date: BTreeMap<NaiveDate, &AttendanceRecord> = BTreeMap::new();
    for record in records {
        if by_date.insert(record.date, record).is_some() {
            warn!(staff_id = %staff.id, date = %record.date, "Duplicate attendance date, keeping the later record");
            warnings.push(CalculationWarning::new(
                DUPLICATE_DATE_WARNING,
                format!("More than one attendance record on {}; the later one was used", record.date),
            ));
        }
    }

    let closed: BTreeSet<NaiveDate> = holidays.iter().map(|h| h.date).collect();

    let mut month_days = Vec::new();
    let mut weeks: BTreeMap<WeekKey, WeekBucket> = BTreeMap::new();

    for (date, record) in by_date {
        if record.total_hours.is_sign_negative() && !record.total_hours.is_zero() {
            warn!(staff_id = %staff.id, date = %date, hours = %record.total_hours, "Negative hours clamped to zero");
            warnings.push(CalculationWarning::new(
                NEGATIVE_HOURS_WARNING,
                format!("Negative hours ({}) on {} were treated as 0", record.total_hours, date),
            ));
        }

        let worked_hours = record.worked_hours();
        let company_holiday = closed.contains(&date);
        let effective_hours = if company_holiday || record.status == AttendanceStatus::Holiday {
            Decimal::ZERO
        } else {
            worked_hours
        };

        let day = DayAttendance {
            date,
            worked_hours,
            effective_hours,
            status: record.status,
            company_holiday,
        };

        if month.contains_date(date) {
            month_days.push(day.clone());
        }

        let key = WeekKey::of(date);
        let bucket = match weeks.entry(key) {
            std::collections::btree_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::btree_map::Entry::Vacant(entry) => entry.insert(WeekBucket {
                key,
                monday: key.day(Weekday::Mon)?,
                sunday: key.day(Weekday::Sun)?,
                days: Vec::new(),
            }),
        };
        bucket.days.push(day);
    }

    debug!(
        staff_id = %staff.id,
        month = %month,
        month_days = month_days.len(),
        weeks = weeks.len(),
        "Aggregated attendance"
    );

    Ok(AttendanceAggregate {
        month,
        month_days,
        weeks,
        warnings,
    })
}
