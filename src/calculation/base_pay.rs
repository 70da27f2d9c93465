//! Base pay calculation.
//!
//! Hourly staff are paid for the recorded hours of each day in the calendar
//! month, grouped by distinct daily hour count for the breakdown. Salaried
//! staff are paid the fixed monthly salary as a single synthetic row.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{StaffProfile, WorkBreakdownEntry};

use super::aggregation::DayAttendance;
use super::rounding::truncate_won;

/// Label of the synthetic salaried breakdown row.
pub const SALARY_LABEL: &str = "Monthly salary";

/// The result of a base pay calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePayResult {
    /// Total base pay.
    pub base_pay: Decimal,
    /// Breakdown rows, hourly groups sorted by hours descending.
    pub entries: Vec<WorkBreakdownEntry>,
}

/// Calculates base pay from the days inside the payroll month.
///
/// Days with zero worked hours are left out of the breakdown. Each hourly
/// group amount is `hours * hourly_wage * day_count`, truncated to whole won.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_base_pay;
/// use payroll_engine::models::{ContractType, StaffProfile};
/// use rust_decimal::Decimal;
///
/// let staff = StaffProfile {
///     id: "staff_002".to_string(),
///     name: String::new(),
///     contract_type: ContractType::Salaried,
///     hourly_wage: Decimal::ZERO,
///     monthly_salary: Decimal::new(3_500_000, 0),
///     insurance_4_major: true,
///     insurance_base_salary: Decimal::ZERO,
///     dependents_count: 1,
///     children_count: 0,
/// };
///
/// let result = calculate_base_pay(&staff, &[]);
/// assert_eq!(result.base_pay, Decimal::new(3_500_000, 0));
/// assert_eq!(result.entries.len(), 1);
/// ```
pub fn calculate_base_pay(staff: &StaffProfile, month_days: &[DayAttendance]) -> BasePayResult {
    let worked: Vec<&DayAttendance> = month_days
        .iter()
        .filter(|d| d.worked_hours > Decimal::ZERO)
        .collect();

    if staff.is_salaried() {
        let entry = WorkBreakdownEntry {
            label: SALARY_LABEL.to_string(),
            rate: staff.monthly_salary,
            hours: worked.iter().map(|d| d.worked_hours).sum(),
            day_count: count(worked.len()),
            amount: staff.monthly_salary,
            days: worked.iter().map(|d| d.date.day()).collect(),
        };
        return BasePayResult {
            base_pay: staff.monthly_salary,
            entries: vec![entry],
        };
    }

    let mut groups: BTreeMap<Decimal, Vec<u32>> = BTreeMap::new();
    for day in &worked {
        groups
            .entry(day.worked_hours.normalize())
            .or_default()
            .push(day.date.day());
    }

    let entries: Vec<WorkBreakdownEntry> = groups
        .into_iter()
        .rev()
        .map(|(hours, days)| {
            let day_count = count(days.len());
            let amount = truncate_won(hours * staff.hourly_wage * Decimal::from(day_count));
            WorkBreakdownEntry {
                label: format!("{}h x {} days", hours, day_count),
                rate: staff.hourly_wage,
                hours,
                day_count,
                amount,
                days,
            }
        })
        .collect();

    let base_pay = entries.iter().map(|e| e.amount).sum();

    debug!(staff_id = %staff.id, groups = entries.len(), base_pay = %base_pay, "Calculated base pay");

    BasePayResult { base_pay, entries }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, ContractType};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_staff(contract_type: ContractType) -> StaffProfile {
        StaffProfile {
            id: "staff_001".to_string(),
            name: "Choi".to_string(),
            contract_type,
            hourly_wage: dec("10030"),
            monthly_salary: dec("3500000"),
            insurance_4_major: false,
            insurance_base_salary: Decimal::ZERO,
            dependents_count: 1,
            children_count: 0,
        }
    }

    fn day(date: &str, hours: &str) -> DayAttendance {
        DayAttendance {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            worked_hours: dec(hours),
            effective_hours: dec(hours),
            status: AttendanceStatus::Normal,
            company_holiday: false,
        }
    }

    #[test]
    fn test_hourly_groups_sorted_by_hours_descending() {
        let staff = create_test_staff(ContractType::Hourly);
        let days = vec![
            day("2026-03-02", "4"),
            day("2026-03-03", "6.5"),
            day("2026-03-04", "4.0"),
            day("2026-03-05", "8"),
        ];

        let result = calculate_base_pay(&staff, &days);

        let hours: Vec<Decimal> = result.entries.iter().map(|e| e.hours).collect();
        assert_eq!(hours, vec![dec("8"), dec("6.5"), dec("4")]);

        let four = &result.entries[2];
        assert_eq!(four.day_count, 2);
        assert_eq!(four.days, vec![2, 4]);
        assert_eq!(four.amount, dec("80240"));
    }

    #[test]
    fn test_hourly_base_pay_is_sum_of_groups() {
        let staff = create_test_staff(ContractType::Hourly);
        let days = vec![day("2026-03-02", "3.3"), day("2026-03-03", "8")];

        let result = calculate_base_pay(&staff, &days);

        // 3.3 * 10030 = 33099, 8 * 10030 = 80240
        assert_eq!(result.base_pay, dec("113339"));
    }

    #[test]
    fn test_group_amount_is_truncated() {
        let staff = create_test_staff(ContractType::Hourly);
        // 1.25 * 10030 = 12537.5
        let result = calculate_base_pay(&staff, &[day("2026-03-02", "1.25")]);
        assert_eq!(result.base_pay, dec("12537"));
    }

    #[test]
    fn test_zero_hour_days_are_skipped() {
        let staff = create_test_staff(ContractType::Hourly);
        let result = calculate_base_pay(&staff, &[day("2026-03-02", "0")]);

        assert!(result.entries.is_empty());
        assert_eq!(result.base_pay, Decimal::ZERO);
    }

    #[test]
    fn test_salaried_single_synthetic_row() {
        let staff = create_test_staff(ContractType::Salaried);
        let days = vec![day("2026-03-02", "8"), day("2026-03-03", "8")];

        let result = calculate_base_pay(&staff, &days);

        assert_eq!(result.base_pay, dec("3500000"));
        assert_eq!(result.entries.len(), 1);
        let entry = &result.entries[0];
        assert_eq!(entry.label, SALARY_LABEL);
        assert_eq!(entry.hours, dec("16"));
        assert_eq!(entry.day_count, 2);
        assert_eq!(entry.amount, dec("3500000"));
    }
}
