//! Weekly holiday allowance calculation.
//!
//! Hourly staff who work at least the threshold number of effective hours in
//! an ISO week, with no absence, are paid an extra allowance equal to their
//! average daily hours over a nominal working week times their hourly wage.
//! A week is paid in the month its Sunday falls into. A Sunday landing on the
//! 1st of the following month also counts for the month before, so that week
//! is assigned to both months.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::WeeklyHolidayConfig;
use crate::models::{
    CalculationWarning, HOLIDAY_WEEK_SLOTS, PayMonth, StaffProfile, WeeklyHolidayDetail,
    WeeklyHolidayStatus,
};

use super::aggregation::{AttendanceAggregate, WeekBucket};
use super::rounding::{round_hours, truncate_won};

/// Note attached to salaried results in place of weekly details.
pub const SALARIED_HOLIDAY_NOTE: &str =
    "holiday allowance is already included in the fixed monthly salary";

/// Warning code for a paid week with no slot in the weekly array.
pub const WEEK_SLOT_OVERFLOW_WARNING: &str = "WEEK_SLOT_OVERFLOW";

/// The result of the weekly holiday allowance calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyHolidayResult {
    /// Sum of all weekly amounts assigned to the month.
    pub total: Decimal,
    /// Amount per week slot, in chronological order.
    pub week_amounts: [Decimal; HOLIDAY_WEEK_SLOTS],
    /// One entry per week assigned to the month.
    pub details: Vec<WeeklyHolidayDetail>,
    /// Set instead of details for salaried staff.
    pub note: Option<String>,
    /// Recovered conditions.
    pub warnings: Vec<CalculationWarning>,
}

impl WeeklyHolidayResult {
    fn salaried() -> Self {
        Self {
            total: Decimal::ZERO,
            week_amounts: [Decimal::ZERO; HOLIDAY_WEEK_SLOTS],
            details: Vec::new(),
            note: Some(SALARIED_HOLIDAY_NOTE.to_string()),
            warnings: Vec::new(),
        }
    }
}

/// Returns true if the week ending on `sunday` is paid in `month`.
///
/// The rule is `month_start <= sunday <= next_month_start`. A week whose
/// Sunday is the 1st satisfies it for two consecutive months.
pub fn week_belongs_to_month(sunday: NaiveDate, month: PayMonth) -> bool {
    sunday >= month.start_date() && sunday <= month.next_month_start()
}

/// Computes the allowance for an eligible week.
///
/// `floor(round(week_hours / nominal_work_days, 2) * hourly_wage)`
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::weekly_holiday_amount;
/// use rust_decimal::Decimal;
///
/// let amount = weekly_holiday_amount(Decimal::new(30, 0), Decimal::new(10_000, 0), Decimal::new(5, 0));
/// assert_eq!(amount, Decimal::new(60_000, 0));
/// ```
pub fn weekly_holiday_amount(
    week_hours: Decimal,
    hourly_wage: Decimal,
    nominal_work_days: Decimal,
) -> Decimal {
    if nominal_work_days.is_zero() {
        return Decimal::ZERO;
    }
    truncate_won(round_hours(week_hours / nominal_work_days) * hourly_wage)
}

fn evaluate_week(
    week_index: u32,
    bucket: &WeekBucket,
    staff: &StaffProfile,
    config: &WeeklyHolidayConfig,
) -> WeeklyHolidayDetail {
    let hours = bucket.effective_hours();
    let absent = bucket.has_absence();

    let (status, amount, note) = if hours < config.min_weekly_hours {
        (
            WeeklyHolidayStatus::BelowThreshold,
            Decimal::ZERO,
            format!(
                "No allowance: {}h worked is below the {}h weekly threshold",
                hours.normalize(),
                config.min_weekly_hours.normalize()
            ),
        )
    } else if absent {
        (
            WeeklyHolidayStatus::Absence,
            Decimal::ZERO,
            format!(
                "No payment: absence during the week ({}h worked)",
                hours.normalize()
            ),
        )
    } else {
        let amount = weekly_holiday_amount(hours, staff.hourly_wage, config.nominal_work_days);
        (
            WeeklyHolidayStatus::Paid,
            amount,
            format!(
                "{}h worked, {}h average x {} = {}",
                hours.normalize(),
                round_hours(hours / config.nominal_work_days).normalize(),
                staff.hourly_wage.normalize(),
                amount.normalize()
            ),
        )
    };

    WeeklyHolidayDetail {
        week_index,
        iso_year: bucket.key.iso_year,
        iso_week: bucket.key.week,
        week_start: bucket.monday,
        week_end: bucket.sunday,
        hours,
        absent,
        status,
        amount,
        note,
    }
}

/// Calculates the weekly holiday allowance for a month.
///
/// Salaried staff short-circuit with [`SALARIED_HOLIDAY_NOTE`] and zero
/// amounts. For hourly staff every ISO week assigned to the month by
/// [`week_belongs_to_month`] gets a [`WeeklyHolidayDetail`]. The first
/// [`HOLIDAY_WEEK_SLOTS`] weeks fill `week_amounts`.
///
/// A week past the last slot is not dropped: it keeps its detail row, its
/// amount is added to `total`, and a `WEEK_SLOT_OVERFLOW` warning is raised.
/// This departs from the five-slot output, which has nowhere to put it, so
/// `total` can exceed the sum of `week_amounts` only in that case. Calendar
/// months never produce a sixth week under [`week_belongs_to_month`].
///
/// # Arguments
///
/// * `staff` - The staff member; only the contract type and hourly wage are read
/// * `aggregate` - The aggregated attendance window
/// * `config` - Threshold and nominal working days
pub fn calculate_weekly_holiday(
    staff: &StaffProfile,
    aggregate: &AttendanceAggregate,
    config: &WeeklyHolidayConfig,
) -> WeeklyHolidayResult {
    if staff.is_salaried() {
        return WeeklyHolidayResult::salaried();
    }

    let mut result = WeeklyHolidayResult {
        total: Decimal::ZERO,
        week_amounts: [Decimal::ZERO; HOLIDAY_WEEK_SLOTS],
        details: Vec::new(),
        note: None,
        warnings: Vec::new(),
    };

    let assigned = aggregate
        .weeks
        .values()
        .filter(|bucket| week_belongs_to_month(bucket.sunday, aggregate.month));

    for (position, bucket) in assigned.enumerate() {
        let week_index = u32::try_from(position + 1).unwrap_or(u32::MAX);
        let detail = evaluate_week(week_index, bucket, staff, config);

        debug!(
            staff_id = %staff.id,
            week = %format!("{}-W{:02}", bucket.key.iso_year, bucket.key.week),
            hours = %detail.hours,
            absent = detail.absent,
            amount = %detail.amount,
            "Evaluated weekly holiday allowance"
        );

        match result.week_amounts.get_mut(position) {
            Some(slot) => *slot = detail.amount,
            None => {
                warn!(
                    staff_id = %staff.id,
                    month = %aggregate.month,
                    week_index,
                    "Week has no holiday pay slot"
                );
                result.warnings.push(CalculationWarning::new(
                    WEEK_SLOT_OVERFLOW_WARNING,
                    format!(
                        "Week {} ({} to {}) exceeds the {} weekly slots; its allowance of {} is included in the total only",
                        week_index,
                        bucket.monday,
                        bucket.sunday,
                        HOLIDAY_WEEK_SLOTS,
                        detail.amount.normalize()
                    ),
                ));
            }
        }

        result.total += detail.amount;
        result.details.push(detail);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::aggregate_attendance;
    use crate::models::{AttendanceRecord, AttendanceStatus, CompanyHoliday, ContractType};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_staff(contract_type: ContractType) -> StaffProfile {
        StaffProfile {
            id: "staff_001".to_string(),
            name: "Park".to_string(),
            contract_type,
            hourly_wage: dec("10000"),
            monthly_salary: dec("3000000"),
            insurance_4_major: false,
            insurance_base_salary: Decimal::ZERO,
            dependents_count: 1,
            children_count: 0,
        }
    }

    fn create_test_config() -> WeeklyHolidayConfig {
        WeeklyHolidayConfig {
            min_weekly_hours: dec("15"),
            nominal_work_days: dec("5"),
        }
    }

    fn record(date: &str, hours: &str, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            date: make_date(date),
            total_hours: dec(hours),
            status,
        }
    }

    /// Five consecutive days starting on `monday`, each with `hours`.
    fn work_week(monday: &str, hours: &str) -> Vec<AttendanceRecord> {
        let start = make_date(monday);
        (0..5)
            .map(|offset| AttendanceRecord {
                date: start + chrono::Days::new(offset),
                total_hours: dec(hours),
                status: AttendanceStatus::Normal,
            })
            .collect()
    }

    fn run(
        staff: &StaffProfile,
        records: &[AttendanceRecord],
        holidays: &[CompanyHoliday],
        month: PayMonth,
    ) -> WeeklyHolidayResult {
        let aggregate = aggregate_attendance(staff, records, holidays, month).unwrap();
        calculate_weekly_holiday(staff, &aggregate, &create_test_config())
    }

    #[test]
    fn test_weekly_holiday_amount_formula() {
        assert_eq!(weekly_holiday_amount(dec("30"), dec("10000"), dec("5")), dec("60000"));
        assert_eq!(weekly_holiday_amount(dec("17"), dec("10000"), dec("5")), dec("34000"));
        // 16.333 / 5 = 3.2666 -> 3.27
        assert_eq!(weekly_holiday_amount(dec("16.333"), dec("10000"), dec("5")), dec("32700"));
        // 3.27 * 10030 = 32798.1 -> 32798
        assert_eq!(weekly_holiday_amount(dec("16.333"), dec("10030"), dec("5")), dec("32798"));
    }

    #[test]
    fn test_week_belongs_to_month_boundaries() {
        let march = PayMonth::new(2026, 3).unwrap();

        assert!(!week_belongs_to_month(make_date("2026-02-22"), march));
        // Sunday on the 1st of the month belongs here as well.
        assert!(week_belongs_to_month(make_date("2026-03-01"), march));
        assert!(week_belongs_to_month(make_date("2026-03-08"), march));
        assert!(week_belongs_to_month(make_date("2026-03-29"), march));
        // Sunday on the 1st of the next month still belongs here.
        assert!(week_belongs_to_month(make_date("2026-04-01"), march));
        assert!(!week_belongs_to_month(make_date("2026-04-02"), march));
    }

    #[test]
    fn test_sunday_on_first_of_next_month_is_assigned_to_current_month() {
        // 2026-11-01 is a Sunday; its week runs 2026-10-26..=2026-11-01.
        let staff = create_test_staff(ContractType::Hourly);
        let records = work_week("2026-10-26", "6");

        let october = run(&staff, &records, &[], PayMonth::new(2026, 10).unwrap());
        assert_eq!(october.total, dec("60000"));
        assert_eq!(october.details.len(), 1);

        let december = run(&staff, &records, &[], PayMonth::new(2026, 12).unwrap());
        assert!(december.details.is_empty());
    }

    #[test]
    fn test_sunday_on_month_start_is_paid_in_that_month() {
        // Same week seen from November: its Sunday is November's 1st.
        let staff = create_test_staff(ContractType::Hourly);
        let records = work_week("2026-10-26", "6");

        let november = run(&staff, &records, &[], PayMonth::new(2026, 11).unwrap());

        assert_eq!(november.total, dec("60000"));
        assert_eq!(november.week_amounts[0], dec("60000"));
        assert_eq!(november.details.len(), 1);
        assert_eq!(november.details[0].week_end, make_date("2026-11-01"));
        assert_eq!(november.details[0].status, WeeklyHolidayStatus::Paid);
    }

    #[test]
    fn test_sunday_on_second_of_next_month_is_deferred() {
        // 2026-08-02 is a Sunday; its week runs 2026-07-27..=2026-08-02.
        let staff = create_test_staff(ContractType::Hourly);
        let records = work_week("2026-07-27", "6");

        let july = run(&staff, &records, &[], PayMonth::new(2026, 7).unwrap());
        assert!(july.details.is_empty());

        let august = run(&staff, &records, &[], PayMonth::new(2026, 8).unwrap());
        assert_eq!(august.total, dec("60000"));
    }

    #[test]
    fn test_exactly_fifteen_hours_is_eligible() {
        let staff = create_test_staff(ContractType::Hourly);
        let records = work_week("2026-03-02", "3");

        let result = run(&staff, &records, &[], PayMonth::new(2026, 3).unwrap());

        assert_eq!(result.details[0].hours, dec("15"));
        assert_eq!(result.details[0].status, WeeklyHolidayStatus::Paid);
        assert_eq!(result.week_amounts[0], dec("30000"));
    }

    #[test]
    fn test_just_below_fifteen_hours_is_not_eligible() {
        let staff = create_test_staff(ContractType::Hourly);
        let mut records = work_week("2026-03-02", "3");
        records[4].total_hours = dec("2.99");

        let result = run(&staff, &records, &[], PayMonth::new(2026, 3).unwrap());

        assert_eq!(result.details[0].hours, dec("14.99"));
        assert_eq!(result.details[0].status, WeeklyHolidayStatus::BelowThreshold);
        assert_eq!(result.total, Decimal::ZERO);
    }

    #[test]
    fn test_absence_overrides_eligibility() {
        let staff = create_test_staff(ContractType::Hourly);
        let mut records = work_week("2026-03-02", "5");
        records.push(record("2026-03-07", "0", AttendanceStatus::Absence));

        let result = run(&staff, &records, &[], PayMonth::new(2026, 3).unwrap());

        let detail = &result.details[0];
        assert_eq!(detail.hours, dec("25"));
        assert!(detail.absent);
        assert_eq!(detail.status, WeeklyHolidayStatus::Absence);
        assert!(detail.note.starts_with("No payment"));
        assert_eq!(result.total, Decimal::ZERO);
    }

    #[test]
    fn test_closed_days_reduce_hours_without_absence() {
        let staff = create_test_staff(ContractType::Hourly);
        let mut records = work_week("2026-03-02", "4");
        records[0].status = AttendanceStatus::Holiday;
        let holidays = vec![CompanyHoliday {
            date: make_date("2026-03-03"),
            name: None,
        }];

        let result = run(&staff, &records, &holidays, PayMonth::new(2026, 3).unwrap());

        // Only three 4h days count.
        assert_eq!(result.details[0].hours, dec("12"));
        assert!(!result.details[0].absent);
        assert_eq!(result.details[0].status, WeeklyHolidayStatus::BelowThreshold);
    }

    #[test]
    fn test_salaried_short_circuits() {
        let staff = create_test_staff(ContractType::Salaried);
        let records = work_week("2026-03-02", "8");

        let result = run(&staff, &records, &[], PayMonth::new(2026, 3).unwrap());

        assert_eq!(result.total, Decimal::ZERO);
        assert!(result.details.is_empty());
        assert_eq!(result.note.as_deref(), Some(SALARIED_HOLIDAY_NOTE));
    }

    #[test]
    fn test_weeks_fill_slots_in_order() {
        let staff = create_test_staff(ContractType::Hourly);
        let mut records = work_week("2026-03-02", "6");
        records.extend(work_week("2026-03-16", "4"));

        let result = run(&staff, &records, &[], PayMonth::new(2026, 3).unwrap());

        assert_eq!(result.details.len(), 2);
        assert_eq!(result.details[0].week_index, 1);
        assert_eq!(result.details[1].week_index, 2);
        assert_eq!(result.week_amounts[0], dec("60000"));
        assert_eq!(result.week_amounts[1], dec("40000"));
        assert_eq!(result.total, dec("100000"));
    }

    #[test]
    fn test_sixth_week_is_paid_with_overflow_warning() {
        // A month spans at most five assignable Sundays, so the overflow path is
        // driven by a hand-built aggregate with two extra week buckets.
        let staff = create_test_staff(ContractType::Hourly);
        let mut records = Vec::new();
        for monday in ["2026-03-02", "2026-03-09", "2026-03-16", "2026-03-23"] {
            records.extend(work_week(monday, "6"));
        }
        let month = PayMonth::new(2026, 3).unwrap();
        let mut aggregate = aggregate_attendance(&staff, &records, &[], month).unwrap();

        // Copy two weeks under later ISO keys; their Sundays stay inside March.
        let extra: Vec<WeekBucket> = aggregate
            .weeks
            .values()
            .take(2)
            .cloned()
            .map(|mut bucket| {
                bucket.key.week += 40;
                bucket
            })
            .collect();
        for bucket in extra {
            aggregate.weeks.insert(bucket.key, bucket);
        }

        let result = calculate_weekly_holiday(&staff, &aggregate, &create_test_config());

        assert_eq!(result.details.len(), 6);
        assert_eq!(result.details[5].week_index, 6);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, WEEK_SLOT_OVERFLOW_WARNING);
    }

    #[test]
    fn test_sixth_week_amount_counts_toward_total_but_not_slots() {
        let staff = create_test_staff(ContractType::Hourly);
        let mut records = Vec::new();
        for monday in ["2026-03-02", "2026-03-09", "2026-03-16", "2026-03-23"] {
            records.extend(work_week(monday, "6"));
        }
        // Sixth week works 4h a day so its amount is distinguishable.
        records.extend(work_week("2026-03-30", "4"));
        let month = PayMonth::new(2026, 3).unwrap();
        let mut aggregate = aggregate_attendance(&staff, &records, &[], month).unwrap();

        // Move the April-ending week's Sunday back into March, and copy the
        // first week under a later key, giving six March buckets.
        let mut last = aggregate.weeks.values().last().cloned().unwrap();
        aggregate.weeks.remove(&last.key);
        last.key.week += 41;
        last.sunday = make_date("2026-03-29");
        aggregate.weeks.insert(last.key, last);
        let mut first = aggregate.weeks.values().next().cloned().unwrap();
        first.key.week += 40;
        aggregate.weeks.insert(first.key, first);

        let result = calculate_weekly_holiday(&staff, &aggregate, &create_test_config());

        let slot_sum: Decimal = result.week_amounts.iter().copied().sum();
        let detail_sum: Decimal = result.details.iter().map(|d| d.amount).sum();
        assert_eq!(result.details.len(), 6);
        assert_eq!(slot_sum, dec("300000"));
        assert_eq!(result.details[5].amount, dec("40000"));
        assert_eq!(result.total, detail_sum);
        assert_eq!(result.total, dec("340000"));
    }
}
