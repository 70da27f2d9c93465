//! Payroll assembly.
//!
//! Runs the full pipeline for one staff member and month: attendance
//! aggregation, weekly holiday allowance, base pay, meal allowance,
//! deductions and the salaried tax support bonus.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::{AttendanceRecord, CompanyHoliday, PayMonth, PayrollResult, StaffProfile};

use super::aggregation::aggregate_attendance;
use super::base_pay::calculate_base_pay;
use super::deductions::calculate_deductions;
use super::weekly_holiday::calculate_weekly_holiday;

/// Non-taxable meal allowance carved out of gross pay for salaried staff.
pub fn meal_allowance(staff: &StaffProfile, gross_pay: Decimal, cap: Decimal) -> Decimal {
    if staff.is_salaried() {
        gross_pay.min(cap).max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}

/// Calculates the monthly payroll for a staff member.
///
/// This is a pure function of its inputs: the same arguments always produce
/// an identical [`PayrollResult`].
///
/// # Arguments
///
/// * `staff` - The staff profile
/// * `records` - Attendance covering the window returned by
///   [`PayMonth::attendance_window`] for the configured window
/// * `holidays` - Company closure dates in the same window
/// * `month` - The payroll month
/// * `rate_year` - Year whose insurance rate tier applies, normally `month.year()`
/// * `config` - The payroll configuration
///
/// # Errors
///
/// * [`EngineError::InvalidStaffProfile`](crate::error::EngineError::InvalidStaffProfile)
///   if the profile fails validation
/// * [`EngineError::NoAttendanceData`](crate::error::EngineError::NoAttendanceData)
///   if `records` is empty
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_payroll;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{
///     AttendanceRecord, AttendanceStatus, ContractType, PayMonth, StaffProfile,
/// };
/// use chrono::{Days, NaiveDate};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/kr_payroll").unwrap();
/// let staff = StaffProfile {
///     id: "staff_001".to_string(),
///     name: "Han".to_string(),
///     contract_type: ContractType::Hourly,
///     hourly_wage: Decimal::new(10_000, 0),
///     monthly_salary: Decimal::ZERO,
///     insurance_4_major: false,
///     insurance_base_salary: Decimal::ZERO,
///     dependents_count: 1,
///     children_count: 0,
/// };
/// let monday = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
/// let records: Vec<AttendanceRecord> = (0..5)
///     .map(|i| AttendanceRecord {
///         date: monday + Days::new(i),
///         total_hours: Decimal::new(6, 0),
///         status: AttendanceStatus::Normal,
///     })
///     .collect();
///
/// let month = PayMonth::new(2026, 3).unwrap();
/// let result = calculate_payroll(&staff, &records, &[], month, 2026, loader.config()).unwrap();
///
/// assert_eq!(result.base_pay, Decimal::new(300_000, 0));
/// assert_eq!(result.holiday_pay_total, Decimal::new(60_000, 0));
/// assert_eq!(result.net_pay, Decimal::new(348_120, 0));
/// ```
pub fn calculate_payroll(
    staff: &StaffProfile,
    records: &[AttendanceRecord],
    holidays: &[CompanyHoliday],
    month: PayMonth,
    rate_year: i32,
    config: &PayrollConfig,
) -> EngineResult<PayrollResult> {
    staff.validate()?;
    let settings = config.settings();

    let aggregate = aggregate_attendance(staff, records, holidays, month)?;
    let holiday = calculate_weekly_holiday(staff, &aggregate, &settings.weekly_holiday);
    let base = calculate_base_pay(staff, &aggregate.month_days);

    let gross_pay = base.base_pay + holiday.total;
    let meal_allowance = meal_allowance(staff, gross_pay, settings.meal_allowance_cap);
    let taxable_income = (gross_pay - meal_allowance).max(Decimal::ZERO);

    debug!(
        staff_id = %staff.id,
        month = %month,
        gross_pay = %gross_pay,
        taxable_income = %taxable_income,
        "Assembled gross pay"
    );

    let deductions = calculate_deductions(staff, gross_pay, taxable_income, rate_year, config)?;
    let total_deductions = deductions.lines.total();
    let net_pay = gross_pay - total_deductions;
    let tax_support_bonus = if staff.is_salaried() {
        total_deductions
    } else {
        Decimal::ZERO
    };
    let final_pay = net_pay + tax_support_bonus;

    let mut warnings = aggregate.warnings;
    warnings.extend(holiday.warnings);
    warnings.extend(deductions.warnings);

    info!(
        staff_id = %staff.id,
        month = %month,
        contract_type = %staff.contract_type,
        final_pay = %final_pay,
        warnings = warnings.len(),
        "Payroll calculated"
    );

    Ok(PayrollResult {
        staff_id: staff.id.clone(),
        month,
        contract_type: staff.contract_type,
        rate_year,
        base_pay: base.base_pay,
        holiday_pay_total: holiday.total,
        holiday_pay_week: holiday.week_amounts,
        gross_pay,
        meal_allowance,
        taxable_income,
        deductions: deductions.lines,
        total_deductions,
        net_pay,
        tax_support_bonus,
        final_pay,
        work_breakdown: base.entries,
        weekly_holiday_details: holiday.details,
        holiday_note: holiday.note,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::SALARIED_HOLIDAY_NOTE;
    use crate::config::fixtures::test_config;
    use crate::error::EngineError;
    use crate::models::{AttendanceStatus, ContractType};
    use chrono::{Days, NaiveDate};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_hourly_staff() -> StaffProfile {
        StaffProfile {
            id: "staff_001".to_string(),
            name: "Han".to_string(),
            contract_type: ContractType::Hourly,
            hourly_wage: dec("10000"),
            monthly_salary: Decimal::ZERO,
            insurance_4_major: false,
            insurance_base_salary: Decimal::ZERO,
            dependents_count: 1,
            children_count: 0,
        }
    }

    fn create_salaried_staff(monthly_salary: &str) -> StaffProfile {
        StaffProfile {
            id: "staff_002".to_string(),
            name: "Seo".to_string(),
            contract_type: ContractType::Salaried,
            hourly_wage: Decimal::ZERO,
            monthly_salary: dec(monthly_salary),
            insurance_4_major: true,
            insurance_base_salary: Decimal::ZERO,
            dependents_count: 1,
            children_count: 0,
        }
    }

    fn work_week(monday: &str, hours: &str) -> Vec<AttendanceRecord> {
        let start = make_date(monday);
        (0..5)
            .map(|offset| AttendanceRecord {
                date: start + Days::new(offset),
                total_hours: dec(hours),
                status: AttendanceStatus::Normal,
            })
            .collect()
    }

    fn march() -> PayMonth {
        PayMonth::new(2026, 3).unwrap()
    }

    #[test]
    fn test_hourly_end_to_end() {
        let staff = create_hourly_staff();
        let records = work_week("2026-03-09", "6");

        let result =
            calculate_payroll(&staff, &records, &[], march(), 2026, &test_config()).unwrap();

        assert_eq!(result.base_pay, dec("300000"));
        assert_eq!(result.holiday_pay_total, dec("60000"));
        assert_eq!(result.holiday_pay_week[0], dec("60000"));
        assert_eq!(result.gross_pay, dec("360000"));
        assert_eq!(result.meal_allowance, Decimal::ZERO);
        assert_eq!(result.taxable_income, dec("360000"));
        assert_eq!(result.deductions.income_tax, dec("10800"));
        assert_eq!(result.deductions.local_income_tax, dec("1080"));
        assert_eq!(result.total_deductions, dec("11880"));
        assert_eq!(result.net_pay, dec("348120"));
        assert_eq!(result.tax_support_bonus, Decimal::ZERO);
        assert_eq!(result.final_pay, dec("348120"));
        assert_eq!(result.work_breakdown.len(), 1);
        assert_eq!(result.work_breakdown[0].days, vec![9, 10, 11, 12, 13]);
        assert!(result.holiday_note.is_none());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_salaried_round_trip() {
        let staff = create_salaried_staff("3500000");
        let records = work_week("2026-03-09", "8");

        let result =
            calculate_payroll(&staff, &records, &[], march(), 2026, &test_config()).unwrap();

        assert_eq!(result.base_pay, dec("3500000"));
        assert_eq!(result.holiday_pay_total, Decimal::ZERO);
        assert_eq!(result.holiday_note.as_deref(), Some(SALARIED_HOLIDAY_NOTE));
        assert_eq!(result.meal_allowance, dec("200000"));
        assert_eq!(result.taxable_income, dec("3300000"));
        assert_eq!(result.total_deductions, dec("467140"));
        assert_eq!(result.tax_support_bonus, result.total_deductions);
        assert_eq!(result.net_pay, dec("3032860"));
        assert_eq!(result.final_pay, result.gross_pay);
    }

    #[test]
    fn test_salaried_meal_allowance_capped_by_gross() {
        let staff = create_salaried_staff("150000");
        let result = calculate_payroll(
            &staff,
            &work_week("2026-03-09", "8"),
            &[],
            march(),
            2026,
            &test_config(),
        )
        .unwrap();

        assert_eq!(result.meal_allowance, dec("150000"));
        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert_eq!(result.final_pay, result.gross_pay);
    }

    #[test]
    fn test_no_month_days_still_produces_zero_result() {
        let staff = create_hourly_staff();
        // Only attendance from a week ending before the month starts.
        let records = work_week("2026-02-16", "6");

        let result =
            calculate_payroll(&staff, &records, &[], march(), 2026, &test_config()).unwrap();

        assert_eq!(result.base_pay, Decimal::ZERO);
        assert_eq!(result.holiday_pay_total, Decimal::ZERO);
        assert_eq!(result.final_pay, Decimal::ZERO);
        assert!(result.work_breakdown.is_empty());
    }

    #[test]
    fn test_week_spanning_month_start_splits_base_and_allowance() {
        // Week 2026-03-30..=2026-04-05: March days stay in March base pay,
        // the whole week's allowance goes to April.
        let staff = create_hourly_staff();
        let records = work_week("2026-03-30", "6");

        let result = calculate_payroll(
            &staff,
            &records,
            &[],
            PayMonth::new(2026, 4).unwrap(),
            2026,
            &test_config(),
        )
        .unwrap();

        // 2026-04-01..=04-03 worked in April.
        assert_eq!(result.base_pay, dec("180000"));
        assert_eq!(result.holiday_pay_total, dec("60000"));
    }

    #[test]
    fn test_empty_attendance_fails() {
        let result =
            calculate_payroll(&create_hourly_staff(), &[], &[], march(), 2026, &test_config());
        assert!(matches!(result, Err(EngineError::NoAttendanceData { .. })));
    }

    #[test]
    fn test_invalid_profile_fails() {
        let mut staff = create_hourly_staff();
        staff.dependents_count = 0;

        let result = calculate_payroll(
            &staff,
            &work_week("2026-03-09", "6"),
            &[],
            march(),
            2026,
            &test_config(),
        );
        assert!(matches!(result, Err(EngineError::InvalidStaffProfile { .. })));
    }

    #[test]
    fn test_recalculation_is_identical() {
        let staff = create_hourly_staff();
        let records = work_week("2026-03-09", "6");
        let config = test_config();

        let first = calculate_payroll(&staff, &records, &[], march(), 2026, &config).unwrap();
        let second = calculate_payroll(&staff, &records, &[], march(), 2026, &config).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
