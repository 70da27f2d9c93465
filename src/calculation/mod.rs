//! Calculation logic for the payroll engine.
//!
//! The pipeline runs strictly forward: attendance aggregation, weekly
//! holiday allowance, base pay, deductions (social insurance and income
//! tax), then final assembly in [`calculate_payroll`]. Every function here
//! is pure; all data is supplied by the caller.

mod aggregation;
mod base_pay;
mod deductions;
mod income_tax;
mod insurance;
mod payroll;
mod rounding;
mod weekly_holiday;

pub use aggregation::{
    AttendanceAggregate, DUPLICATE_DATE_WARNING, DayAttendance, NEGATIVE_HOURS_WARNING,
    WeekBucket, WeekKey, aggregate_attendance,
};
pub use base_pay::{BasePayResult, SALARY_LABEL, calculate_base_pay};
pub use deductions::{DeductionResult, calculate_deductions};
pub use income_tax::{
    IncomeTaxResult, bracket_tax, calculate_income_tax, calculate_simplified_withholding,
    child_credit,
};
pub use insurance::{
    InsuranceResult, RATE_YEAR_FALLBACK_WARNING, RateSelection, calculate_insurance,
    insurance_base, select_rate_table,
};
pub use payroll::{calculate_payroll, meal_allowance};
pub use rounding::{floor_to_ten, round_hours, truncate_won};
pub use weekly_holiday::{
    SALARIED_HOLIDAY_NOTE, WEEK_SLOT_OVERFLOW_WARNING, WeeklyHolidayResult,
    calculate_weekly_holiday, week_belongs_to_month, weekly_holiday_amount,
};
