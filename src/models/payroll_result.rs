//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] type and the structured
//! breakdowns attached to it. Breakdowns stay typed inside the engine and are
//! only turned into JSON at the persistence or HTTP boundary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ContractType, PayMonth};

/// Number of weekly holiday allowance slots carried per month.
pub const HOLIDAY_WEEK_SLOTS: usize = 5;

/// One line of the base pay breakdown.
///
/// Hourly staff get one entry per distinct daily hour count; salaried staff
/// get a single synthetic entry for the fixed salary.
///
/// # Example
///
/// ```
/// use payroll_engine::models::WorkBreakdownEntry;
/// use rust_decimal::Decimal;
///
/// let entry = WorkBreakdownEntry {
///     label: "6h days".to_string(),
///     rate: Decimal::new(10_000, 0),
///     hours: Decimal::new(6, 0),
///     day_count: 5,
///     amount: Decimal::new(300_000, 0),
///     days: vec![2, 3, 4, 5, 6],
/// };
/// assert_eq!(entry.amount, entry.rate * entry.hours * Decimal::from(entry.day_count));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkBreakdownEntry {
    /// Display label for the row.
    pub label: String,
    /// Hourly wage, or the monthly salary for the synthetic salaried row.
    pub rate: Decimal,
    /// Hours per matching day (total month hours for the salaried row).
    pub hours: Decimal,
    /// Number of days in the group.
    pub day_count: u32,
    /// Amount paid for the group.
    pub amount: Decimal,
    /// Day-of-month numbers belonging to the group.
    pub days: Vec<u32>,
}

/// Outcome of the weekly holiday allowance check for one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyHolidayStatus {
    /// The week met the threshold with no absence and is paid.
    Paid,
    /// The week met the threshold but contained an absence.
    Absence,
    /// The week did not reach the hour threshold.
    BelowThreshold,
}

/// The weekly holiday allowance explanation for one ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHolidayDetail {
    /// 1-based position of the week within the month.
    pub week_index: u32,
    /// ISO week-numbering year.
    pub iso_year: i32,
    /// ISO week number.
    pub iso_week: u32,
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// Sunday of the week.
    pub week_end: NaiveDate,
    /// Effective hours summed over the week.
    pub hours: Decimal,
    /// Whether any day in the week was an absence.
    pub absent: bool,
    /// The eligibility outcome.
    pub status: WeeklyHolidayStatus,
    /// Allowance paid for the week.
    pub amount: Decimal,
    /// Human-readable explanation.
    pub note: String,
}

/// The six statutory deduction lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionLines {
    /// National pension.
    pub national_pension: Decimal,
    /// Health insurance.
    pub health_insurance: Decimal,
    /// Long-term care insurance.
    pub long_term_care: Decimal,
    /// Employment insurance.
    pub employment_insurance: Decimal,
    /// Income tax withholding.
    pub income_tax: Decimal,
    /// Local income surtax.
    pub local_income_tax: Decimal,
}

impl DeductionLines {
    /// Sum of all six lines.
    pub fn total(&self) -> Decimal {
        self.national_pension
            + self.health_insurance
            + self.long_term_care
            + self.employment_insurance
            + self.income_tax
            + self.local_income_tax
    }
}

/// A non-fatal condition recovered from during calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationWarning {
    /// A stable code identifying the condition.
    pub code: String,
    /// A human-readable description.
    pub message: String,
}

impl CalculationWarning {
    /// Creates a new warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Payment state written back by the transfer subsystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Not yet transferred.
    #[default]
    Pending,
    /// Transfer executed.
    Completed,
    /// Transfer attempted and failed.
    Failed,
}

/// The finalized monthly payroll for one staff member.
///
/// Contains no timestamps or generated ids, so recalculating with unchanged
/// inputs serializes to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// The staff member the result belongs to.
    pub staff_id: String,
    /// The payroll month.
    pub month: PayMonth,
    /// Contract type at calculation time.
    pub contract_type: ContractType,
    /// The year whose insurance rate tier was applied.
    pub rate_year: i32,
    /// Pay for time worked (or the fixed salary).
    pub base_pay: Decimal,
    /// Sum of all weekly holiday allowances assigned to the month.
    pub holiday_pay_total: Decimal,
    /// Weekly holiday allowance per slot.
    pub holiday_pay_week: [Decimal; HOLIDAY_WEEK_SLOTS],
    /// Base pay plus holiday allowance.
    pub gross_pay: Decimal,
    /// Non-taxable meal allowance carved out of gross pay.
    pub meal_allowance: Decimal,
    /// Income the deductions are calculated on.
    pub taxable_income: Decimal,
    /// The six deduction lines.
    pub deductions: DeductionLines,
    /// Sum of the deduction lines.
    pub total_deductions: Decimal,
    /// Gross pay minus deductions.
    pub net_pay: Decimal,
    /// Employer reimbursement of deductions for salaried staff.
    pub tax_support_bonus: Decimal,
    /// Net pay plus the tax support bonus.
    pub final_pay: Decimal,
    /// Base pay breakdown rows.
    pub work_breakdown: Vec<WorkBreakdownEntry>,
    /// Weekly holiday allowance explanations, in chronological order.
    pub weekly_holiday_details: Vec<WeeklyHolidayDetail>,
    /// A note replacing the weekly details when no allowance is computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday_note: Option<String>,
    /// Conditions recovered from during calculation.
    #[serde(default)]
    pub warnings: Vec<CalculationWarning>,
}
