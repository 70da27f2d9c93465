//! Deduction assembly.
//!
//! Picks the statutory or simplified path for a staff member and combines
//! the insurance and income tax lines into [`DeductionLines`].

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::{CalculationWarning, DeductionLines, StaffProfile};

use super::income_tax::{calculate_income_tax, calculate_simplified_withholding};
use super::insurance::{calculate_insurance, insurance_base, select_rate_table};

/// The result of the deduction calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductionResult {
    /// The six deduction lines.
    pub lines: DeductionLines,
    /// Whether the statutory path was used.
    pub statutory: bool,
    /// Effective year of the insurance tier applied, if any.
    pub tier_year: Option<i32>,
    /// Recovered conditions.
    pub warnings: Vec<CalculationWarning>,
}

/// Calculates all deduction lines for a month.
///
/// Salaried staff and hourly staff enrolled in the four insurances take the
/// statutory path: insurance on [`insurance_base`] and bracket income tax on
/// `taxable_income`. Everyone else takes the simplified path: no insurance
/// and a flat withholding on `gross_pay`.
///
/// # Errors
///
/// Returns an error only if no insurance tier is configured.
pub fn calculate_deductions(
    staff: &StaffProfile,
    gross_pay: Decimal,
    taxable_income: Decimal,
    rate_year: i32,
    config: &PayrollConfig,
) -> EngineResult<DeductionResult> {
    if !staff.has_statutory_insurance() {
        let tax =
            calculate_simplified_withholding(gross_pay, &config.settings().simplified_withholding);
        debug!(staff_id = %staff.id, income_tax = %tax.income_tax, "Applied simplified withholding");
        return Ok(DeductionResult {
            lines: DeductionLines {
                income_tax: tax.income_tax,
                local_income_tax: tax.local_income_tax,
                ..DeductionLines::default()
            },
            statutory: false,
            tier_year: None,
            warnings: Vec::new(),
        });
    }

    let selection = select_rate_table(config.insurance_tiers(), rate_year)?;
    let insurance = calculate_insurance(insurance_base(staff, taxable_income), selection.table);
    let tax = calculate_income_tax(
        taxable_income,
        staff.dependents_count,
        staff.children_count,
        config.income_tax(),
    );

    Ok(DeductionResult {
        lines: DeductionLines {
            national_pension: insurance.national_pension,
            health_insurance: insurance.health_insurance,
            long_term_care: insurance.long_term_care,
            employment_insurance: insurance.employment_insurance,
            income_tax: tax.income_tax,
            local_income_tax: tax.local_income_tax,
        },
        statutory: true,
        tier_year: Some(selection.table.effective_year),
        warnings: selection.warning.into_iter().collect(),
    })
}
