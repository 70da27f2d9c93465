//! Income tax withholding.
//!
//! The full path applies the progressive bracket table with dependents and
//! child adjustments. The simplified path withholds a flat percentage for
//! staff outside statutory insurance.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{ChildCredits, IncomeTaxTable, SimplifiedWithholdingConfig};

use super::rounding::floor_to_ten;

/// Income tax and local surtax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeTaxResult {
    /// Tax from the bracket formula before adjustments.
    pub bracket_tax: Decimal,
    /// Credit subtracted for children.
    pub child_credit: Decimal,
    /// Income tax withheld.
    pub income_tax: Decimal,
    /// Local income surtax withheld.
    pub local_income_tax: Decimal,
}

/// Bracket formula `base_tax + (income - lower) * rate`; zero below the
/// exemption threshold.
pub fn bracket_tax(table: &IncomeTaxTable, taxable_income: Decimal) -> Decimal {
    match table.bracket_for(taxable_income) {
        Some(bracket) => bracket.base_tax + (taxable_income - bracket.lower) * bracket.rate,
        None => Decimal::ZERO,
    }
}

/// Flat credit for the number of eligible children.
pub fn child_credit(credits: &ChildCredits, children_count: u32) -> Decimal {
    match children_count {
        0 => Decimal::ZERO,
        1 => credits.one_child,
        2 => credits.two_children,
        n => credits.two_children + Decimal::from(n - 2) * credits.each_additional,
    }
}

/// Calculates income tax and local surtax on a month's taxable income.
///
/// # Arguments
///
/// * `taxable_income` - Gross pay minus the non-taxable meal allowance
/// * `dependents_count` - Dependents including the staff member (at least 1)
/// * `children_count` - Children eligible for the child credit
/// * `table` - The withholding table
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_income_tax;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/kr_payroll").unwrap();
/// let result = calculate_income_tax(Decimal::new(3_300_000, 0), 1, 0, loader.config().income_tax());
///
/// // 108320 + 300000 * 0.084
/// assert_eq!(result.income_tax, Decimal::new(133_520, 0));
/// assert_eq!(result.local_income_tax, Decimal::new(13_350, 0));
/// ```
pub fn calculate_income_tax(
    taxable_income: Decimal,
    dependents_count: u32,
    children_count: u32,
    table: &IncomeTaxTable,
) -> IncomeTaxResult {
    let bracket_tax = bracket_tax(table, taxable_income);

    let mut tax = bracket_tax;
    if dependents_count >= 2 {
        let reduction = (Decimal::from(dependents_count - 1) * table.dependents.per_dependent)
            .min(table.dependents.max_reduction);
        tax *= Decimal::ONE - reduction;
    }

    let child_credit = child_credit(&table.child_credits, children_count);
    tax -= child_credit;

    let income_tax = floor_to_ten(tax.max(Decimal::ZERO));
    let local_income_tax = floor_to_ten(income_tax * table.local_tax_rate);

    debug!(
        taxable_income = %taxable_income,
        dependents_count,
        children_count,
        income_tax = %income_tax,
        "Calculated income tax"
    );

    IncomeTaxResult {
        bracket_tax,
        child_credit,
        income_tax,
        local_income_tax,
    }
}

/// Flat withholding on gross pay for staff outside statutory insurance.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_simplified_withholding;
/// use payroll_engine::config::SimplifiedWithholdingConfig;
/// use rust_decimal::Decimal;
///
/// let config = SimplifiedWithholdingConfig {
///     income_tax_rate: Decimal::new(3, 2),
///     local_tax_rate: Decimal::new(1, 1),
/// };
/// let result = calculate_simplified_withholding(Decimal::new(360_000, 0), &config);
/// assert_eq!(result.income_tax, Decimal::new(10_800, 0));
/// assert_eq!(result.local_income_tax, Decimal::new(1_080, 0));
/// ```
pub fn calculate_simplified_withholding(
    gross_pay: Decimal,
    config: &SimplifiedWithholdingConfig,
) -> IncomeTaxResult {
    let income_tax = floor_to_ten(gross_pay * config.income_tax_rate);
    let local_income_tax = floor_to_ten(income_tax * config.local_tax_rate);

    IncomeTaxResult {
        bracket_tax: Decimal::ZERO,
        child_credit: Decimal::ZERO,
        income_tax,
        local_income_tax,
    }
}
