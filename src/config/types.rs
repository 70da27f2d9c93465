//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. All rates are plain
//! fractions (`0.045` means 4.5%).

use rust_decimal::Decimal;
use serde::Deserialize;

/// Weekly holiday allowance parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct WeeklyHolidayConfig {
    /// Minimum effective hours in a week to qualify.
    pub min_weekly_hours: Decimal,
    /// Nominal working days the weekly hours are averaged over.
    pub nominal_work_days: Decimal,
}

/// Flat withholding applied to staff outside statutory insurance.
#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedWithholdingConfig {
    /// Income tax as a fraction of gross pay.
    pub income_tax_rate: Decimal,
    /// Local surtax as a fraction of the income tax.
    pub local_tax_rate: Decimal,
}

/// How far around the 1st of the month attendance must be fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceWindowConfig {
    /// Days before the 1st of the month.
    pub days_before: u64,
    /// Days after the 1st of the month.
    pub days_after: u64,
}

/// General payroll settings from `payroll.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollSettings {
    /// Maximum non-taxable meal allowance per month for salaried staff.
    pub meal_allowance_cap: Decimal,
    /// Weekly holiday allowance parameters.
    pub weekly_holiday: WeeklyHolidayConfig,
    /// Simplified withholding rates.
    pub simplified_withholding: SimplifiedWithholdingConfig,
    /// Retirement accrual as a fraction of the monthly labor expense.
    pub retirement_accrual_rate: Decimal,
    /// Attendance fetch window.
    pub attendance_window: AttendanceWindowConfig,
}

/// A contribution rate applied to a base clamped into `[min_base, max_base]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClampedRate {
    /// Employee contribution rate.
    pub rate: Decimal,
    /// Lower bound of the contribution base.
    pub min_base: Decimal,
    /// Upper bound of the contribution base.
    pub max_base: Decimal,
}

impl ClampedRate {
    /// Clamps a contribution base into the configured bounds.
    pub fn clamp_base(&self, base: Decimal) -> Decimal {
        base.max(self.min_base).min(self.max_base)
    }
}

/// Social insurance rates effective from a given year (one `rates/*.yaml` file).
#[derive(Debug, Clone, Deserialize)]
pub struct InsuranceRateTable {
    /// First year the tier applies to.
    pub effective_year: i32,
    /// National pension.
    pub national_pension: ClampedRate,
    /// Health insurance.
    pub health_insurance: ClampedRate,
    /// Long-term care, as a fraction of the health insurance amount.
    pub long_term_care_rate: Decimal,
    /// Employment insurance.
    pub employment_insurance_rate: Decimal,
}

/// One progressive income tax bracket: `base_tax + (x - lower) * rate`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBracket {
    /// Income the bracket starts at.
    pub lower: Decimal,
    /// Inclusive upper bound; `None` for the top bracket.
    #[serde(default)]
    pub upper: Option<Decimal>,
    /// Tax accumulated by the lower brackets.
    pub base_tax: Decimal,
    /// Marginal rate inside the bracket.
    pub rate: Decimal,
}

/// Reduction of the base tax for additional dependents.
#[derive(Debug, Clone, Deserialize)]
pub struct DependentsReduction {
    /// Reduction per dependent beyond the first.
    pub per_dependent: Decimal,
    /// Cap on the total reduction.
    pub max_reduction: Decimal,
}

/// Flat child tax credits.
#[derive(Debug, Clone, Deserialize)]
pub struct ChildCredits {
    /// Credit for exactly one child.
    pub one_child: Decimal,
    /// Credit for exactly two children.
    pub two_children: Decimal,
    /// Added per child beyond the second.
    pub each_additional: Decimal,
}

/// Income tax withholding table from `income_tax.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomeTaxTable {
    /// Monthly income below which no tax is withheld.
    pub exempt_below: Decimal,
    /// Brackets ordered by `lower`.
    pub brackets: Vec<TaxBracket>,
    /// Dependents reduction.
    pub dependents: DependentsReduction,
    /// Child credits.
    pub child_credits: ChildCredits,
    /// Local surtax as a fraction of the income tax.
    pub local_tax_rate: Decimal,
}

impl IncomeTaxTable {
    /// Finds the bracket containing the given income.
    pub fn bracket_for(&self, income: Decimal) -> Option<&TaxBracket> {
        self.brackets
            .iter()
            .find(|b| income >= b.lower && b.upper.is_none_or(|upper| income <= upper))
    }
}

/// The complete payroll configuration loaded from YAML files.
///
/// Immutable once built; shared read-only by every calculation.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    settings: PayrollSettings,
    income_tax: IncomeTaxTable,
    /// Insurance tiers sorted oldest first.
    insurance: Vec<InsuranceRateTable>,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(
        settings: PayrollSettings,
        income_tax: IncomeTaxTable,
        insurance: Vec<InsuranceRateTable>,
    ) -> Self {
        let mut sorted = insurance;
        sorted.sort_by_key(|t| t.effective_year);
        Self {
            settings,
            income_tax,
            insurance: sorted,
        }
    }

    /// Returns the general payroll settings.
    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }

    /// Returns the income tax table.
    pub fn income_tax(&self) -> &IncomeTaxTable {
        &self.income_tax
    }

    /// Returns all insurance tiers, oldest first.
    pub fn insurance_tiers(&self) -> &[InsuranceRateTable] {
        &self.insurance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::test_config;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_tiers_are_sorted_oldest_first() {
        let config = test_config();
        let years: Vec<i32> = config
            .insurance_tiers()
            .iter()
            .map(|t| t.effective_year)
            .collect();
        assert_eq!(years, vec![2025, 2026]);
    }

    #[test]
    fn test_clamp_base() {
        let rate = ClampedRate {
            rate: dec("0.045"),
            min_base: dec("400000"),
            max_base: dec("6370000"),
        };
        assert_eq!(rate.clamp_base(dec("100000")), dec("400000"));
        assert_eq!(rate.clamp_base(dec("3000000")), dec("3000000"));
        assert_eq!(rate.clamp_base(dec("9000000")), dec("6370000"));
    }

    #[test]
    fn test_bracket_for_boundaries() {
        let config = test_config();
        let table = config.income_tax();

        assert!(table.bracket_for(dec("1000000")).is_none());
        assert_eq!(table.bracket_for(dec("1500000")).unwrap().lower, dec("1060000"));
        assert_eq!(table.bracket_for(dec("1500001")).unwrap().lower, dec("1500000"));
        assert_eq!(
            table.bracket_for(dec("25000000")).unwrap().lower,
            dec("10000000")
        );
    }
}
