//! Social insurance contributions.
//!
//! National pension, health insurance, long-term care and employment
//! insurance, calculated from a year-keyed rate tier.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::InsuranceRateTable;
use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationWarning, StaffProfile};

use super::rounding::{floor_to_ten, truncate_won};

/// Warning code for a rate year past the latest configured tier.
pub const RATE_YEAR_FALLBACK_WARNING: &str = "RATE_YEAR_FALLBACK";

/// The tier chosen for a year.
#[derive(Debug, Clone)]
pub struct RateSelection<'a> {
    /// The tier to apply.
    pub table: &'a InsuranceRateTable,
    /// Set when the year is newer than every configured tier.
    pub warning: Option<CalculationWarning>,
}

/// Selects the insurance rate tier for a year.
///
/// Returns the latest tier whose `effective_year` is not after `year`. The
/// earliest tier also covers every year before it. A year newer than the
/// latest tier uses that tier and carries a [`RATE_YEAR_FALLBACK_WARNING`].
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if `tiers` is empty.
pub fn select_rate_table(tiers: &[InsuranceRateTable], year: i32) -> EngineResult<RateSelection<'_>> {
    let latest = tiers.last().ok_or_else(|| EngineError::CalculationError {
        message: "No insurance rate tiers configured".to_string(),
    })?;

    if year > latest.effective_year {
        warn!(
            year,
            fallback_year = latest.effective_year,
            "No insurance rates for year, using latest known tier"
        );
        return Ok(RateSelection {
            table: latest,
            warning: Some(CalculationWarning::new(
                RATE_YEAR_FALLBACK_WARNING,
                format!(
                    "No insurance rates configured for {}; the {} rates were applied",
                    year, latest.effective_year
                ),
            )),
        });
    }

    let table = tiers
        .iter()
        .rev()
        .find(|t| t.effective_year <= year)
        .unwrap_or(&tiers[0]);

    Ok(RateSelection {
        table,
        warning: None,
    })
}

/// The contribution base: the reported standard income when set, otherwise
/// the taxable income of the month.
pub fn insurance_base(staff: &StaffProfile, taxable_income: Decimal) -> Decimal {
    if staff.insurance_base_salary > Decimal::ZERO {
        staff.insurance_base_salary
    } else {
        taxable_income
    }
}

/// The four insurance lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsuranceResult {
    /// The unclamped contribution base.
    pub base: Decimal,
    /// National pension, truncated to whole won.
    pub national_pension: Decimal,
    /// Health insurance, floored to 10 won.
    pub health_insurance: Decimal,
    /// Long-term care, floored to 10 won.
    pub long_term_care: Decimal,
    /// Employment insurance, floored to 10 won.
    pub employment_insurance: Decimal,
}

/// Calculates the insurance contributions for a base.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_insurance;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/kr_payroll").unwrap();
/// let tier_2025 = &loader.config().insurance_tiers()[0];
///
/// let result = calculate_insurance(Decimal::new(3_000_000, 0), tier_2025);
/// assert_eq!(result.national_pension, Decimal::new(135_000, 0));
/// assert_eq!(result.health_insurance, Decimal::new(106_350, 0));
/// ```
pub fn calculate_insurance(base: Decimal, table: &InsuranceRateTable) -> InsuranceResult {
    let pension_base = table.national_pension.clamp_base(base);
    let national_pension = truncate_won(pension_base * table.national_pension.rate);

    let health_base = table.health_insurance.clamp_base(base);
    let health_insurance = floor_to_ten(health_base * table.health_insurance.rate);

    let long_term_care = floor_to_ten(health_insurance * table.long_term_care_rate);
    let employment_insurance = floor_to_ten(base * table.employment_insurance_rate);

    debug!(
        base = %base,
        effective_year = table.effective_year,
        national_pension = %national_pension,
        health_insurance = %health_insurance,
        long_term_care = %long_term_care,
        employment_insurance = %employment_insurance,
        "Calculated insurance contributions"
    );

    InsuranceResult {
        base,
        national_pension,
        health_insurance,
        long_term_care,
        employment_insurance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::test_config;
    use crate::models::ContractType;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_staff(insurance_base_salary: &str) -> StaffProfile {
        StaffProfile {
            id: "staff_001".to_string(),
            name: "Jung".to_string(),
            contract_type: ContractType::Salaried,
            hourly_wage: Decimal::ZERO,
            monthly_salary: dec("3000000"),
            insurance_4_major: true,
            insurance_base_salary: dec(insurance_base_salary),
            dependents_count: 1,
            children_count: 0,
        }
    }

    #[test]
    fn test_select_exact_year() {
        let config = test_config();
        let selection = select_rate_table(config.insurance_tiers(), 2025).unwrap();
        assert_eq!(selection.table.effective_year, 2025);
        assert!(selection.warning.is_none());

        let selection = select_rate_table(config.insurance_tiers(), 2026).unwrap();
        assert_eq!(selection.table.effective_year, 2026);
        assert!(selection.warning.is_none());
    }

    #[test]
    fn test_earlier_years_use_earliest_tier() {
        let config = test_config();
        let selection = select_rate_table(config.insurance_tiers(), 2019).unwrap();
        assert_eq!(selection.table.effective_year, 2025);
        assert!(selection.warning.is_none());
    }

    #[test]
    fn test_future_year_falls_back_with_warning() {
        let config = test_config();
        let selection = select_rate_table(config.insurance_tiers(), 2031).unwrap();
        assert_eq!(selection.table.effective_year, 2026);
        let warning = selection.warning.unwrap();
        assert_eq!(warning.code, RATE_YEAR_FALLBACK_WARNING);
        assert!(warning.message.contains("2031"));
    }

    #[test]
    fn test_no_tiers_is_an_error() {
        let result = select_rate_table(&[], 2026);
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_insurance_base_fallback() {
        assert_eq!(insurance_base(&create_test_staff("0"), dec("3300000")), dec("3300000"));
        assert_eq!(
            insurance_base(&create_test_staff("2800000"), dec("3300000")),
            dec("2800000")
        );
    }

    #[test]
    fn test_insurance_2025_rates() {
        let config = test_config();
        let table = select_rate_table(config.insurance_tiers(), 2025).unwrap().table;

        let result = calculate_insurance(dec("3000000"), table);

        assert_eq!(result.national_pension, dec("135000"));
        assert_eq!(result.health_insurance, dec("106350"));
        // 106350 * 0.1291 = 13729.785
        assert_eq!(result.long_term_care, dec("13720"));
        assert_eq!(result.employment_insurance, dec("27000"));
    }

    #[test]
    fn test_insurance_2026_rates() {
        let config = test_config();
        let table = select_rate_table(config.insurance_tiers(), 2026).unwrap().table;

        let result = calculate_insurance(dec("3000000"), table);

        assert_eq!(result.national_pension, dec("142500"));
        assert_eq!(result.health_insurance, dec("107850"));
        // 107850 * 0.1281 = 13815.585
        assert_eq!(result.long_term_care, dec("13810"));
        assert_eq!(result.employment_insurance, dec("27000"));
    }

    #[test]
    fn test_pension_base_is_clamped() {
        let config = test_config();
        let table = select_rate_table(config.insurance_tiers(), 2026).unwrap().table;

        let low = calculate_insurance(dec("300000"), table);
        // 400000 * 0.0475
        assert_eq!(low.national_pension, dec("19000"));
        // 300000 * 0.03595 = 10785
        assert_eq!(low.health_insurance, dec("10780"));
        assert_eq!(low.employment_insurance, dec("2700"));

        let high = calculate_insurance(dec("8000000"), table);
        // 6370000 * 0.0475 = 302575
        assert_eq!(high.national_pension, dec("302575"));
        // employment insurance has no cap
        assert_eq!(high.employment_insurance, dec("72000"));
    }
}
