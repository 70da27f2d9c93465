//! Staff profile model and related types.
//!
//! Staff profiles are owned by the HR subsystem; the engine only reads them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The contract a staff member is paid under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Fixed monthly salary. The weekly holiday allowance is already included in it.
    Salaried,
    /// Paid per hour worked, plus weekly holiday allowance.
    Hourly,
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractType::Salaried => write!(f, "salaried"),
            ContractType::Hourly => write!(f, "hourly"),
        }
    }
}

fn default_dependents() -> u32 {
    1
}

/// Represents a staff member's payroll configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffProfile {
    /// Unique identifier for the staff member.
    pub id: String,
    /// Display name, used only in breakdown labels and logs.
    #[serde(default)]
    pub name: String,
    /// The contract type.
    pub contract_type: ContractType,
    /// Hourly wage in whole currency units.
    #[serde(default)]
    pub hourly_wage: Decimal,
    /// Fixed monthly salary in whole currency units.
    #[serde(default)]
    pub monthly_salary: Decimal,
    /// Whether the staff member is enrolled in the four statutory insurances.
    #[serde(default)]
    pub insurance_4_major: bool,
    /// Reported monthly standard income. Zero means "use the computed income".
    #[serde(default)]
    pub insurance_base_salary: Decimal,
    /// Number of dependents for withholding, including the staff member.
    #[serde(default = "default_dependents")]
    pub dependents_count: u32,
    /// Number of children aged 8 to 20 eligible for the child credit.
    #[serde(default)]
    pub children_count: u32,
}

impl StaffProfile {
    /// Returns true if the staff member is on a fixed monthly salary.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{ContractType, StaffProfile};
    /// use rust_decimal::Decimal;
    ///
    /// let staff = StaffProfile {
    ///     id: "staff_001".to_string(),
    ///     name: "Kim".to_string(),
    ///     contract_type: ContractType::Salaried,
    ///     hourly_wage: Decimal::ZERO,
    ///     monthly_salary: Decimal::new(3_500_000, 0),
    ///     insurance_4_major: true,
    ///     insurance_base_salary: Decimal::ZERO,
    ///     dependents_count: 1,
    ///     children_count: 0,
    /// };
    /// assert!(staff.is_salaried());
    /// ```
    pub fn is_salaried(&self) -> bool {
        self.contract_type == ContractType::Salaried
    }

    /// Returns true if the full statutory deduction path applies.
    ///
    /// Salaried staff are always enrolled; hourly staff only when flagged.
    pub fn has_statutory_insurance(&self) -> bool {
        self.is_salaried() || self.insurance_4_major
    }

    /// Checks the invariants the calculation relies on.
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::InvalidStaffProfile {
                field: "id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.dependents_count < 1 {
            return Err(EngineError::InvalidStaffProfile {
                field: "dependents_count".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        for (field, value) in [
            ("hourly_wage", self.hourly_wage),
            ("monthly_salary", self.monthly_salary),
            ("insurance_base_salary", self.insurance_base_salary),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(EngineError::InvalidStaffProfile {
                    field: field.to_string(),
                    message: format!("must not be negative, got {}", value),
                });
            }
        }
        Ok(())
    }
}
