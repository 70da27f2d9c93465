//! Configuration loading and management for the payroll engine.
//!
//! Rate tables (insurance tiers per year, income tax brackets, general
//! payroll settings) are loaded from YAML files once at startup and shared
//! read-only. Server settings come from the environment.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/kr_payroll").unwrap();
//! println!("Meal allowance cap: {}", loader.settings().meal_allowance_cap);
//! ```

mod loader;
mod settings;
mod types;

pub use loader::ConfigLoader;
pub use settings::ServerSettings;
pub use types::{
    AttendanceWindowConfig, ChildCredits, ClampedRate, DependentsReduction, IncomeTaxTable,
    InsuranceRateTable, PayrollConfig, PayrollSettings, SimplifiedWithholdingConfig, TaxBracket,
    WeeklyHolidayConfig,
};
