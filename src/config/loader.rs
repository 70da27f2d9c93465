//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll rate
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{IncomeTaxTable, InsuranceRateTable, PayrollConfig, PayrollSettings};

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/kr_payroll/
/// ├── payroll.yaml     # Meal allowance, weekly holiday, withholding, window
/// ├── income_tax.yaml  # Progressive brackets, dependents, child credits
/// └── rates/
///     ├── 2025.yaml    # Insurance tier effective from 2025 (and earlier)
///     └── 2026.yaml    # Insurance tier effective from 2026
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/kr_payroll")?;
/// for tier in loader.config().insurance_tiers() {
///     println!("{}: pension {}", tier.effective_year, tier.national_pension.rate);
/// }
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing, contains invalid
    /// YAML, or fails validation (unordered brackets, duplicate tiers).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<PayrollSettings>(&path.join("payroll.yaml"))?;

        let income_tax_path = path.join("income_tax.yaml");
        let income_tax = Self::load_yaml::<IncomeTaxTable>(&income_tax_path)?;
        Self::validate_income_tax(&income_tax, &income_tax_path)?;

        let insurance = Self::load_rates(&path.join("rates"))?;

        Ok(Self {
            config: PayrollConfig::new(settings, income_tax, insurance),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every insurance tier from the rates directory.
    fn load_rates(rates_dir: &Path) -> EngineResult<Vec<InsuranceRateTable>> {
        let rates_dir_str = rates_dir.display().to_string();

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut tiers: Vec<InsuranceRateTable> = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let tier = Self::load_yaml::<InsuranceRateTable>(&path)?;
                if tiers.iter().any(|t| t.effective_year == tier.effective_year) {
                    return Err(EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message: format!(
                            "duplicate insurance tier for year {}",
                            tier.effective_year
                        ),
                    });
                }
                tiers.push(tier);
            }
        }

        if tiers.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(tiers)
    }

    /// Brackets must be contiguous, ascending, and end with an open top bracket.
    fn validate_income_tax(table: &IncomeTaxTable, path: &Path) -> EngineResult<()> {
        let fail = |message: String| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message,
        };

        let first = table
            .brackets
            .first()
            .ok_or_else(|| fail("at least one bracket is required".to_string()))?;
        if first.lower != table.exempt_below {
            return Err(fail(format!(
                "first bracket starts at {} but exempt_below is {}",
                first.lower, table.exempt_below
            )));
        }

        for pair in table.brackets.windows(2) {
            match pair[0].upper {
                Some(upper) if upper == pair[1].lower => {}
                _ => {
                    return Err(fail(format!(
                        "bracket starting at {} does not end where the next one starts ({})",
                        pair[0].lower, pair[1].lower
                    )));
                }
            }
        }

        if table.brackets.last().is_some_and(|b| b.upper.is_some()) {
            return Err(fail("the top bracket must not have an upper bound".to_string()));
        }

        Ok(())
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the general payroll settings.
    pub fn settings(&self) -> &PayrollSettings {
        self.config.settings()
    }
}
