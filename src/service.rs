//! Payroll service.
//!
//! Glues the pure calculation pipeline to its collaborators: looks up the
//! staff profile, fetches the attendance window and company holidays,
//! calculates, and upserts the result. Also produces the monthly labor
//! expense summary read by profit and loss reporting.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculation::{calculate_payroll, truncate_won};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, CalculationWarning, CompanyHoliday, PayMonth, StaffProfile, TransferStatus,
};
use crate::store::{
    AttendanceSource, HolidayCalendar, PayrollRepository, StaffDirectory, StoredPayroll,
};

/// Labor cost totals for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborExpenseSummary {
    /// The month summarized.
    pub month: PayMonth,
    /// Number of staff with a stored result.
    pub staff_count: usize,
    /// Sum of final pay over all stored results.
    pub labor_expense: Decimal,
    /// Retirement accrual on the labor expense, truncated to whole won.
    pub retirement_accrual: Decimal,
}

/// Summarizes stored results for a month.
///
/// # Example
///
/// ```
/// use payroll_engine::service::labor_expense_summary;
/// use rust_decimal::Decimal;
///
/// let summary = labor_expense_summary("2026-03".parse().unwrap(), &[], Decimal::new(1, 1));
/// assert_eq!(summary.staff_count, 0);
/// assert_eq!(summary.labor_expense, Decimal::ZERO);
/// ```
pub fn labor_expense_summary(
    month: PayMonth,
    results: &[StoredPayroll],
    retirement_accrual_rate: Decimal,
) -> LaborExpenseSummary {
    let labor_expense: Decimal = results.iter().map(|s| s.result.final_pay).sum();
    LaborExpenseSummary {
        month,
        staff_count: results.len(),
        labor_expense,
        retirement_accrual: truncate_won(labor_expense * retirement_accrual_rate),
    }
}

/// Runs payroll calculations against the configured collaborators.
#[derive(Clone)]
pub struct PayrollService {
    config: Arc<ConfigLoader>,
    staff: Arc<dyn StaffDirectory>,
    attendance: Arc<dyn AttendanceSource>,
    holidays: Arc<dyn HolidayCalendar>,
    payrolls: Arc<dyn PayrollRepository>,
}

impl PayrollService {
    /// Creates a service over the given configuration and stores.
    pub fn new(
        config: Arc<ConfigLoader>,
        staff: Arc<dyn StaffDirectory>,
        attendance: Arc<dyn AttendanceSource>,
        holidays: Arc<dyn HolidayCalendar>,
        payrolls: Arc<dyn PayrollRepository>,
    ) -> Self {
        Self {
            config,
            staff,
            attendance,
            holidays,
            payrolls,
        }
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Calculates and stores the payroll for a staff member held in the directory.
    ///
    /// The attendance and holiday window comes from the configured
    /// `attendance_window`. `rate_year` defaults to the month's year.
    ///
    /// # Errors
    ///
    /// * [`EngineError::StaffNotFound`] if the directory has no such staff member
    /// * [`EngineError::NoAttendanceData`] if the window holds no attendance
    pub fn calculate_for_staff(
        &self,
        staff_id: &str,
        month: PayMonth,
        rate_year: Option<i32>,
    ) -> EngineResult<StoredPayroll> {
        let staff = self
            .staff
            .find_staff(staff_id)?
            .ok_or_else(|| EngineError::StaffNotFound {
                staff_id: staff_id.to_string(),
            })?;

        let window = &self.config.settings().attendance_window;
        let (from, to) = month.attendance_window(window.days_before, window.days_after);
        let records = self.attendance.attendance_between(staff_id, from, to)?;
        let holidays = self.holidays.holidays_between(from, to)?;

        info!(
            staff_id,
            month = %month,
            from = %from,
            to = %to,
            records = records.len(),
            holidays = holidays.len(),
            "Fetched attendance window"
        );

        self.calculate_with(&staff, &records, &holidays, month, rate_year)
    }

    /// Calculates and stores the payroll from inputs supplied by the caller.
    pub fn calculate_with(
        &self,
        staff: &StaffProfile,
        records: &[AttendanceRecord],
        holidays: &[CompanyHoliday],
        month: PayMonth,
        rate_year: Option<i32>,
    ) -> EngineResult<StoredPayroll> {
        self.calculate_with_warnings(staff, records, holidays, month, rate_year, Vec::new())
    }

    /// Like [`calculate_with`](Self::calculate_with), with warnings raised
    /// while reading the inputs placed ahead of the calculation's own.
    pub fn calculate_with_warnings(
        &self,
        staff: &StaffProfile,
        records: &[AttendanceRecord],
        holidays: &[CompanyHoliday],
        month: PayMonth,
        rate_year: Option<i32>,
        input_warnings: Vec<CalculationWarning>,
    ) -> EngineResult<StoredPayroll> {
        let rate_year = rate_year.unwrap_or_else(|| month.year());
        let mut result = calculate_payroll(
            staff,
            records,
            holidays,
            month,
            rate_year,
            self.config.config(),
        )?;
        if !input_warnings.is_empty() {
            let computed = std::mem::replace(&mut result.warnings, input_warnings);
            result.warnings.extend(computed);
        }
        self.payrolls.upsert(result)
    }

    /// Returns the stored payroll for a staff member and month.
    pub fn payroll(&self, staff_id: &str, month: PayMonth) -> EngineResult<StoredPayroll> {
        self.payrolls
            .get(staff_id, month)?
            .ok_or_else(|| EngineError::PayrollNotFound {
                staff_id: staff_id.to_string(),
                month: month.to_string(),
            })
    }

    /// Records the outcome of a bank transfer.
    pub fn set_transfer_status(
        &self,
        staff_id: &str,
        month: PayMonth,
        status: TransferStatus,
    ) -> EngineResult<StoredPayroll> {
        let stored = self.payrolls.set_transfer_status(staff_id, month, status)?;
        if status == TransferStatus::Failed {
            warn!(staff_id, month = %month, "Transfer marked as failed");
        }
        Ok(stored)
    }

    /// Summarizes every stored result for a month.
    pub fn labor_expense(&self, month: PayMonth) -> EngineResult<LaborExpenseSummary> {
        let results = self.payrolls.list_month(month)?;
        Ok(labor_expense_summary(
            month,
            &results,
            self.config.settings().retirement_accrual_rate,
        ))
    }
}
