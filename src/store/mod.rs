//! Data the engine consumes and the payroll results it produces.
//!
//! Staff profiles, attendance and company holidays are owned by other
//! subsystems; the engine reads them through the traits here. Results are
//! written through [`PayrollRepository`], keyed uniquely by staff and month.
//! The [`memory`] module provides thread-safe in-memory implementations used
//! by the HTTP server and the tests.

pub mod memory;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, CompanyHoliday, PayMonth, PayrollResult, StaffProfile, TransferStatus,
};

pub use memory::{
    InMemoryAttendanceSource, InMemoryHolidayCalendar, InMemoryPayrollRepository,
    InMemoryStaffDirectory,
};

/// Staff profile lookup.
pub trait StaffDirectory: Send + Sync {
    /// Returns the profile for `staff_id`, or `None` if unknown.
    fn find_staff(&self, staff_id: &str) -> EngineResult<Option<StaffProfile>>;
}

/// Attendance range queries.
pub trait AttendanceSource: Send + Sync {
    /// Returns the records for a staff member with `from <= date <= to`.
    fn attendance_between(
        &self,
        staff_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>>;
}

/// Company holiday range queries.
pub trait HolidayCalendar: Send + Sync {
    /// Returns the closure dates with `from <= date <= to`.
    fn holidays_between(&self, from: NaiveDate, to: NaiveDate) -> EngineResult<Vec<CompanyHoliday>>;
}

/// A persisted payroll result with its externally managed transfer status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPayroll {
    /// The calculated result.
    pub result: PayrollResult,
    /// Set by the transfer subsystem.
    pub transfer_status: TransferStatus,
}

/// Storage for payroll results. At most one result exists per staff and month.
pub trait PayrollRepository: Send + Sync {
    /// Inserts or replaces the result for its staff and month.
    ///
    /// A replaced entry keeps its transfer status.
    fn upsert(&self, result: PayrollResult) -> EngineResult<StoredPayroll>;

    /// Returns the stored result for a staff member and month.
    fn get(&self, staff_id: &str, month: PayMonth) -> EngineResult<Option<StoredPayroll>>;

    /// Updates the transfer status of an existing result.
    ///
    /// Fails with [`EngineError::PayrollNotFound`](crate::error::EngineError::PayrollNotFound)
    /// if nothing is stored for the key.
    fn set_transfer_status(
        &self,
        staff_id: &str,
        month: PayMonth,
        status: TransferStatus,
    ) -> EngineResult<StoredPayroll>;

    /// Returns every result stored for a month, ordered by staff id.
    fn list_month(&self, month: PayMonth) -> EngineResult<Vec<StoredPayroll>>;
}
