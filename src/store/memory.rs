//! In-memory store implementations.
//!
//! Each store is a cheap-to-clone handle around an `Arc<RwLock<BTreeMap>>`,
//! so clones share data and writers are serialized by the lock.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, CompanyHoliday, PayMonth, PayrollResult, StaffProfile, TransferStatus,
};

use super::{AttendanceSource, HolidayCalendar, PayrollRepository, StaffDirectory, StoredPayroll};

// Every critical section is a single map operation, so a poisoned lock still
// guards a consistent map.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Staff profiles keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStaffDirectory {
    staff: Arc<RwLock<BTreeMap<String, StaffProfile>>>,
}

impl InMemoryStaffDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a profile.
    pub fn insert(&self, staff: StaffProfile) {
        write(&self.staff).insert(staff.id.clone(), staff);
    }
}

impl StaffDirectory for InMemoryStaffDirectory {
    fn find_staff(&self, staff_id: &str) -> EngineResult<Option<StaffProfile>> {
        Ok(read(&self.staff).get(staff_id).cloned())
    }
}

/// Attendance records keyed by staff id and date.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAttendanceSource {
    records: Arc<RwLock<BTreeMap<(String, NaiveDate), AttendanceRecord>>>,
}

impl InMemoryAttendanceSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the record for a staff member on its date.
    pub fn insert(&self, staff_id: &str, record: AttendanceRecord) {
        write(&self.records).insert((staff_id.to_string(), record.date), record);
    }
}

impl AttendanceSource for InMemoryAttendanceSource {
    fn attendance_between(
        &self,
        staff_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        if from > to {
            return Ok(Vec::new());
        }
        let records = read(&self.records);
        Ok(records
            .range((staff_id.to_string(), from)..=(staff_id.to_string(), to))
            .map(|(_, record)| record.clone())
            .collect())
    }
}

/// Company closure dates.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHolidayCalendar {
    holidays: Arc<RwLock<BTreeMap<NaiveDate, CompanyHoliday>>>,
}

impl InMemoryHolidayCalendar {
    /// Creates an empty calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a closure date.
    pub fn insert(&self, holiday: CompanyHoliday) {
        write(&self.holidays).insert(holiday.date, holiday);
    }
}

impl HolidayCalendar for InMemoryHolidayCalendar {
    fn holidays_between(&self, from: NaiveDate, to: NaiveDate) -> EngineResult<Vec<CompanyHoliday>> {
        if from > to {
            return Ok(Vec::new());
        }
        Ok(read(&self.holidays)
            .range(from..=to)
            .map(|(_, holiday)| holiday.clone())
            .collect())
    }
}

/// Payroll results keyed by month and staff id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPayrollRepository {
    results: Arc<RwLock<BTreeMap<(PayMonth, String), StoredPayroll>>>,
}

impl InMemoryPayrollRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored results across all months.
    pub fn len(&self) -> usize {
        read(&self.results).len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PayrollRepository for InMemoryPayrollRepository {
    fn upsert(&self, result: PayrollResult) -> EngineResult<StoredPayroll> {
        let key = (result.month, result.staff_id.clone());
        let mut results = write(&self.results);

        let transfer_status = results
            .get(&key)
            .map(|existing| existing.transfer_status)
            .unwrap_or_default();
        let stored = StoredPayroll {
            result,
            transfer_status,
        };

        let replaced = results.insert(key, stored.clone()).is_some();
        debug!(
            staff_id = %stored.result.staff_id,
            month = %stored.result.month,
            replaced,
            "Stored payroll result"
        );

        Ok(stored)
    }

    fn get(&self, staff_id: &str, month: PayMonth) -> EngineResult<Option<StoredPayroll>> {
        Ok(read(&self.results)
            .get(&(month, staff_id.to_string()))
            .cloned())
    }

    fn set_transfer_status(
        &self,
        staff_id: &str,
        month: PayMonth,
        status: TransferStatus,
    ) -> EngineResult<StoredPayroll> {
        let mut results = write(&self.results);
        let stored = results
            .get_mut(&(month, staff_id.to_string()))
            .ok_or_else(|| EngineError::PayrollNotFound {
                staff_id: staff_id.to_string(),
                month: month.to_string(),
            })?;
        stored.transfer_status = status;
        Ok(stored.clone())
    }

    fn list_month(&self, month: PayMonth) -> EngineResult<Vec<StoredPayroll>> {
        let results = read(&self.results);
        Ok(results
            .iter()
            .filter(|((stored_month, _), _)| *stored_month == month)
            .map(|(_, stored)| stored.clone())
            .collect())
    }
}
