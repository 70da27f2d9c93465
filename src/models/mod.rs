//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod pay_month;
mod payroll_result;
mod staff;

pub use attendance::{AttendanceRecord, AttendanceStatus, CompanyHoliday};
pub use pay_month::PayMonth;
pub use payroll_result::{
    CalculationWarning, DeductionLines, HOLIDAY_WEEK_SLOTS, PayrollResult, TransferStatus,
    WeeklyHolidayDetail, WeeklyHolidayStatus, WorkBreakdownEntry,
};
pub use staff::{ContractType, StaffProfile};
