//! Request types for the payroll API.
//!
//! This module defines the JSON request structures for the `/calculate` and
//! transfer status endpoints.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{
    AttendanceRecord, AttendanceStatus, CalculationWarning, CompanyHoliday, ContractType,
    PayMonth, StaffProfile, TransferStatus,
};

/// Request body for the `/calculate` endpoint.
///
/// Carries everything the calculation needs inline: the staff profile, the
/// attendance window and the company holidays in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The staff profile.
    pub staff: StaffRequest,
    /// The payroll month (`YYYY-MM`).
    pub month: PayMonth,
    /// Insurance rate year; defaults to the month's year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_year: Option<i32>,
    /// Attendance for the window around the month.
    pub attendance: Vec<AttendanceRequest>,
    /// Company closure dates in the window.
    #[serde(default)]
    pub company_holidays: Vec<CompanyHolidayRequest>,
}

/// Staff information in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffRequest {
    /// Unique identifier for the staff member.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// The contract type.
    pub contract_type: ContractType,
    /// Hourly wage.
    #[serde(default)]
    pub hourly_wage: Decimal,
    /// Fixed monthly salary.
    #[serde(default)]
    pub monthly_salary: Decimal,
    /// Enrolled in the four statutory insurances.
    #[serde(default)]
    pub insurance_4_major: bool,
    /// Reported monthly standard income, 0 if unset.
    #[serde(default)]
    pub insurance_base_salary: Decimal,
    /// Dependents including the staff member.
    #[serde(default = "default_dependents")]
    pub dependents_count: u32,
    /// Children eligible for the child credit.
    #[serde(default)]
    pub children_count: u32,
}

fn default_dependents() -> u32 {
    1
}

/// Warning code for attendance hours that could not be read as a number.
pub const NON_NUMERIC_HOURS_WARNING: &str = "NON_NUMERIC_HOURS";

/// One attendance row in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawAttendanceRequest")]
pub struct AttendanceRequest {
    /// The date.
    pub date: NaiveDate,
    /// Hours worked. Accepts a number or a numeric string; anything else is 0.
    pub total_hours: Decimal,
    /// The attendance status.
    pub status: AttendanceStatus,
    /// The submitted hours value when it was not numeric.
    #[serde(skip)]
    pub unparsed_hours: Option<String>,
}

impl AttendanceRequest {
    /// The warning to record on the result when the hours were not numeric.
    pub fn hours_warning(&self) -> Option<CalculationWarning> {
        self.unparsed_hours.as_ref().map(|raw| {
            CalculationWarning::new(
                NON_NUMERIC_HOURS_WARNING,
                format!("Hours '{}' on {} are not numeric; treated as 0", raw, self.date),
            )
        })
    }
}

#[derive(Deserialize)]
struct RawAttendanceRequest {
    date: NaiveDate,
    #[serde(default)]
    total_hours: Option<serde_json::Value>,
    #[serde(default)]
    status: AttendanceStatus,
}

impl From<RawAttendanceRequest> for AttendanceRequest {
    fn from(raw: RawAttendanceRequest) -> Self {
        let (total_hours, unparsed_hours) = lenient_hours(raw.total_hours);
        AttendanceRequest {
            date: raw.date,
            total_hours,
            status: raw.status,
            unparsed_hours,
        }
    }
}

/// A company closure date in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyHolidayRequest {
    /// The closed date.
    pub date: NaiveDate,
    /// Optional label.
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for the transfer status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferStatusRequest {
    /// The new status.
    pub status: TransferStatus,
}

/// Parses hours from a JSON number or string.
///
/// Missing and null values are 0. Anything else that is not numeric is also
/// 0, and its text is returned alongside so the caller can record it.
fn lenient_hours(raw: Option<serde_json::Value>) -> (Decimal, Option<String>) {
    let text = match raw {
        None | Some(serde_json::Value::Null) => return (Decimal::ZERO, None),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    };

    match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
        Ok(hours) => (hours, None),
        Err(_) => {
            warn!(value = %text, "Non-numeric attendance hours treated as 0");
            (Decimal::ZERO, Some(text))
        }
    }
}

impl From<StaffRequest> for StaffProfile {
    fn from(req: StaffRequest) -> Self {
        StaffProfile {
            id: req.id,
            name: req.name,
            contract_type: req.contract_type,
            hourly_wage: req.hourly_wage,
            monthly_salary: req.monthly_salary,
            insurance_4_major: req.insurance_4_major,
            insurance_base_salary: req.insurance_base_salary,
            dependents_count: req.dependents_count,
            children_count: req.children_count,
        }
    }
}

impl From<AttendanceRequest> for AttendanceRecord {
    fn from(req: AttendanceRequest) -> Self {
        AttendanceRecord {
            date: req.date,
            total_hours: req.total_hours,
            status: req.status,
        }
    }
}

impl From<CompanyHolidayRequest> for CompanyHoliday {
    fn from(req: CompanyHolidayRequest) -> Self {
        CompanyHoliday {
            date: req.date,
            name: req.name,
        }
    }
}
