//! Error types for the payroll engine.
//!
//! Hard failures are reported as distinct, named conditions so the calling
//! layer can tell "data not yet available" apart from "staff misconfigured".
//! Business edge cases (no eligible weeks, zero deductions) are never errors.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::StaffNotFound {
///     staff_id: "staff_042".to_string(),
/// };
/// assert_eq!(error.to_string(), "Staff not found: staff_042");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No staff profile exists for the requested id.
    #[error("Staff not found: {staff_id}")]
    StaffNotFound {
        /// The staff id that was looked up.
        staff_id: String,
    },

    /// The attendance window handed to the engine was empty.
    #[error("No attendance data for staff '{staff_id}' around {month}")]
    NoAttendanceData {
        /// The staff id being calculated.
        staff_id: String,
        /// The target month (YYYY-MM).
        month: String,
    },

    /// A staff profile field holds a value the engine cannot work with.
    #[error("Invalid staff profile field '{field}': {message}")]
    InvalidStaffProfile {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A month string was not of the form YYYY-MM.
    #[error("Invalid payroll month '{value}', expected YYYY-MM")]
    InvalidMonth {
        /// The rejected input.
        value: String,
    },

    /// No stored payroll result exists for the staff and month.
    #[error("Payroll result not found for staff '{staff_id}' in {month}")]
    PayrollNotFound {
        /// The staff id.
        staff_id: String,
        /// The month (YYYY-MM).
        month: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
