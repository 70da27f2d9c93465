//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for calculating, fetching and
//! settling monthly payroll, and for the monthly labor expense summary.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AttendanceRequest, CalculationRequest, CompanyHolidayRequest, NON_NUMERIC_HOURS_WARNING,
    StaffRequest, TransferStatusRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
