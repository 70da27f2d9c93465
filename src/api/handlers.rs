//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post, put},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{
    AttendanceRecord, CalculationWarning, CompanyHoliday, PayMonth, StaffProfile,
};
use crate::service::LaborExpenseSummary;
use crate::store::StoredPayroll;

use super::request::{AttendanceRequest, CalculationRequest, TransferStatusRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiErrorResponse>;

/// Creates the API router with all endpoints.
///
/// | Method | Path | |
/// |---|---|---|
/// | `POST` | `/calculate` | calculate and store a payroll from inline inputs |
/// | `GET` | `/payroll/:staff_id/:month` | fetch a stored payroll |
/// | `PUT` | `/payroll/:staff_id/:month/transfer` | record a transfer outcome |
/// | `GET` | `/ledger/:month` | labor expense summary for a month |
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/payroll/:staff_id/:month", get(get_payroll_handler))
        .route("/payroll/:staff_id/:month/transfer", put(transfer_handler))
        .route("/ledger/:month", get(ledger_handler))
        .with_state(state)
}

/// Converts a JSON body rejection into a 400 response.
fn rejection_to_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

fn parse_month(correlation_id: Uuid, value: &str) -> Result<PayMonth, ApiErrorResponse> {
    value.parse::<PayMonth>().map_err(|err| {
        warn!(correlation_id = %correlation_id, month = %value, "Invalid month in path");
        err.into()
    })
}

fn log_failure(correlation_id: Uuid, err: EngineError) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    err.into()
}

/// Handler for `POST /calculate`.
///
/// Runs the pipeline on the inputs in the body and upserts the result.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> ApiResult<StoredPayroll> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let Json(request) = payload.map_err(|rejection| rejection_to_error(correlation_id, rejection))?;

    let month = request.month;
    let rate_year = request.rate_year;
    let staff: StaffProfile = request.staff.into();
    let input_warnings: Vec<CalculationWarning> = request
        .attendance
        .iter()
        .filter_map(AttendanceRequest::hours_warning)
        .collect();
    let records: Vec<AttendanceRecord> = request.attendance.into_iter().map(Into::into).collect();
    let holidays: Vec<CompanyHoliday> = request
        .company_holidays
        .into_iter()
        .map(Into::into)
        .collect();

    let start_time = Instant::now();
    let stored = state
        .service()
        .calculate_with_warnings(&staff, &records, &holidays, month, rate_year, input_warnings)
        .map_err(|err| log_failure(correlation_id, err))?;

    info!(
        correlation_id = %correlation_id,
        staff_id = %staff.id,
        month = %month,
        records = records.len(),
        final_pay = %stored.result.final_pay,
        warnings = stored.result.warnings.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Calculation completed successfully"
    );

    Ok(Json(stored))
}

/// Handler for `GET /payroll/:staff_id/:month`.
async fn get_payroll_handler(
    State(state): State<AppState>,
    Path((staff_id, month)): Path<(String, String)>,
) -> ApiResult<StoredPayroll> {
    let correlation_id = Uuid::new_v4();
    let month = parse_month(correlation_id, &month)?;
    info!(correlation_id = %correlation_id, staff_id = %staff_id, month = %month, "Fetching payroll");

    state
        .service()
        .payroll(&staff_id, month)
        .map(Json)
        .map_err(|err| log_failure(correlation_id, err))
}

/// Handler for `PUT /payroll/:staff_id/:month/transfer`.
async fn transfer_handler(
    State(state): State<AppState>,
    Path((staff_id, month)): Path<(String, String)>,
    payload: Result<Json<TransferStatusRequest>, JsonRejection>,
) -> ApiResult<StoredPayroll> {
    let correlation_id = Uuid::new_v4();
    let month = parse_month(correlation_id, &month)?;
    let Json(request) = payload.map_err(|rejection| rejection_to_error(correlation_id, rejection))?;

    info!(
        correlation_id = %correlation_id,
        staff_id = %staff_id,
        month = %month,
        status = ?request.status,
        "Updating transfer status"
    );

    state
        .service()
        .set_transfer_status(&staff_id, month, request.status)
        .map(Json)
        .map_err(|err| log_failure(correlation_id, err))
}

/// Handler for `GET /ledger/:month`.
async fn ledger_handler(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> ApiResult<LaborExpenseSummary> {
    let correlation_id = Uuid::new_v4();
    let month = parse_month(correlation_id, &month)?;

    let summary = state
        .service()
        .labor_expense(month)
        .map_err(|err| log_failure(correlation_id, err))?;

    info!(
        correlation_id = %correlation_id,
        month = %month,
        staff_count = summary.staff_count,
        labor_expense = %summary.labor_expense,
        "Ledger summary produced"
    );

    Ok(Json(summary))
}
