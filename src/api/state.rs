//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::service::PayrollService;
use crate::store::{
    InMemoryAttendanceSource, InMemoryHolidayCalendar, InMemoryPayrollRepository,
    InMemoryStaffDirectory,
};

/// Shared application state.
///
/// Wraps the [`PayrollService`], which holds the loaded configuration and
/// the stores behind `Arc`s, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    service: PayrollService,
}

impl AppState {
    /// Creates application state around an existing service.
    pub fn new(service: PayrollService) -> Self {
        Self { service }
    }

    /// Creates application state backed by empty in-memory stores.
    pub fn in_memory(config: ConfigLoader) -> Self {
        Self::new(PayrollService::new(
            Arc::new(config),
            Arc::new(InMemoryStaffDirectory::new()),
            Arc::new(InMemoryAttendanceSource::new()),
            Arc::new(InMemoryHolidayCalendar::new()),
            Arc::new(InMemoryPayrollRepository::new()),
        ))
    }

    /// Returns the payroll service.
    pub fn service(&self) -> &PayrollService {
        &self.service
    }
}
