//! Monthly payroll engine for Korean small businesses.
//!
//! This crate turns a staff member's daily attendance into a finalized
//! monthly payroll: base pay, the statutory weekly holiday allowance, the
//! four social insurance contributions and income tax withholding. The
//! calculation itself is pure; the `store`, `service` and `api` modules wrap
//! it for persistence and HTTP access.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
