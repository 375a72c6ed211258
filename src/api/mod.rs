//! Paysheet API Server module
//!
//! HTTP REST API over payroll sessions.
//! Run with `paysheet-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
