//! Paysheet - attendance-to-salary engine
//!
//! Reads a monthly attendance workbook (one "In Time" row and an optional
//! "Out Time" row per employee, one column per day), classifies every day,
//! measures late-arrival/early-departure deficits against office hours, applies
//! a bounded grace buffer and derives the payable salary.
//!
//! # Example
//!
//! ```no_run
//! use paysheet::config::PaysheetConfig;
//! use paysheet::core::PayrollSession;
//! use paysheet::excel::load_attendance;
//!
//! let config = PaysheetConfig::default();
//! let sheet = load_attendance("Attendance_Jan_2025.xlsx", &config)?;
//! let mut session = PayrollSession::new(sheet, config.policy.clone());
//!
//! session.toggle_buffer_day(1, 4)?;
//! for report in session.reports() {
//!     println!("{}: {:.2}", report.name, report.calculation.final_salary);
//! }
//! # Ok::<(), paysheet::error::PaysheetError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod ingest;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use error::{PaysheetError, PaysheetResult};
pub use types::{AttendanceSheet, DayAttendance, DayStatus, Employee, SalaryCalculation};
