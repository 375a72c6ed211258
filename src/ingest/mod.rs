//! Attendance sheet ingestion
//!
//! Turns the first worksheet of an upload (header row, then an "In Time" row
//! optionally followed by an "Out Time" row per employee) into an
//! [`AttendanceSheet`](crate::types::AttendanceSheet) snapshot.

mod cell;
mod period;
mod sheet;

pub use cell::{format_clock, status_token, CellReader, CellReading, Punch};
pub use period::ReportPeriod;
pub use sheet::{
    detect_days_in_month, ingest_sheet, parse_salary, SheetIngestor, DEFAULT_DAYS_IN_MONTH,
};
