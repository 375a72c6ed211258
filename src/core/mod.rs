//! Core attendance-to-salary engine

pub mod classifier;
pub mod salary;
pub mod session;

pub use classifier::{classify_day, classify_employee, classify_sheet, parse_clock};
pub use salary::{buffer_credit, compute_salary, per_minute_rate};
pub use session::{PayrollSession, SessionSummary};
