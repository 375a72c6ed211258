use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::ingest::ReportPeriod;

//==============================================================================
// Raw sheet cells
//==============================================================================

/// A single worksheet cell, reduced to the shapes the ingestor distinguishes
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank or missing cell
    Empty,
    /// Free text
    Text(String),
    /// Plain number (integers are widened to f64)
    Number(f64),
    /// Date/time cell carrying a wall-clock hour and minute
    Time { hour: u32, minute: u32 },
    /// Boolean cell
    Bool(bool),
}

impl CellValue {
    /// Check if the cell is blank (missing, or text that is only whitespace)
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell the way it would appear in the sheet
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Time { hour, minute } => format!("{:02}:{:02}", hour, minute),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

/// One sheet row: header name → cell
pub type SheetRow = HashMap<String, CellValue>;

/// First worksheet of an upload: header row plus data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl SheetData {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row given as (header, cell) pairs; headers not listed stay absent
    pub fn push_row<I, K>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (K, CellValue)>,
        K: Into<String>,
    {
        self.rows
            .push(cells.into_iter().map(|(k, v)| (k.into(), v)).collect());
    }
}

//==============================================================================
// Attendance
//==============================================================================

/// Attendance status of one employee-day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayStatus {
    /// Both punches recorded
    Present,
    /// Missing or unreadable punches
    Absent,
    /// Work from home (paid)
    #[serde(rename = "WFH")]
    Wfh,
    /// Scheduled non-working day
    #[serde(rename = "Week Off")]
    WeekOff,
    /// Casual leave (paid)
    #[serde(rename = "CL")]
    Cl,
    /// Public holiday (paid)
    Holiday,
}

impl DayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DayStatus::Present => "Present",
            DayStatus::Absent => "Absent",
            DayStatus::Wfh => "WFH",
            DayStatus::WeekOff => "Week Off",
            DayStatus::Cl => "CL",
            DayStatus::Holiday => "Holiday",
        }
    }

    /// Paid statuses that never carry a deficit
    pub fn is_exempt(&self) -> bool {
        matches!(
            self,
            DayStatus::WeekOff | DayStatus::Wfh | DayStatus::Cl | DayStatus::Holiday
        )
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One day of one employee, as read from the sheet and then classified
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAttendance {
    pub day: u32,
    pub label: String,
    pub in_time: Option<String>,
    pub out_time: Option<String>,
    pub status: DayStatus,
    pub deficit_minutes: u32,
    pub is_late: bool,
    pub late_by: u32,
    pub is_early: bool,
    pub early_by: u32,
}

impl DayAttendance {
    /// Create an unclassified day (no deficit computed yet)
    pub fn new(
        day: u32,
        in_time: Option<String>,
        out_time: Option<String>,
        status: DayStatus,
    ) -> Self {
        Self {
            day,
            label: day.to_string(),
            in_time,
            out_time,
            status,
            deficit_minutes: 0,
            is_late: false,
            late_by: 0,
            is_early: false,
            early_by: 0,
        }
    }

    /// A grace buffer can only be credited against a Present day with a deficit
    pub fn is_buffer_eligible(&self) -> bool {
        self.status == DayStatus::Present && self.deficit_minutes > 0
    }
}

/// Employee as found in one uploaded sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Sequence number from the sheet (not unique across uploads)
    pub id: u32,
    pub name: String,
    pub department: String,
    pub base_salary: f64,
    /// Day of month → attendance
    pub days: BTreeMap<u32, DayAttendance>,
}

impl Employee {
    pub fn new(id: u32, name: String, department: String, base_salary: f64) -> Self {
        Self {
            id,
            name,
            department,
            base_salary,
            days: BTreeMap::new(),
        }
    }

    pub fn day(&self, day: u32) -> Option<&DayAttendance> {
        self.days.get(&day)
    }

    pub fn total_days(&self) -> u32 {
        self.days.len() as u32
    }
}

/// Immutable result of one upload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSheet {
    pub days_in_month: u32,
    pub period: Option<ReportPeriod>,
    pub employees: Vec<Employee>,
}

impl AttendanceSheet {
    pub fn employee(&self, id: u32) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }
}

//==============================================================================
// Salary
//==============================================================================

/// Derived pay figures for one employee
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryCalculation {
    pub total_days: u32,
    pub working_days: u32,
    pub present_days: u32,
    pub wfh_days: u32,
    pub week_off_days: u32,
    pub absent_days: u32,
    pub cl_days: u32,
    pub holiday_days: u32,
    pub total_deficit_minutes: u32,
    pub buffer_applied: u32,
    pub days_with_buffer: Vec<u32>,
    pub final_deficit: u32,
    pub per_minute_rate: f64,
    pub deduction: f64,
    pub final_salary: f64,
}

impl SalaryCalculation {
    /// Whether `day` is among the nominated buffer days
    pub fn buffered(&self, day: u32) -> bool {
        self.days_with_buffer.contains(&day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text("   ".to_string()).is_blank());
        assert!(!CellValue::Text("09:30".to_string()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_cell_as_text() {
        assert_eq!(CellValue::Number(31000.0).as_text(), "31000");
        assert_eq!(CellValue::Number(9.35).as_text(), "9.35");
        assert_eq!(CellValue::Time { hour: 9, minute: 5 }.as_text(), "09:05");
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn test_status_serializes_as_sheet_labels() {
        assert_eq!(serde_json::to_string(&DayStatus::WeekOff).unwrap(), "\"Week Off\"");
        assert_eq!(serde_json::to_string(&DayStatus::Wfh).unwrap(), "\"WFH\"");
        assert_eq!(serde_json::to_string(&DayStatus::Cl).unwrap(), "\"CL\"");
        assert_eq!(DayStatus::Holiday.to_string(), "Holiday");
    }

    #[test]
    fn test_exempt_statuses() {
        assert!(DayStatus::WeekOff.is_exempt());
        assert!(DayStatus::Wfh.is_exempt());
        assert!(DayStatus::Cl.is_exempt());
        assert!(DayStatus::Holiday.is_exempt());
        assert!(!DayStatus::Present.is_exempt());
        assert!(!DayStatus::Absent.is_exempt());
    }

    #[test]
    fn test_buffer_eligibility() {
        let mut day = DayAttendance::new(3, Some("10:10".into()), Some("18:30".into()), DayStatus::Present);
        assert!(!day.is_buffer_eligible());
        day.deficit_minutes = 10;
        assert!(day.is_buffer_eligible());
        day.status = DayStatus::Absent;
        assert!(!day.is_buffer_eligible());
    }
}
