//! Sheet ingestor: header row + alternating In/Out rows → employees

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::cell::{CellReader, CellReading, Punch};
use crate::config::SheetLayout;
use crate::error::PaysheetResult;
use crate::types::{AttendanceSheet, CellValue, DayAttendance, DayStatus, Employee, SheetData, SheetRow};

/// Used when no header is a day number
pub const DEFAULT_DAYS_IN_MONTH: u32 = 31;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Highest header that parses as a day of month (1-31), or 31 when there is none
pub fn detect_days_in_month<'a, I>(headers: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    headers
        .into_iter()
        .filter_map(|h| h.trim().parse::<u32>().ok())
        .filter(|d| (1..=31).contains(d))
        .max()
        .unwrap_or(DEFAULT_DAYS_IN_MONTH)
}

/// Read a salary cell; anything unusable becomes 0
pub fn parse_salary(cell: &CellValue) -> f64 {
    let value = match cell {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };

    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => {
            if !cell.is_blank() {
                warn!("Unparseable salary {:?}, using 0", cell.as_text());
            }
            0.0
        }
    }
}

fn parse_sequence(cell: &CellValue) -> Option<u32> {
    match cell {
        CellValue::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 => {
            Some(*n as u32)
        }
        CellValue::Text(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Resolved header names for one sheet
struct Columns {
    id: Option<String>,
    name: Option<String>,
    department: Option<String>,
    salary: Option<String>,
    marker: Option<String>,
    /// day of month → header
    days: HashMap<u32, String>,
}

impl Columns {
    fn resolve(headers: &[String], layout: &SheetLayout) -> Self {
        let find = |wanted: &str| {
            headers
                .iter()
                .find(|h| h.trim().eq_ignore_ascii_case(wanted.trim()))
                .cloned()
        };

        let mut days = HashMap::new();
        for header in headers {
            if let Ok(day) = header.trim().parse::<u32>() {
                if (1..=31).contains(&day) {
                    days.entry(day).or_insert_with(|| header.clone());
                }
            }
        }

        Self {
            id: layout.id_columns.iter().find_map(|alias| find(alias.as_str())),
            name: find(layout.name_column.as_str()),
            department: find(layout.department_column.as_str()),
            salary: find(layout.salary_column.as_str()),
            marker: find(layout.marker_column.as_str()),
            days,
        }
    }

    fn cell<'r>(row: &'r SheetRow, header: Option<&String>) -> &'r CellValue {
        header.and_then(|h| row.get(h)).unwrap_or(&EMPTY_CELL)
    }
}

/// Turns sheet rows into per-employee, per-day attendance
pub struct SheetIngestor<'a> {
    layout: &'a SheetLayout,
    reader: CellReader,
}

impl<'a> SheetIngestor<'a> {
    pub fn new(layout: &'a SheetLayout) -> PaysheetResult<Self> {
        Ok(Self {
            layout,
            reader: CellReader::new()?,
        })
    }

    /// Ingest a whole sheet. Statuses are provisional until classified.
    pub fn ingest(&self, sheet: &SheetData) -> AttendanceSheet {
        let days_in_month = detect_days_in_month(sheet.headers.iter().map(|h| h.as_str()));
        let columns = Columns::resolve(&sheet.headers, self.layout);

        if columns.name.is_none() || columns.id.is_none() {
            warn!(
                "Sheet has no '{}' or sequence column; no employees will be found",
                self.layout.name_column
            );
        }

        let mut employees = Vec::new();
        let mut idx = 0;
        while idx < sheet.rows.len() {
            let row = &sheet.rows[idx];
            idx += 1;

            if !self.starts_employee(row, &columns) {
                continue;
            }

            let out_row = sheet
                .rows
                .get(idx)
                .filter(|next| self.is_out_row(next, &columns));
            if out_row.is_some() {
                idx += 1;
            }

            let ordinal = employees.len() as u32 + 1;
            let employee = self.read_employee(row, out_row, &columns, days_in_month, ordinal);
            debug!(
                "Ingested employee {} ({}), out-time row: {}",
                employee.id,
                employee.name,
                out_row.is_some()
            );
            employees.push(employee);
        }

        info!(
            "Ingested {} employees over {} days",
            employees.len(),
            days_in_month
        );

        AttendanceSheet {
            days_in_month,
            period: None,
            employees,
        }
    }

    fn starts_employee(&self, row: &SheetRow, columns: &Columns) -> bool {
        !Columns::cell(row, columns.name.as_ref()).is_blank()
            && !Columns::cell(row, columns.id.as_ref()).is_blank()
    }

    fn is_out_row(&self, row: &SheetRow, columns: &Columns) -> bool {
        match Columns::cell(row, columns.marker.as_ref()) {
            CellValue::Text(marker) => marker.trim().eq_ignore_ascii_case(self.layout.out_marker.trim()),
            _ => false,
        }
    }

    fn read_employee(
        &self,
        in_row: &SheetRow,
        out_row: Option<&SheetRow>,
        columns: &Columns,
        days_in_month: u32,
        ordinal: u32,
    ) -> Employee {
        let id = parse_sequence(Columns::cell(in_row, columns.id.as_ref())).unwrap_or(ordinal);
        let name = Columns::cell(in_row, columns.name.as_ref()).as_text().trim().to_string();
        let department = Columns::cell(in_row, columns.department.as_ref())
            .as_text()
            .trim()
            .to_string();
        let base_salary = parse_salary(Columns::cell(in_row, columns.salary.as_ref()));

        let mut employee = Employee::new(id, name, department, base_salary);

        for day in 1..=days_in_month {
            let header = columns.days.get(&day);
            let in_reading = self.reader.read(Columns::cell(in_row, header), Punch::In);
            let out_reading = match out_row {
                Some(row) => self.reader.read(Columns::cell(row, header), Punch::Out),
                None => CellReading::Blank,
            };

            let status = provisional_status(&in_reading, &out_reading);
            employee.days.insert(
                day,
                DayAttendance::new(day, in_reading.time_value(), out_reading.time_value(), status),
            );
        }

        employee
    }
}

/// The in-cell decides first (a blank in-cell is a week off); an explicit
/// token in the out-cell is the fallback. Everything else starts as Present.
fn provisional_status(in_reading: &CellReading, out_reading: &CellReading) -> DayStatus {
    match (in_reading, out_reading) {
        (CellReading::Blank, _) => DayStatus::WeekOff,
        (CellReading::Status(status), _) => *status,
        (_, CellReading::Status(status)) => *status,
        _ => DayStatus::Present,
    }
}

/// Convenience wrapper around [`SheetIngestor`]
pub fn ingest_sheet(sheet: &SheetData, layout: &SheetLayout) -> PaysheetResult<AttendanceSheet> {
    Ok(SheetIngestor::new(layout)?.ingest(sheet))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_detect_days_in_month() {
        let headers = ["S.No", "Employee Name", "1", "2", "30", "Salary"];
        assert_eq!(detect_days_in_month(headers.iter().copied()), 30);
    }

    #[test]
    fn test_detect_days_ignores_out_of_range() {
        let headers = ["0", "28", "45", "2025"];
        assert_eq!(detect_days_in_month(headers.iter().copied()), 28);
    }

    #[test]
    fn test_detect_days_defaults_to_31() {
        let headers = ["Employee Name", "Department"];
        assert_eq!(detect_days_in_month(headers.iter().copied()), 31);
    }

    #[test]
    fn test_parse_salary() {
        assert_eq!(parse_salary(&CellValue::Number(31000.0)), 31000.0);
        assert_eq!(parse_salary(&text(" 45,500 ")), 45500.0);
        assert_eq!(parse_salary(&text("n/a")), 0.0);
        assert_eq!(parse_salary(&CellValue::Empty), 0.0);
        assert_eq!(parse_salary(&CellValue::Number(-10.0)), 0.0);
        assert_eq!(parse_salary(&CellValue::Bool(true)), 0.0);
    }

    #[test]
    fn test_parse_sequence() {
        assert_eq!(parse_sequence(&CellValue::Number(4.0)), Some(4));
        assert_eq!(parse_sequence(&text(" 12 ")), Some(12));
        assert_eq!(parse_sequence(&CellValue::Number(1.5)), None);
        assert_eq!(parse_sequence(&text("A-7")), None);
    }

    #[test]
    fn test_provisional_status() {
        let time = CellReading::Time("09:30".into());
        assert_eq!(provisional_status(&CellReading::Blank, &time), DayStatus::WeekOff);
        assert_eq!(
            provisional_status(&CellReading::Status(DayStatus::Wfh), &CellReading::Blank),
            DayStatus::Wfh
        );
        assert_eq!(
            provisional_status(&time, &CellReading::Status(DayStatus::Holiday)),
            DayStatus::Holiday
        );
        assert_eq!(provisional_status(&time, &CellReading::Blank), DayStatus::Present);
        assert_eq!(
            provisional_status(&CellReading::Raw("??".into()), &time),
            DayStatus::Present
        );
    }

    #[test]
    fn test_header_matching_ignores_case_and_spaces() {
        let layout = SheetLayout::default();
        let headers: Vec<String> = [" s.no ", "EMPLOYEE NAME", "salary", "in/out time", "1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let columns = Columns::resolve(&headers, &layout);
        assert_eq!(columns.id.as_deref(), Some(" s.no "));
        assert_eq!(columns.name.as_deref(), Some("EMPLOYEE NAME"));
        assert_eq!(columns.salary.as_deref(), Some("salary"));
        assert_eq!(columns.marker.as_deref(), Some("in/out time"));
        assert!(columns.department.is_none());
        assert_eq!(columns.days.get(&1).map(|s| s.as_str()), Some("1"));
    }
}
