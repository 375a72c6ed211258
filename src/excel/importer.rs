//! Attendance workbook importer - Excel (.xlsx) → sheet rows

use crate::config::PaysheetConfig;
use crate::core::classify_sheet;
use crate::error::{PaysheetError, PaysheetResult};
use crate::ingest::{ingest_sheet, ReportPeriod};
use crate::types::{AttendanceSheet, CellValue, SheetData, SheetRow};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads the first worksheet of an attendance workbook
pub struct SheetImporter {
    path: PathBuf,
}

impl SheetImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Import the first worksheet as header + rows
    pub fn import(&self) -> PaysheetResult<SheetData> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| PaysheetError::Import(format!("Failed to open Excel file: {}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| PaysheetError::Import("Workbook has no worksheets".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            PaysheetError::Import(format!("Failed to read worksheet '{}': {}", sheet_name, e))
        })?;

        if range.is_empty() {
            return Err(PaysheetError::Import(format!(
                "Worksheet '{}' is empty",
                sheet_name
            )));
        }

        Ok(read_range(&range))
    }

    /// File name hint for the payroll month
    pub fn period(&self) -> Option<ReportPeriod> {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(ReportPeriod::from_file_name)
    }
}

/// Convert a worksheet range: row 0 is the header row
pub fn read_range(range: &Range<Data>) -> SheetData {
    let (height, width) = range.get_size();

    let mut headers: Vec<String> = Vec::with_capacity(width);
    for col in 0..width {
        let name = match range.get((0, col)) {
            Some(cell) => header_name(cell, col),
            None => format!("col_{}", col),
        };
        headers.push(name);
    }

    let mut sheet = SheetData::new(headers.clone());
    for row in 1..height {
        let mut cells = SheetRow::with_capacity(width);
        for (col, header) in headers.iter().enumerate() {
            let cell = range
                .get((row, col))
                .map(convert_cell)
                .unwrap_or(CellValue::Empty);
            // Duplicate headers: the leftmost column wins
            cells.entry(header.clone()).or_insert(cell);
        }
        sheet.rows.push(cells);
    }

    sheet
}

fn header_name(cell: &Data, col: usize) -> String {
    match cell {
        Data::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        _ => format!("col_{}", col),
    }
}

/// Reduce a calamine cell to a [`CellValue`]
pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => time_of_day(dt.as_f64()),
        Data::DateTimeIso(s) => parse_iso_time(s).unwrap_or_else(|| CellValue::Text(s.clone())),
        other => CellValue::Text(other.to_string()),
    }
}

/// Excel serial date → wall-clock time, from the fractional day
fn time_of_day(serial: f64) -> CellValue {
    let minutes = ((serial.fract() * 1440.0).round() as u32) % 1440;
    CellValue::Time {
        hour: minutes / 60,
        minute: minutes % 60,
    }
}

fn parse_iso_time(value: &str) -> Option<CellValue> {
    let time = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.time())
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S%.f"))
        .ok()?;
    Some(CellValue::Time {
        hour: time.hour(),
        minute: time.minute(),
    })
}

/// Import, ingest and classify an attendance workbook in one go
pub fn load_attendance<P: AsRef<Path>>(
    path: P,
    config: &PaysheetConfig,
) -> PaysheetResult<AttendanceSheet> {
    let importer = SheetImporter::new(&path);
    let data = importer.import()?;
    let mut sheet = classify_sheet(ingest_sheet(&data, &config.layout)?, &config.policy);
    sheet.period = importer.period();

    info!(
        "Loaded {} ({} employees, {} days)",
        path.as_ref().display(),
        sheet.employees.len(),
        sheet.days_in_month
    );
    Ok(sheet)
}
