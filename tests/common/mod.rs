//! Attendance workbook fixtures built at test time
#![allow(dead_code)]

use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::PathBuf;
use tempfile::TempDir;

pub const DAYS: u32 = 30;
pub const WEEK_OFFS: [u32; 4] = [7, 14, 21, 28];

/// A cell as written into the fixture workbook
#[derive(Clone, Copy)]
pub enum Cell {
    Blank,
    Text(&'static str),
    Number(f64),
}

pub struct Row {
    pub id: Cell,
    pub name: Cell,
    pub department: Cell,
    pub salary: Cell,
    pub marker: &'static str,
    /// day 1..=DAYS
    pub days: Vec<Cell>,
}

impl Row {
    pub fn in_row(id: f64, name: &'static str, department: &'static str, salary: Cell) -> Self {
        Self {
            id: Cell::Number(id),
            name: Cell::Text(name),
            department: Cell::Text(department),
            salary,
            marker: "In Time",
            days: vec![Cell::Text("10:00"); DAYS as usize],
        }
    }

    pub fn out_row() -> Self {
        Self {
            id: Cell::Blank,
            name: Cell::Blank,
            department: Cell::Blank,
            salary: Cell::Blank,
            marker: "Out Time",
            days: vec![Cell::Text("18:30"); DAYS as usize],
        }
    }

    pub fn set(&mut self, day: u32, cell: Cell) {
        self.days[(day - 1) as usize] = cell;
    }
}

/// Asha (#1): 120 deficit minutes over days 1-4, week offs on 7/14/21/28
pub fn asha_rows() -> Vec<Row> {
    let mut in_row = Row::in_row(1.0, "Asha", "Sales", Cell::Number(31000.0));
    let mut out_row = Row::out_row();

    // 09:45 in, "6:15" out → 18:15, 15 early
    in_row.set(1, Cell::Text("09:45"));
    out_row.set(1, Cell::Text("6:15"));
    // 30 late
    in_row.set(2, Cell::Text("10:30"));
    // 15 late + 30 early
    in_row.set(3, Cell::Text("10:15"));
    out_row.set(3, Cell::Text("18:00"));
    // 30 late
    in_row.set(4, Cell::Text("10:30"));

    for day in WEEK_OFFS {
        in_row.set(day, Cell::Text("Week off"));
        out_row.set(day, Cell::Blank);
    }
    vec![in_row, out_row]
}

/// Ravi (#2): salary written as "25,000", punches in every day, no out row
pub fn ravi_rows() -> Vec<Row> {
    vec![Row::in_row(2.0, "Ravi", "Ops", Cell::Text("25,000"))]
}

/// Meena (#3): status tokens and numeric punches, no deficit
pub fn meena_rows() -> Vec<Row> {
    let mut in_row = Row::in_row(3.0, "Meena", "HR", Cell::Number(30000.0));
    let mut out_row = Row::out_row();

    for (day, token) in [(1, "WFH"), (2, "CL"), (3, "Holiday"), (4, "Work from home")] {
        in_row.set(day, Cell::Text(token));
        out_row.set(day, Cell::Blank);
    }
    // PM correction on a plain out punch
    out_row.set(5, Cell::Text("6:30"));
    // fractional-hours numbers: 09:55 in, 18:30 out
    in_row.set(6, Cell::Number(9.55));
    out_row.set(6, Cell::Number(18.3));

    for day in WEEK_OFFS {
        in_row.set(day, Cell::Text("Week Off"));
        out_row.set(day, Cell::Blank);
    }
    vec![in_row, out_row]
}

pub fn standard_rows() -> Vec<Row> {
    let mut rows = asha_rows();
    rows.extend(ravi_rows());
    rows.extend(meena_rows());
    rows
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: Cell) {
    match cell {
        Cell::Blank => {}
        Cell::Text(s) => {
            sheet.write_string(row, col, s).unwrap();
        }
        Cell::Number(n) => {
            sheet.write_number(row, col, n).unwrap();
        }
    }
}

/// Write `rows` under the standard header into `dir/name`
pub fn write_attendance(dir: &TempDir, name: &str, rows: &[Row]) -> PathBuf {
    let path = dir.path().join(name);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let fixed = ["S.No", "Employee Name", "Department", "Salary", "In/Out Time"];
    for (col, header) in fixed.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for day in 1..=DAYS {
        sheet
            .write_number(0, (fixed.len() as u32 + day - 1) as u16, day as f64)
            .unwrap();
    }

    for (r, row) in rows.iter().enumerate() {
        let excel_row = (r + 1) as u32;
        write_cell(sheet, excel_row, 0, row.id);
        write_cell(sheet, excel_row, 1, row.name);
        write_cell(sheet, excel_row, 2, row.department);
        write_cell(sheet, excel_row, 3, row.salary);
        write_cell(sheet, excel_row, 4, Cell::Text(row.marker));
        for (d, cell) in row.days.iter().enumerate() {
            write_cell(sheet, excel_row, (fixed.len() + d) as u16, *cell);
        }
    }

    workbook.save(&path).unwrap();
    path
}

/// Standard three-employee workbook named like a January 2025 export
pub fn standard_workbook(dir: &TempDir) -> PathBuf {
    write_attendance(dir, "Attendance_Jan_2025.xlsx", &standard_rows())
}
