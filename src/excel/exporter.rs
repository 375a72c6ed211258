//! Salary report exporter (.xlsx and .json)

use crate::error::{PaysheetError, PaysheetResult};
use crate::ingest::ReportPeriod;
use crate::report::EmployeeReport;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::fs;
use std::path::Path;

const SUMMARY_HEADERS: [&str; 19] = [
    "ID",
    "Employee Name",
    "Department",
    "Base Salary",
    "Total Days",
    "Working Days",
    "Present",
    "WFH",
    "Week Off",
    "Absent",
    "CL",
    "Holiday",
    "Total Deficit (min)",
    "Buffer Applied (min)",
    "Buffer Days",
    "Final Deficit (min)",
    "Per-Minute Rate",
    "Deduction",
    "Final Salary",
];

const DETAIL_HEADERS: [&str; 8] = [
    "ID",
    "Employee Name",
    "Date",
    "Status",
    "In Time",
    "Out Time",
    "Deficit (min)",
    "Buffer Applied",
];

fn export_err(e: XlsxError) -> PaysheetError {
    PaysheetError::Export(format!("Failed to write worksheet: {}", e))
}

/// Writes salary reports as a Summary + Details workbook, or as JSON
pub struct ReportExporter<'a> {
    reports: &'a [EmployeeReport],
    period: Option<ReportPeriod>,
}

impl<'a> ReportExporter<'a> {
    pub fn new(reports: &'a [EmployeeReport], period: Option<ReportPeriod>) -> Self {
        Self { reports, period }
    }

    /// Pick the format from the output extension (.json, anything else is xlsx)
    pub fn export(&self, output_path: &Path) -> PaysheetResult<()> {
        let is_json = output_path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            self.export_json(output_path)
        } else {
            self.export_xlsx(output_path)
        }
    }

    pub fn export_json(&self, output_path: &Path) -> PaysheetResult<()> {
        let json = serde_json::to_string_pretty(self.reports)?;
        fs::write(output_path, json)?;
        Ok(())
    }

    pub fn export_xlsx(&self, output_path: &Path) -> PaysheetResult<()> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let money_format = Format::new().set_num_format("#,##0.00");

        let summary = workbook.add_worksheet();
        summary.set_name("Summary").map_err(export_err)?;
        self.write_summary(summary, &header_format, &money_format)?;

        let details = workbook.add_worksheet();
        details.set_name("Details").map_err(export_err)?;
        self.write_details(details, &header_format)?;

        workbook
            .save(output_path)
            .map_err(|e| PaysheetError::Export(format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }

    fn write_summary(
        &self,
        worksheet: &mut Worksheet,
        header_format: &Format,
        money_format: &Format,
    ) -> PaysheetResult<()> {
        for (col, header) in SUMMARY_HEADERS.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *header, header_format)
                .map_err(export_err)?;
        }
        worksheet.set_column_width(1, 24).ok();
        worksheet.set_column_width(2, 16).ok();

        for (i, report) in self.reports.iter().enumerate() {
            let row = (i + 1) as u32;
            let calc = &report.calculation;
            let buffer_days = calc
                .days_with_buffer
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ");

            worksheet.write_number(row, 0, report.id as f64).map_err(export_err)?;
            worksheet.write_string(row, 1, &report.name).map_err(export_err)?;
            worksheet.write_string(row, 2, &report.department).map_err(export_err)?;
            worksheet
                .write_number_with_format(row, 3, report.base_salary, money_format)
                .map_err(export_err)?;

            let counts = [
                calc.total_days,
                calc.working_days,
                calc.present_days,
                calc.wfh_days,
                calc.week_off_days,
                calc.absent_days,
                calc.cl_days,
                calc.holiday_days,
                calc.total_deficit_minutes,
                calc.buffer_applied,
            ];
            for (offset, value) in counts.iter().enumerate() {
                worksheet
                    .write_number(row, 4 + offset as u16, *value as f64)
                    .map_err(export_err)?;
            }

            worksheet.write_string(row, 14, &buffer_days).map_err(export_err)?;
            worksheet
                .write_number(row, 15, calc.final_deficit as f64)
                .map_err(export_err)?;
            worksheet
                .write_number_with_format(row, 16, calc.per_minute_rate, money_format)
                .map_err(export_err)?;
            worksheet
                .write_number_with_format(row, 17, calc.deduction, money_format)
                .map_err(export_err)?;
            worksheet
                .write_number_with_format(row, 18, calc.final_salary, money_format)
                .map_err(export_err)?;
        }

        if let Some(period) = &self.period {
            let meta_row = (self.reports.len() + 2) as u32;
            worksheet
                .write_string(meta_row, 0, format!("Period: {}", period))
                .map_err(export_err)?;
        }

        Ok(())
    }

    fn write_details(&self, worksheet: &mut Worksheet, header_format: &Format) -> PaysheetResult<()> {
        for (col, header) in DETAIL_HEADERS.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *header, header_format)
                .map_err(export_err)?;
        }
        worksheet.set_column_width(1, 24).ok();
        worksheet.set_column_width(2, 14).ok();

        let mut row: u32 = 1;
        for report in self.reports {
            for day in &report.days {
                worksheet.write_number(row, 0, report.id as f64).map_err(export_err)?;
                worksheet.write_string(row, 1, &report.name).map_err(export_err)?;
                worksheet.write_string(row, 2, &day.date).map_err(export_err)?;
                worksheet.write_string(row, 3, day.status.label()).map_err(export_err)?;
                worksheet
                    .write_string(row, 4, day.in_time.as_deref().unwrap_or("-"))
                    .map_err(export_err)?;
                worksheet
                    .write_string(row, 5, day.out_time.as_deref().unwrap_or("-"))
                    .map_err(export_err)?;
                worksheet
                    .write_number(row, 6, day.deficit_minutes as f64)
                    .map_err(export_err)?;
                worksheet
                    .write_string(row, 7, if day.buffer_applied { "Yes" } else { "No" })
                    .map_err(export_err)?;
                row += 1;
            }
        }

        Ok(())
    }
}
