//! Report rows handed to the spreadsheet/JSON emitters

use chrono::NaiveDate;
use serde::Serialize;

use crate::ingest::ReportPeriod;
use crate::types::{DayStatus, Employee, SalaryCalculation};

/// One employee-day in a detail report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    pub day: u32,
    /// Calendar date when the period is known ("05-Jan-2025"), day number otherwise
    pub date: String,
    pub status: DayStatus,
    pub in_time: Option<String>,
    pub out_time: Option<String>,
    pub deficit_minutes: u32,
    pub buffer_applied: bool,
}

/// Everything an emitter needs for one employee
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeReport {
    pub id: u32,
    pub name: String,
    pub department: String,
    pub base_salary: f64,
    pub calculation: SalaryCalculation,
    pub days: Vec<DayReport>,
}

/// Date label for a day, using the period when both month and year are known
pub fn date_label(day: u32, period: Option<&ReportPeriod>) -> String {
    period
        .and_then(|p| NaiveDate::from_ymd_opt(p.year?, p.month?, day))
        .map(|d| d.format("%d-%b-%Y").to_string())
        .unwrap_or_else(|| day.to_string())
}

impl EmployeeReport {
    pub fn build(
        employee: &Employee,
        calculation: &SalaryCalculation,
        period: Option<&ReportPeriod>,
    ) -> Self {
        let days = employee
            .days
            .values()
            .map(|d| DayReport {
                day: d.day,
                date: date_label(d.day, period),
                status: d.status,
                in_time: d.in_time.clone(),
                out_time: d.out_time.clone(),
                deficit_minutes: d.deficit_minutes,
                buffer_applied: calculation.buffered(d.day) && d.is_buffer_eligible(),
            })
            .collect();

        Self {
            id: employee.id,
            name: employee.name.clone(),
            department: employee.department.clone(),
            base_salary: employee.base_salary,
            calculation: calculation.clone(),
            days,
        }
    }
}
