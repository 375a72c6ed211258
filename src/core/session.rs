//! Payroll session: one uploaded sheet plus the buffer days picked for it
//!
//! The session is the selection layer. It enforces the per-employee
//! nomination cap and eligibility, and recomputes only the employee whose
//! selection changed.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use super::salary::compute_salary;
use crate::config::PayrollPolicy;
use crate::error::{PaysheetError, PaysheetResult};
use crate::ingest::ReportPeriod;
use crate::report::EmployeeReport;
use crate::types::{AttendanceSheet, Employee, SalaryCalculation};

/// Totals across all employees of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub period: Option<ReportPeriod>,
    pub days_in_month: u32,
    pub employee_count: usize,
    pub total_base_salary: f64,
    pub total_deduction: f64,
    pub total_final_salary: f64,
}

pub struct PayrollSession {
    policy: PayrollPolicy,
    sheet: AttendanceSheet,
    /// employee id → nominated days, in selection order
    selections: HashMap<u32, Vec<u32>>,
    /// parallel to `sheet.employees`
    calculations: Vec<SalaryCalculation>,
}

impl PayrollSession {
    /// Start a session from a classified sheet
    pub fn new(sheet: AttendanceSheet, policy: PayrollPolicy) -> Self {
        let mut session = Self {
            policy,
            sheet,
            selections: HashMap::new(),
            calculations: Vec::new(),
        };
        session.recompute_all();
        session
    }

    /// Swap in a new upload; every previous selection is dropped
    pub fn replace_sheet(&mut self, sheet: AttendanceSheet) {
        info!(
            "Replacing sheet ({} employees) with new upload ({} employees)",
            self.sheet.employees.len(),
            sheet.employees.len()
        );
        self.sheet = sheet;
        self.selections.clear();
        self.recompute_all();
    }

    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }

    pub fn sheet(&self) -> &AttendanceSheet {
        &self.sheet
    }

    pub fn employees(&self) -> &[Employee] {
        &self.sheet.employees
    }

    fn index_of(&self, employee_id: u32) -> PaysheetResult<usize> {
        self.sheet
            .employees
            .iter()
            .position(|e| e.id == employee_id)
            .ok_or(PaysheetError::UnknownEmployee(employee_id))
    }

    pub fn employee(&self, employee_id: u32) -> PaysheetResult<&Employee> {
        let idx = self.index_of(employee_id)?;
        Ok(&self.sheet.employees[idx])
    }

    pub fn calculation(&self, employee_id: u32) -> PaysheetResult<&SalaryCalculation> {
        let idx = self.index_of(employee_id)?;
        Ok(&self.calculations[idx])
    }

    pub fn selected_days(&self, employee_id: u32) -> &[u32] {
        self.selections
            .get(&employee_id)
            .map(|days| days.as_slice())
            .unwrap_or(&[])
    }

    /// Days that may carry a buffer (Present with a deficit)
    pub fn eligible_days(&self, employee_id: u32) -> PaysheetResult<Vec<u32>> {
        let employee = self.employee(employee_id)?;
        Ok(employee
            .days
            .values()
            .filter(|d| d.is_buffer_eligible())
            .map(|d| d.day)
            .collect())
    }

    /// Whether toggling `day` would be accepted
    pub fn can_select(&self, employee_id: u32, day: u32) -> bool {
        let selected = self.selected_days(employee_id);
        if selected.contains(&day) {
            return true;
        }
        let eligible = self
            .employee(employee_id)
            .ok()
            .and_then(|e| e.day(day))
            .is_some_and(|d| d.is_buffer_eligible());
        eligible && selected.len() < self.policy.max_buffer_days
    }

    /// Select or deselect one buffer day. Returns whether the day is now selected.
    pub fn toggle_buffer_day(&mut self, employee_id: u32, day: u32) -> PaysheetResult<bool> {
        let idx = self.index_of(employee_id)?;
        let selected = self.selections.entry(employee_id).or_default();

        let now_selected = if let Some(pos) = selected.iter().position(|&d| d == day) {
            selected.remove(pos);
            false
        } else {
            let eligible = self.sheet.employees[idx]
                .day(day)
                .is_some_and(|d| d.is_buffer_eligible());
            if !eligible {
                return Err(PaysheetError::IneligibleBufferDay { employee_id, day });
            }
            if selected.len() >= self.policy.max_buffer_days {
                return Err(PaysheetError::BufferCapReached {
                    employee_id,
                    max: self.policy.max_buffer_days,
                });
            }
            selected.push(day);
            true
        };

        self.recompute(idx);
        Ok(now_selected)
    }

    /// Replace an employee's whole selection; nothing changes on error
    pub fn set_buffer_days(&mut self, employee_id: u32, days: &[u32]) -> PaysheetResult<()> {
        let idx = self.index_of(employee_id)?;

        let mut unique: Vec<u32> = Vec::with_capacity(days.len());
        for &day in days {
            if !unique.contains(&day) {
                unique.push(day);
            }
        }

        if unique.len() > self.policy.max_buffer_days {
            return Err(PaysheetError::BufferCapReached {
                employee_id,
                max: self.policy.max_buffer_days,
            });
        }
        let employee = &self.sheet.employees[idx];
        if let Some(&day) = unique
            .iter()
            .find(|&&d| !employee.day(d).is_some_and(|a| a.is_buffer_eligible()))
        {
            return Err(PaysheetError::IneligibleBufferDay { employee_id, day });
        }

        self.selections.insert(employee_id, unique);
        self.recompute(idx);
        Ok(())
    }

    pub fn clear_buffer_days(&mut self, employee_id: u32) -> PaysheetResult<()> {
        let idx = self.index_of(employee_id)?;
        self.selections.remove(&employee_id);
        self.recompute(idx);
        Ok(())
    }

    fn selection_for(&self, idx: usize) -> &[u32] {
        let employee = &self.sheet.employees[idx];
        // Only the first employee carrying an id owns its selection
        match self.index_of(employee.id) {
            Ok(first) if first == idx => self.selected_days(employee.id),
            _ => &[],
        }
    }

    fn recompute(&mut self, idx: usize) {
        let calc = compute_salary(
            &self.sheet.employees[idx],
            self.selection_for(idx),
            &self.policy,
        );
        debug!(
            "Recomputed employee {}: buffer {} min, final salary {:.2}",
            self.sheet.employees[idx].id, calc.buffer_applied, calc.final_salary
        );
        self.calculations[idx] = calc;
    }

    fn recompute_all(&mut self) {
        self.calculations = vec![SalaryCalculation::default(); self.sheet.employees.len()];
        for idx in 0..self.sheet.employees.len() {
            self.recompute(idx);
        }
    }

    pub fn report(&self, employee_id: u32) -> PaysheetResult<EmployeeReport> {
        let idx = self.index_of(employee_id)?;
        Ok(EmployeeReport::build(
            &self.sheet.employees[idx],
            &self.calculations[idx],
            self.sheet.period.as_ref(),
        ))
    }

    /// Reports for every employee, in sheet order
    pub fn reports(&self) -> Vec<EmployeeReport> {
        self.sheet
            .employees
            .iter()
            .zip(&self.calculations)
            .map(|(e, c)| EmployeeReport::build(e, c, self.sheet.period.as_ref()))
            .collect()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            period: self.sheet.period,
            days_in_month: self.sheet.days_in_month,
            employee_count: self.sheet.employees.len(),
            total_base_salary: self.sheet.employees.iter().map(|e| e.base_salary).sum(),
            total_deduction: self.calculations.iter().map(|c| c.deduction).sum(),
            total_final_salary: self.calculations.iter().map(|c| c.final_salary).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DayAttendance, DayStatus};

    fn late_day(day: u32, deficit: u32) -> DayAttendance {
        let mut d = DayAttendance::new(day, Some("10:00".into()), Some("18:30".into()), DayStatus::Present);
        d.deficit_minutes = deficit;
        d.late_by = deficit;
        d.is_late = deficit > 0;
        d
    }

    fn sheet() -> AttendanceSheet {
        let mut e = Employee::new(1, "Asha".into(), "Sales".into(), 30000.0);
        for day in 1..=5 {
            e.days.insert(day, late_day(day, 20));
        }
        e.days.insert(6, late_day(6, 0));
        let mut other = Employee::new(2, "Ravi".into(), "Ops".into(), 30000.0);
        other.days.insert(1, late_day(1, 30));
        AttendanceSheet {
            days_in_month: 6,
            period: None,
            employees: vec![e, other],
        }
    }

    #[test]
    fn test_toggle_on_and_off() {
        let mut session = PayrollSession::new(sheet(), PayrollPolicy::default());
        assert!(session.toggle_buffer_day(1, 2).unwrap());
        assert_eq!(session.selected_days(1), &[2]);
        assert_eq!(session.calculation(1).unwrap().buffer_applied, 15);

        assert!(!session.toggle_buffer_day(1, 2).unwrap());
        assert!(session.selected_days(1).is_empty());
        assert_eq!(session.calculation(1).unwrap().buffer_applied, 0);
    }

    #[test]
    fn test_cap_rejects_fourth_day() {
        let mut session = PayrollSession::new(sheet(), PayrollPolicy::default());
        for day in 1..=3 {
            session.toggle_buffer_day(1, day).unwrap();
        }
        assert!(!session.can_select(1, 4));
        let err = session.toggle_buffer_day(1, 4).unwrap_err();
        assert!(matches!(err, PaysheetError::BufferCapReached { employee_id: 1, max: 3 }));
        assert_eq!(session.calculation(1).unwrap().buffer_applied, 45);

        // Already-selected days can still be toggled off
        assert!(session.can_select(1, 3));
        assert!(!session.toggle_buffer_day(1, 3).unwrap());
        assert!(session.toggle_buffer_day(1, 4).unwrap());
    }

    #[test]
    fn test_ineligible_day_rejected() {
        let mut session = PayrollSession::new(sheet(), PayrollPolicy::default());
        let err = session.toggle_buffer_day(1, 6).unwrap_err();
        assert!(matches!(err, PaysheetError::IneligibleBufferDay { employee_id: 1, day: 6 }));
        assert!(session.toggle_buffer_day(1, 30).is_err());
        assert!(session.selected_days(1).is_empty());
    }

    #[test]
    fn test_unknown_employee() {
        let mut session = PayrollSession::new(sheet(), PayrollPolicy::default());
        assert!(matches!(
            session.toggle_buffer_day(99, 1),
            Err(PaysheetError::UnknownEmployee(99))
        ));
        assert!(!session.can_select(99, 1));
    }

    #[test]
    fn test_selection_only_recomputes_that_employee() {
        let mut session = PayrollSession::new(sheet(), PayrollPolicy::default());
        let before = session.calculation(2).unwrap().clone();
        session.toggle_buffer_day(1, 1).unwrap();
        assert_eq!(session.calculation(2).unwrap(), &before);
    }

    #[test]
    fn test_set_buffer_days_is_all_or_nothing() {
        let mut session = PayrollSession::new(sheet(), PayrollPolicy::default());
        session.set_buffer_days(1, &[1, 2]).unwrap();
        assert!(session.set_buffer_days(1, &[1, 2, 3, 4]).is_err());
        assert!(session.set_buffer_days(1, &[1, 6]).is_err());
        assert_eq!(session.selected_days(1), &[1, 2]);

        // duplicates collapse
        session.set_buffer_days(1, &[3, 3, 3]).unwrap();
        assert_eq!(session.selected_days(1), &[3]);
    }

    #[test]
    fn test_replace_sheet_drops_selections() {
        let mut session = PayrollSession::new(sheet(), PayrollPolicy::default());
        session.toggle_buffer_day(1, 1).unwrap();
        session.replace_sheet(sheet());
        assert!(session.selected_days(1).is_empty());
        assert_eq!(session.calculation(1).unwrap().buffer_applied, 0);
    }

    #[test]
    fn test_eligible_days() {
        let session = PayrollSession::new(sheet(), PayrollPolicy::default());
        assert_eq!(session.eligible_days(1).unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_summary_totals() {
        let session = PayrollSession::new(sheet(), PayrollPolicy::default());
        let summary = session.summary();
        assert_eq!(summary.employee_count, 2);
        assert_eq!(summary.total_base_salary, 60000.0);
        assert_eq!(
            summary.total_final_salary,
            summary.total_base_salary - summary.total_deduction
        );
    }
}
