//! Payroll session tests: buffer selection, cap and recomputation

mod common;

use common::{standard_workbook, write_attendance, Cell, Row};
use paysheet::config::{PaysheetConfig, PayrollPolicy};
use paysheet::core::PayrollSession;
use paysheet::error::PaysheetError;
use paysheet::excel::load_attendance;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn standard_session() -> PayrollSession {
    let dir = TempDir::new().unwrap();
    let config = PaysheetConfig::default();
    let sheet = load_attendance(standard_workbook(&dir), &config).unwrap();
    PayrollSession::new(sheet, config.policy)
}

// ═══════════════════════════════════════════════════════════════════════════
// SELECTION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_initial_calculations_have_no_buffer() {
    let session = standard_session();
    assert_eq!(session.employees().len(), 3);
    for employee in session.employees() {
        assert!(session.selected_days(employee.id).is_empty());
        assert_eq!(session.calculation(employee.id).unwrap().buffer_applied, 0);
    }
}

#[test]
fn test_eligible_days() {
    let session = standard_session();
    assert_eq!(session.eligible_days(1).unwrap(), vec![1, 2, 3, 4]);
    // absent days never qualify
    assert!(session.eligible_days(2).unwrap().is_empty());
    assert!(session.eligible_days(3).unwrap().is_empty());
}

#[test]
fn test_toggle_on_and_off() {
    let mut session = standard_session();

    assert!(session.toggle_buffer_day(1, 4).unwrap());
    assert_eq!(session.selected_days(1), &[4]);
    assert_eq!(session.calculation(1).unwrap().final_salary, 30788.0);

    assert!(!session.toggle_buffer_day(1, 4).unwrap());
    assert!(session.selected_days(1).is_empty());
    assert_eq!(session.calculation(1).unwrap().final_salary, 30758.0);
}

#[test]
fn test_cap_blocks_fourth_day() {
    let mut session = standard_session();
    for day in [1, 2, 3] {
        assert!(session.toggle_buffer_day(1, day).unwrap());
    }
    assert!(!session.can_select(1, 4));
    // already-selected days stay toggleable
    assert!(session.can_select(1, 2));

    let err = session.toggle_buffer_day(1, 4).unwrap_err();
    assert!(matches!(
        err,
        PaysheetError::BufferCapReached {
            employee_id: 1,
            max: 3
        }
    ));
    assert_eq!(session.selected_days(1), &[1, 2, 3]);
    assert_eq!(session.calculation(1).unwrap().buffer_applied, 45);

    // freeing a slot makes room again
    session.toggle_buffer_day(1, 2).unwrap();
    assert!(session.toggle_buffer_day(1, 4).unwrap());
    assert_eq!(session.selected_days(1), &[1, 3, 4]);
}

#[test]
fn test_ineligible_day_rejected() {
    let mut session = standard_session();

    for (employee_id, day) in [(1, 5), (1, 7), (2, 3), (3, 1), (1, 31)] {
        let err = session.toggle_buffer_day(employee_id, day).unwrap_err();
        assert!(
            matches!(err, PaysheetError::IneligibleBufferDay { .. }),
            "employee {} day {}",
            employee_id,
            day
        );
        assert!(!session.can_select(employee_id, day));
    }
}

#[test]
fn test_unknown_employee() {
    let mut session = standard_session();
    assert!(matches!(
        session.toggle_buffer_day(99, 1),
        Err(PaysheetError::UnknownEmployee(99))
    ));
    assert!(matches!(session.report(99), Err(PaysheetError::UnknownEmployee(99))));
    assert!(!session.can_select(99, 1));
}

#[test]
fn test_only_changed_employee_is_recomputed() {
    let mut session = standard_session();
    let before_ravi = session.calculation(2).unwrap().clone();
    let before_meena = session.calculation(3).unwrap().clone();

    session.toggle_buffer_day(1, 1).unwrap();

    assert_eq!(session.calculation(2).unwrap(), &before_ravi);
    assert_eq!(session.calculation(3).unwrap(), &before_meena);
}

#[test]
fn test_set_buffer_days_is_all_or_nothing() {
    let mut session = standard_session();
    session.set_buffer_days(1, &[1]).unwrap();

    // one ineligible day rejects the whole set
    assert!(session.set_buffer_days(1, &[2, 5]).is_err());
    assert_eq!(session.selected_days(1), &[1]);

    assert!(matches!(
        session.set_buffer_days(1, &[1, 2, 3, 4]),
        Err(PaysheetError::BufferCapReached { .. })
    ));
    assert_eq!(session.selected_days(1), &[1]);

    // duplicates collapse before the cap check
    session.set_buffer_days(1, &[2, 2, 3, 4]).unwrap();
    assert_eq!(session.selected_days(1), &[2, 3, 4]);
    assert_eq!(session.calculation(1).unwrap().buffer_applied, 45);

    session.clear_buffer_days(1).unwrap();
    assert!(session.selected_days(1).is_empty());
    assert_eq!(session.calculation(1).unwrap().final_deficit, 120);
}

// ═══════════════════════════════════════════════════════════════════════════
// UPLOAD REPLACEMENT, SUMMARY AND REPORTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_replace_sheet_drops_selections() {
    let mut session = standard_session();
    session.toggle_buffer_day(1, 2).unwrap();

    let dir = TempDir::new().unwrap();
    let path = write_attendance(&dir, "Attendance_Feb_2025.xlsx", &common::asha_rows());
    let sheet = load_attendance(&path, &PaysheetConfig::default()).unwrap();
    session.replace_sheet(sheet);

    assert_eq!(session.employees().len(), 1);
    assert!(session.selected_days(1).is_empty());
    assert_eq!(session.calculation(1).unwrap().buffer_applied, 0);
    assert_eq!(session.summary().period.and_then(|p| p.month), Some(2));
}

#[test]
fn test_summary_totals() {
    let mut session = standard_session();
    session.toggle_buffer_day(1, 4).unwrap();

    let summary = session.summary();
    assert_eq!(summary.employee_count, 3);
    assert_eq!(summary.days_in_month, 30);
    assert_eq!(summary.total_base_salary, 86000.0);
    assert_eq!(summary.total_deduction, 212.0 + 24939.0);
    assert_eq!(summary.total_final_salary, 30788.0 + 61.0 + 30000.0);
}

#[test]
fn test_report_marks_buffered_days() {
    let mut session = standard_session();
    session.toggle_buffer_day(1, 3).unwrap();

    let report = session.report(1).unwrap();
    assert_eq!(report.days.len(), 30);
    assert_eq!(report.days[2].date, "03-Jan-2025");
    let buffered: Vec<u32> = report
        .days
        .iter()
        .filter(|d| d.buffer_applied)
        .map(|d| d.day)
        .collect();
    assert_eq!(buffered, vec![3]);
}

#[test]
fn test_duplicate_ids_first_row_owns_selection() {
    let dir = TempDir::new().unwrap();
    let mut first = Row::in_row(5.0, "Asha", "Sales", Cell::Number(31000.0));
    first.set(1, Cell::Text("10:20"));
    let mut second = Row::in_row(5.0, "Asha B", "Sales", Cell::Number(31000.0));
    second.set(1, Cell::Text("10:40"));
    let rows = vec![first, Row::out_row(), second, Row::out_row()];

    let path = write_attendance(&dir, "attendance.xlsx", &rows);
    let config = PaysheetConfig::default();
    let sheet = load_attendance(&path, &config).unwrap();
    let mut session = PayrollSession::new(sheet, config.policy);

    session.toggle_buffer_day(5, 1).unwrap();
    let reports = session.reports();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].calculation.buffer_applied, 15);
    assert_eq!(reports[1].calculation.buffer_applied, 0);
}

#[test]
fn test_custom_cap() {
    let dir = TempDir::new().unwrap();
    let sheet = load_attendance(standard_workbook(&dir), &PaysheetConfig::default()).unwrap();
    let policy = PayrollPolicy {
        max_buffer_days: 1,
        ..PayrollPolicy::default()
    };
    let mut session = PayrollSession::new(sheet, policy);

    session.toggle_buffer_day(1, 1).unwrap();
    assert!(matches!(
        session.toggle_buffer_day(1, 2),
        Err(PaysheetError::BufferCapReached { max: 1, .. })
    ));
}
