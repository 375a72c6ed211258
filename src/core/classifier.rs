//! Day classifier and deficit calculator
//!
//! Finalizes each day's status and computes how many scheduled minutes were
//! lost to late arrival and early departure. Classification never fails:
//! missing or unreadable punches become a full-day absence.

use crate::config::PayrollPolicy;
use crate::types::{AttendanceSheet, DayAttendance, DayStatus, Employee};

/// Parse "HH:MM" into minutes since midnight.
/// Anything other than exactly two numeric components within 00:00..=23:59
/// is rejected.
pub fn parse_clock(value: &str) -> Option<u32> {
    let mut parts = value.split(':');
    let hours = parts.next()?.trim().parse::<u32>().ok()?;
    let minutes = parts.next()?.trim().parse::<u32>().ok()?;
    if parts.next().is_some() || hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

fn mark_absent(day: &mut DayAttendance, policy: &PayrollPolicy) {
    day.status = DayStatus::Absent;
    day.deficit_minutes = policy.expected_work_minutes;
}

/// Classify one day in place
pub fn classify_day(day: &mut DayAttendance, policy: &PayrollPolicy) {
    day.deficit_minutes = 0;
    day.is_late = false;
    day.late_by = 0;
    day.is_early = false;
    day.early_by = 0;

    if day.status.is_exempt() {
        return;
    }

    let (in_minutes, out_minutes) = match (day.in_time.as_deref(), day.out_time.as_deref()) {
        (Some(in_time), Some(out_time)) => (parse_clock(in_time), parse_clock(out_time)),
        _ => {
            mark_absent(day, policy);
            return;
        }
    };

    let (Some(in_minutes), Some(out_minutes)) = (in_minutes, out_minutes) else {
        mark_absent(day, policy);
        return;
    };

    let expected_in = policy.expected_in();
    let expected_out = policy.expected_out();

    day.status = DayStatus::Present;
    day.is_late = in_minutes > expected_in;
    day.late_by = in_minutes.saturating_sub(expected_in);
    day.is_early = out_minutes < expected_out;
    day.early_by = expected_out.saturating_sub(out_minutes);
    day.deficit_minutes = day.late_by.saturating_add(day.early_by);
}

pub fn classify_employee(employee: &mut Employee, policy: &PayrollPolicy) {
    for day in employee.days.values_mut() {
        classify_day(day, policy);
    }
}

/// Classify every employee of a freshly ingested sheet
pub fn classify_sheet(mut sheet: AttendanceSheet, policy: &PayrollPolicy) -> AttendanceSheet {
    for employee in &mut sheet.employees {
        classify_employee(employee, policy);
    }
    sheet
}
