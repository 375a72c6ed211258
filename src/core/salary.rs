//! Buffer and salary calculator
//!
//! [`compute_salary`] is a pure function of one employee's classified days,
//! the days nominated for buffer, and the policy. It does not enforce the
//! nomination cap; the session does that when days are selected.

use crate::config::PayrollPolicy;
use crate::types::{DayStatus, Employee, SalaryCalculation};

/// Truncate (not round) to two decimals
fn floor_cents(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}

/// Minutes of buffer credited for one nominated day
pub fn buffer_credit(employee: &Employee, day: u32, policy: &PayrollPolicy) -> u32 {
    match employee.day(day) {
        Some(d) if d.is_buffer_eligible() => d.deficit_minutes.min(policy.buffer_minutes),
        _ => 0,
    }
}

/// Per-minute deduction rate: base / days / expected minutes, truncated to cents
pub fn per_minute_rate(base_salary: f64, total_days: u32, policy: &PayrollPolicy) -> f64 {
    let total_days = total_days.max(1);
    let expected = policy.expected_work_minutes.max(1);
    let daily_salary = base_salary / total_days as f64;
    floor_cents(daily_salary / expected as f64)
}

pub fn compute_salary(
    employee: &Employee,
    buffer_days: &[u32],
    policy: &PayrollPolicy,
) -> SalaryCalculation {
    let mut calc = SalaryCalculation {
        total_days: employee.total_days(),
        days_with_buffer: buffer_days.to_vec(),
        ..SalaryCalculation::default()
    };

    for day in employee.days.values() {
        match day.status {
            DayStatus::Present => calc.present_days += 1,
            DayStatus::Absent => calc.absent_days += 1,
            DayStatus::Wfh => calc.wfh_days += 1,
            DayStatus::WeekOff => calc.week_off_days += 1,
            DayStatus::Cl => calc.cl_days += 1,
            DayStatus::Holiday => calc.holiday_days += 1,
        }
        calc.total_deficit_minutes = calc
            .total_deficit_minutes
            .saturating_add(day.deficit_minutes);
    }
    // Holidays stay in the working-day count
    calc.working_days = calc.total_days - calc.week_off_days;

    calc.buffer_applied = buffer_days
        .iter()
        .map(|&day| buffer_credit(employee, day, policy))
        .fold(0, u32::saturating_add);

    calc.final_deficit = calc.total_deficit_minutes.saturating_sub(calc.buffer_applied);
    calc.per_minute_rate = per_minute_rate(employee.base_salary, calc.total_days, policy);
    calc.deduction = (calc.final_deficit as f64 * calc.per_minute_rate).round();
    calc.final_salary = employee.base_salary - calc.deduction;

    calc
}
