use crate::config::PaysheetConfig;
use crate::core::PayrollSession;
use crate::error::{PaysheetError, PaysheetResult};
use crate::excel::{load_attendance, ReportExporter};
use crate::types::DayStatus;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Format an amount with two decimals and thousands separators
fn format_money(n: f64) -> String {
    let rounded = format!("{:.2}", n.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if n < 0.0 && rounded != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Parse a `--buffer` argument: `EMPLOYEE_ID:DAY[,DAY...]`
fn parse_buffer_arg(arg: &str) -> PaysheetResult<(u32, Vec<u32>)> {
    let invalid = || {
        PaysheetError::Validation(format!(
            "Invalid buffer '{}'. Expected: EMPLOYEE_ID:DAY[,DAY...] (e.g., 3:4,11)",
            arg
        ))
    };

    let (id, days) = arg.split_once(':').ok_or_else(invalid)?;
    let employee_id = id.trim().parse::<u32>().map_err(|_| invalid())?;
    let days = days
        .split(',')
        .filter(|d| !d.trim().is_empty())
        .map(|d| d.trim().parse::<u32>().map_err(|_| invalid()))
        .collect::<PaysheetResult<Vec<u32>>>()?;

    if days.is_empty() {
        return Err(invalid());
    }
    Ok((employee_id, days))
}

/// Load a workbook into a session and apply `--buffer` selections
fn open_session(
    file: &Path,
    config: Option<&Path>,
    buffers: &[String],
    verbose: bool,
) -> PaysheetResult<PayrollSession> {
    let config = PaysheetConfig::load_or_default(config)?;

    if verbose {
        println!("{}", "📖 Reading attendance workbook...".cyan());
    }
    let sheet = load_attendance(file, &config)?;

    if verbose {
        println!(
            "   Found {} employees over {} days",
            sheet.employees.len(),
            sheet.days_in_month
        );
        if let Some(period) = &sheet.period {
            println!("   Period: {}", period.to_string().bright_yellow());
        }
        println!();
    }

    let mut session = PayrollSession::new(sheet, config.policy);

    let mut selections: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for arg in buffers {
        let (employee_id, days) = parse_buffer_arg(arg)?;
        selections.entry(employee_id).or_default().extend(days);
    }
    for (employee_id, days) in &selections {
        session.set_buffer_days(*employee_id, days)?;
        if verbose {
            println!(
                "   🛟 Buffer for employee {}: days {:?}",
                employee_id.to_string().bright_blue(),
                session.selected_days(*employee_id)
            );
        }
    }

    Ok(session)
}

/// Execute the calculate command
pub fn calculate(
    file: PathBuf,
    config: Option<PathBuf>,
    buffers: Vec<String>,
    verbose: bool,
) -> PaysheetResult<()> {
    println!("{}", "💰 Paysheet - Salary Calculation".bold().green());
    println!("   File: {}\n", file.display());

    let session = open_session(&file, config.as_deref(), &buffers, verbose)?;

    if session.employees().is_empty() {
        println!("{}", "⚠️  No employees found in the sheet".yellow());
        return Ok(());
    }

    println!("{}", "✅ Salary Results:".bold().green());
    println!("{}", "─".repeat(110));
    println!(
        "{:<5} {:<22} {:<14} {:>8} {:>8} {:>8} {:>10} {:>8} {:>12} {:>14}",
        "ID".bold(),
        "Name".bold(),
        "Department".bold(),
        "Present".bold(),
        "Absent".bold(),
        "Working".bold(),
        "Deficit".bold(),
        "Buffer".bold(),
        "Deduction".bold(),
        "Final Salary".bold()
    );
    println!("{}", "─".repeat(110));

    for report in session.reports() {
        let calc = &report.calculation;
        println!(
            "{:<5} {:<22} {:<14} {:>8} {:>8} {:>8} {:>10} {:>8} {:>12} {:>14}",
            report.id.to_string().bright_blue(),
            report.name,
            report.department,
            calc.present_days,
            calc.absent_days,
            calc.working_days,
            calc.final_deficit,
            calc.buffer_applied,
            format_money(calc.deduction).red(),
            format_money(calc.final_salary).green()
        );
    }

    let summary = session.summary();
    println!("{}", "─".repeat(110));
    println!(
        "   Total payable: {} (deductions {})",
        format_money(summary.total_final_salary).bold().green(),
        format_money(summary.total_deduction).red()
    );
    println!();

    Ok(())
}

/// Execute the detail command - per-day breakdown for one employee
pub fn detail(
    file: PathBuf,
    employee_id: u32,
    config: Option<PathBuf>,
    buffers: Vec<String>,
) -> PaysheetResult<()> {
    println!("{}", "🔍 Paysheet - Attendance Detail".bold().green());
    println!("   File: {}", file.display());

    let session = open_session(&file, config.as_deref(), &buffers, false)?;
    let report = session.report(employee_id)?;
    let calc = &report.calculation;

    println!(
        "   Employee: {} ({}, {})\n",
        report.name.bright_blue().bold(),
        report.id,
        report.department
    );

    println!(
        "{:<14} {:<10} {:>8} {:>8} {:>8} {:>8}",
        "Date".bold(),
        "Status".bold(),
        "In".bold(),
        "Out".bold(),
        "Deficit".bold(),
        "Buffer".bold()
    );
    println!("{}", "─".repeat(62));

    for day in &report.days {
        let status = match day.status {
            DayStatus::Present if day.deficit_minutes > 0 => day.status.label().yellow(),
            DayStatus::Present => day.status.label().green(),
            DayStatus::Absent => day.status.label().red(),
            _ => day.status.label().cyan(),
        };
        let buffer = if day.buffer_applied {
            "✔".green().to_string()
        } else if day.status == DayStatus::Present && day.deficit_minutes > 0 {
            "·".dimmed().to_string()
        } else {
            String::new()
        };
        println!(
            "{:<14} {:<10} {:>8} {:>8} {:>8} {:>8}",
            day.date,
            status,
            day.in_time.as_deref().unwrap_or("-"),
            day.out_time.as_deref().unwrap_or("-"),
            day.deficit_minutes,
            buffer
        );
    }

    println!("{}", "─".repeat(62));
    println!(
        "   Deficit {} min - buffer {} min = {} min",
        calc.total_deficit_minutes, calc.buffer_applied, calc.final_deficit
    );
    println!(
        "   Rate {}/min → deduction {}",
        format_money(calc.per_minute_rate),
        format_money(calc.deduction).red()
    );
    println!(
        "   Base {} → final {}\n",
        format_money(report.base_salary),
        format_money(calc.final_salary).bold().green()
    );

    Ok(())
}

/// Execute the export command
pub fn export(
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    buffers: Vec<String>,
    verbose: bool,
) -> PaysheetResult<()> {
    println!("{}", "💰 Paysheet - Report Export".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let session = open_session(&input, config.as_deref(), &buffers, verbose)?;
    let reports = session.reports();

    if verbose {
        println!("{}", "📊 Writing report...".cyan());
    }

    ReportExporter::new(&reports, session.sheet().period).export(&output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   {} employees written to {}\n", reports.len(), output.display());

    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
