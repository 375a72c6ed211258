//! Time-cell normalization
//!
//! Every in/out cell of the sheet goes through [`CellReader::read`], which
//! turns it into a clock time, a status token, a blank, or a verbatim value.

use crate::error::{PaysheetError, PaysheetResult};
use crate::types::{CellValue, DayStatus};
use regex::Regex;

/// Which punch a cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punch {
    In,
    Out,
}

/// Interpretation of one time cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellReading {
    /// Nothing recorded
    Blank,
    /// Normalized 24-hour "HH:MM"
    Time(String),
    /// A status token such as "WFH" or "Holiday"
    Status(DayStatus),
    /// Unrecognized content, kept as written
    Raw(String),
}

impl CellReading {
    /// The value stored as the day's in/out time
    pub fn time_value(&self) -> Option<String> {
        match self {
            CellReading::Time(t) | CellReading::Raw(t) => Some(t.clone()),
            CellReading::Blank | CellReading::Status(_) => None,
        }
    }

    pub fn status(&self) -> Option<DayStatus> {
        match self {
            CellReading::Status(s) => Some(*s),
            _ => None,
        }
    }
}

/// Map free text onto a status, if it names one.
///
/// All status sniffing goes through here.
pub fn status_token(text: &str) -> Option<DayStatus> {
    let lower = text.trim().to_lowercase();
    if lower.contains("week off") {
        Some(DayStatus::WeekOff)
    } else if lower.contains("wfh") || lower.contains("work from home") {
        Some(DayStatus::Wfh)
    } else if lower == "cl" || lower.contains("casual leave") {
        Some(DayStatus::Cl)
    } else if lower.contains("holiday") {
        Some(DayStatus::Holiday)
    } else {
        None
    }
}

/// Format a clock time, reading a morning hour on an out punch as afternoon
pub fn format_clock(hour: u32, minute: u32, punch: Punch) -> String {
    let hour = if punch == Punch::Out && (1..12).contains(&hour) {
        hour + 12
    } else {
        hour
    };
    format!("{:02}:{:02}", hour, minute)
}

/// Cell interpreter holding the compiled time pattern
pub struct CellReader {
    time_pattern: Regex,
}

impl CellReader {
    pub fn new() -> PaysheetResult<Self> {
        let time_pattern = Regex::new(r"^(\d{1,2}):(\d{2})(?::\d{2})?$")
            .map_err(|e| PaysheetError::Import(format!("Regex error: {}", e)))?;
        Ok(Self { time_pattern })
    }

    /// Interpret one in/out cell
    pub fn read(&self, cell: &CellValue, punch: Punch) -> CellReading {
        if cell.is_blank() {
            return CellReading::Blank;
        }

        match cell {
            CellValue::Text(text) if text.trim().eq_ignore_ascii_case("week off") => {
                CellReading::Status(DayStatus::WeekOff)
            }
            CellValue::Time { hour, minute } => {
                CellReading::Time(format_clock(*hour, *minute, punch))
            }
            CellValue::Text(text) => self.read_text(text, punch),
            CellValue::Number(n) => read_fractional_hours(*n, punch),
            other => CellReading::Raw(other.as_text()),
        }
    }

    fn read_text(&self, text: &str, punch: Punch) -> CellReading {
        if let Some(status) = status_token(text) {
            return CellReading::Status(status);
        }

        let trimmed = text.trim();
        if let Some(caps) = self.time_pattern.captures(trimmed) {
            let hour = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            let minute = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
            if let (Some(hour), Some(minute)) = (hour, minute) {
                return CellReading::Time(format_clock(hour, minute, punch));
            }
        }

        CellReading::Raw(text.to_string())
    }
}

/// 9.35 → 09:35: integer part is hours, two decimal digits are minutes
fn read_fractional_hours(n: f64, punch: Punch) -> CellReading {
    if !n.is_finite() || n < 0.0 {
        return CellReading::Raw(CellValue::Number(n).as_text());
    }
    let scaled = (n * 100.0).round() as u64;
    let hour = u32::try_from(scaled / 100).unwrap_or(u32::MAX);
    let minute = (scaled % 100) as u32;
    CellReading::Time(format_clock(hour, minute, punch))
}
