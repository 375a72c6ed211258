//! Month/year hints carried by attendance file names
//! (`Attendance_Jan_2025.xlsx` → January 2025). Display only.

use chrono::Month;
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    /// 1-12
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl ReportPeriod {
    /// Detect month and year tokens in a file name; `None` when neither is present
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);

        let mut month = None;
        let mut year = None;

        for token in stem.split(['_', '-', ' ', '.']).filter(|t| !t.is_empty()) {
            if month.is_none() {
                if let Ok(m) = token.parse::<Month>() {
                    month = Some(m.number_from_month());
                    continue;
                }
            }
            if year.is_none() && token.len() == 4 {
                if let Ok(y) = token.parse::<i32>() {
                    if (1900..=2100).contains(&y) {
                        year = Some(y);
                    }
                }
            }
        }

        if month.is_none() && year.is_none() {
            None
        } else {
            Some(Self { month, year })
        }
    }

    pub fn month_name(&self) -> Option<&'static str> {
        let m = self.month?;
        let month = Month::try_from(u8::try_from(m).ok()?).ok()?;
        Some(month.name())
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month_name(), self.year) {
            (Some(m), Some(y)) => write!(f, "{} {}", m, y),
            (Some(m), None) => write!(f, "{}", m),
            (None, Some(y)) => write!(f, "{}", y),
            (None, None) => Ok(()),
        }
    }
}
