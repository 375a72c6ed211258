//! Payroll policy and sheet layout configuration
//!
//! Both sections are optional in a YAML file; anything left out falls back to
//! the office defaults (10:00-18:30, 510 expected minutes, 15-minute buffer on
//! at most 3 days).
//!
//! ```yaml
//! policy:
//!   office_start_hour: 10
//!   office_end_hour: 18
//!   office_end_minute: 30
//! layout:
//!   name_column: "Employee Name"
//! ```

use crate::error::{PaysheetError, PaysheetResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const OFFICE_START_HOUR: u32 = 10;
pub const OFFICE_END_HOUR: u32 = 18;
pub const OFFICE_END_MINUTE: u32 = 30;
pub const EXPECTED_WORK_MINUTES: u32 = 510;
pub const BUFFER_MINUTES: u32 = 15;
pub const MAX_BUFFER_DAYS: usize = 3;

/// Office hours and grace rules applied to every employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollPolicy {
    pub office_start_hour: u32,
    pub office_start_minute: u32,
    pub office_end_hour: u32,
    pub office_end_minute: u32,
    pub expected_work_minutes: u32,
    pub buffer_minutes: u32,
    pub max_buffer_days: usize,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            office_start_hour: OFFICE_START_HOUR,
            office_start_minute: 0,
            office_end_hour: OFFICE_END_HOUR,
            office_end_minute: OFFICE_END_MINUTE,
            expected_work_minutes: EXPECTED_WORK_MINUTES,
            buffer_minutes: BUFFER_MINUTES,
            max_buffer_days: MAX_BUFFER_DAYS,
        }
    }
}

impl PayrollPolicy {
    /// Expected punch-in, minutes since midnight
    pub fn expected_in(&self) -> u32 {
        self.office_start_hour * 60 + self.office_start_minute
    }

    /// Expected punch-out, minutes since midnight
    pub fn expected_out(&self) -> u32 {
        self.office_end_hour * 60 + self.office_end_minute
    }

    pub fn validate(&self) -> PaysheetResult<()> {
        if self.office_start_hour >= 24 || self.office_end_hour >= 24 {
            return Err(PaysheetError::Validation(format!(
                "Office hours must be below 24 (start {}, end {})",
                self.office_start_hour, self.office_end_hour
            )));
        }
        if self.office_start_minute >= 60 || self.office_end_minute >= 60 {
            return Err(PaysheetError::Validation(format!(
                "Office minutes must be below 60 (start {}, end {})",
                self.office_start_minute, self.office_end_minute
            )));
        }
        if self.expected_out() <= self.expected_in() {
            return Err(PaysheetError::Validation(format!(
                "Office end {:02}:{:02} must be after start {:02}:{:02}",
                self.office_end_hour,
                self.office_end_minute,
                self.office_start_hour,
                self.office_start_minute
            )));
        }
        if self.expected_work_minutes == 0 {
            return Err(PaysheetError::Validation(
                "expected_work_minutes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Header names used to locate the fixed columns of an attendance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Accepted names for the sequence-number column
    pub id_columns: Vec<String>,
    pub name_column: String,
    pub department_column: String,
    pub salary_column: String,
    pub marker_column: String,
    /// Marker cell value identifying an out-time row
    pub out_marker: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            id_columns: ["S.No", "S. No.", "Sr. No.", "Sr No", "SNo", "ID", "Emp ID"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            name_column: "Employee Name".to_string(),
            department_column: "Department".to_string(),
            salary_column: "Salary".to_string(),
            marker_column: "In/Out Time".to_string(),
            out_marker: "Out Time".to_string(),
        }
    }
}

/// Whole config file: `policy:` and `layout:` sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaysheetConfig {
    pub policy: PayrollPolicy,
    pub layout: SheetLayout,
}

impl PaysheetConfig {
    /// Load and validate a YAML config file
    pub fn load(path: &Path) -> PaysheetResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> PaysheetResult<Self> {
        let config: PaysheetConfig = serde_yaml::from_str(content)?;
        config.policy.validate()?;
        Ok(config)
    }

    /// Load `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> PaysheetResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
