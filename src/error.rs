use thiserror::Error;

pub type PaysheetResult<T> = Result<T, PaysheetError>;

#[derive(Error, Debug)]
pub enum PaysheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Employee {0} not found in the uploaded sheet")]
    UnknownEmployee(u32),

    #[error("Session {0} not found")]
    UnknownSession(String),

    #[error("Employee {employee_id} already has {max} buffer days selected")]
    BufferCapReached { employee_id: u32, max: usize },

    #[error("Day {day} of employee {employee_id} is not eligible for buffer (needs Present with a deficit)")]
    IneligibleBufferDay { employee_id: u32, day: u32 },
}
