//! API request handlers
//!
//! Every handler answers with the [`ApiResponse`] envelope. Sessions are
//! addressed by the uuid returned from `POST /api/v1/sessions`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, MutexGuard};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::server::AppState;
use crate::config::PaysheetConfig;
use crate::core::{PayrollSession, SessionSummary};
use crate::error::{PaysheetError, PaysheetResult};
use crate::excel::{load_attendance, ReportExporter};
use crate::report::EmployeeReport;
use crate::types::AttendanceSheet;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

fn respond<T: Serialize>(result: PaysheetResult<T>) -> ApiResult<T> {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))),
        Err(e) => {
            warn!("Request failed: {}", e);
            (status_for(&e), Json(ApiResponse::err(e.to_string())))
        }
    }
}

/// HTTP status for a library error
pub fn status_for(error: &PaysheetError) -> StatusCode {
    match error {
        PaysheetError::UnknownSession(_) | PaysheetError::UnknownEmployee(_) => {
            StatusCode::NOT_FOUND
        }
        PaysheetError::BufferCapReached { .. } | PaysheetError::IneligibleBufferDay { .. } => {
            StatusCode::CONFLICT
        }
        PaysheetError::Import(_) | PaysheetError::Validation(_) | PaysheetError::Yaml(_) => {
            StatusCode::BAD_REQUEST
        }
        PaysheetError::Export(_) | PaysheetError::Io(_) | PaysheetError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn parse_session_id(raw: &str) -> PaysheetResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| PaysheetError::UnknownSession(raw.to_string()))
}

fn sessions(state: &AppState) -> MutexGuard<'_, HashMap<Uuid, PayrollSession>> {
    state
        .sessions
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Run `f` against one session
fn with_session<T>(
    state: &AppState,
    raw_id: &str,
    f: impl FnOnce(&mut PayrollSession) -> PaysheetResult<T>,
) -> PaysheetResult<T> {
    let id = parse_session_id(raw_id)?;
    let mut sessions = sessions(state);
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| PaysheetError::UnknownSession(raw_id.to_string()))?;
    f(session)
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Paysheet API Server".to_string(),
        version: state.version.clone(),
        description: "Attendance-to-salary calculation over HTTP".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new("POST", "/api/v1/sessions", "Upload an attendance workbook"),
            EndpointInfo::new("GET", "/api/v1/sessions/:id", "Session summary and salary reports"),
            EndpointInfo::new(
                "GET",
                "/api/v1/sessions/:id/employees/:employee_id",
                "One employee's report with eligible buffer days",
            ),
            EndpointInfo::new("PUT", "/api/v1/sessions/:id/upload", "Replace the session's workbook"),
            EndpointInfo::new("POST", "/api/v1/sessions/:id/buffer", "Toggle a buffer day"),
            EndpointInfo::new("POST", "/api/v1/sessions/:id/export", "Export the report (.xlsx/.json)"),
            EndpointInfo::new("DELETE", "/api/v1/sessions/:id", "End a session"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: usize,
}

/// GET /health - Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        sessions: sessions(&state).len(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "upload".to_string(),
            "buffer".to_string(),
            "export".to_string(),
        ],
    }))
}

/// Workbook upload request
#[derive(Deserialize)]
pub struct UploadRequest {
    pub file_path: String,
}

/// Session state returned after upload, replace and buffer changes
#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub summary: SessionSummary,
    pub reports: Vec<EmployeeReport>,
}

impl SessionResponse {
    fn new(id: &str, session: &PayrollSession) -> Self {
        Self {
            session_id: id.to_string(),
            summary: session.summary(),
            reports: session.reports(),
        }
    }
}

fn load(config: &PaysheetConfig, file_path: &str) -> PaysheetResult<AttendanceSheet> {
    load_attendance(PathBuf::from(file_path), config)
}

/// POST /api/v1/sessions - Upload a workbook into a new session
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> impl IntoResponse {
    let result = load(&state.config, &req.file_path).map(|sheet| {
        let id = Uuid::new_v4();
        let session = PayrollSession::new(sheet, state.config.policy.clone());
        let response = SessionResponse::new(&id.to_string(), &session);
        sessions(&state).insert(id, session);
        info!("Session {} created from {}", id, req.file_path);
        response
    });
    respond(result)
}

/// GET /api/v1/sessions/:id - Summary and all reports
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    respond(with_session(&state, &id, |session| {
        Ok(SessionResponse::new(&id, session))
    }))
}

/// One employee's report plus the buffer picker state
#[derive(Serialize)]
pub struct EmployeeResponse {
    pub report: EmployeeReport,
    pub eligible_days: Vec<u32>,
    pub selected_days: Vec<u32>,
    pub can_select_more: bool,
}

/// GET /api/v1/sessions/:id/employees/:employee_id
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path((id, employee_id)): Path<(String, u32)>,
) -> impl IntoResponse {
    respond(with_session(&state, &id, |session| {
        let report = session.report(employee_id)?;
        let selected_days = session.selected_days(employee_id).to_vec();
        Ok(EmployeeResponse {
            report,
            eligible_days: session.eligible_days(employee_id)?,
            can_select_more: selected_days.len() < session.policy().max_buffer_days,
            selected_days,
        })
    }))
}

/// PUT /api/v1/sessions/:id/upload - Replace the sheet; a failed import keeps the old one
pub async fn replace_upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UploadRequest>,
) -> impl IntoResponse {
    // Check the session before parsing the workbook
    let result = with_session(&state, &id, |_| Ok(()))
        .and_then(|_| load(&state.config, &req.file_path))
        .and_then(|sheet| {
            with_session(&state, &id, |session| {
                session.replace_sheet(sheet);
                Ok(SessionResponse::new(&id, session))
            })
        });
    respond(result)
}

/// Buffer toggle request
#[derive(Deserialize)]
pub struct BufferRequest {
    pub employee_id: u32,
    pub day: u32,
}

/// Buffer toggle response
#[derive(Serialize)]
pub struct BufferResponse {
    pub employee_id: u32,
    pub day: u32,
    pub selected: bool,
    pub selected_days: Vec<u32>,
    pub report: EmployeeReport,
}

/// POST /api/v1/sessions/:id/buffer - Toggle one buffer day
pub async fn toggle_buffer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<BufferRequest>,
) -> impl IntoResponse {
    respond(with_session(&state, &id, |session| {
        let selected = session.toggle_buffer_day(req.employee_id, req.day)?;
        Ok(BufferResponse {
            employee_id: req.employee_id,
            day: req.day,
            selected,
            selected_days: session.selected_days(req.employee_id).to_vec(),
            report: session.report(req.employee_id)?,
        })
    }))
}

/// Export request
#[derive(Deserialize)]
pub struct ExportRequest {
    pub output_path: String,
}

/// Export response
#[derive(Serialize)]
pub struct ExportResponse {
    pub output_path: String,
    pub employees: usize,
}

/// POST /api/v1/sessions/:id/export - Write the report to disk
pub async fn export(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ExportRequest>,
) -> impl IntoResponse {
    let result = with_session(&state, &id, |session| {
        Ok((session.reports(), session.sheet().period))
    })
    .and_then(|(reports, period)| {
        let output = PathBuf::from(&req.output_path);
        ReportExporter::new(&reports, period).export(&output)?;
        info!("Session {} exported to {}", id, req.output_path);
        Ok(ExportResponse {
            output_path: req.output_path.clone(),
            employees: reports.len(),
        })
    });
    respond(result)
}

/// Delete response
#[derive(Serialize)]
pub struct DeleteResponse {
    pub session_id: String,
    pub deleted: bool,
}

/// DELETE /api/v1/sessions/:id - End a session
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let result = parse_session_id(&id).and_then(|uuid| {
        sessions(&state)
            .remove(&uuid)
            .map(|_| DeleteResponse {
                session_id: id.clone(),
                deleted: true,
            })
            .ok_or_else(|| PaysheetError::UnknownSession(id.clone()))
    });
    respond(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_ok_creates_success_response() {
        let response = ApiResponse::ok("test data");
        assert!(response.success);
        assert_eq!(response.data, Some("test data"));
        assert!(response.error.is_none());
        assert!(!response.request_id.is_empty());
    }

    #[test]
    fn test_api_response_err_creates_error_response() {
        let response: ApiResponse<String> = ApiResponse::err("Something went wrong");
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("Something went wrong".to_string()));
    }

    #[test]
    fn test_api_response_request_id_is_unique() {
        let a = ApiResponse::ok(1);
        let b = ApiResponse::ok(1);
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_error_response_omits_data() {
        let response: ApiResponse<u32> = ApiResponse::err("nope");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&PaysheetError::UnknownSession("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&PaysheetError::UnknownEmployee(9)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&PaysheetError::BufferCapReached { employee_id: 1, max: 3 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&PaysheetError::IneligibleBufferDay { employee_id: 1, day: 2 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&PaysheetError::Import("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&PaysheetError::Export("disk".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_parse_session_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_session_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_session_id("not-a-uuid"),
            Err(PaysheetError::UnknownSession(_))
        ));
    }

    #[test]
    fn test_buffer_request_deserialize() {
        let req: BufferRequest = serde_json::from_str(r#"{"employee_id": 3, "day": 11}"#).unwrap();
        assert_eq!(req.employee_id, 3);
        assert_eq!(req.day, 11);
    }

    #[test]
    fn test_upload_request_deserialize() {
        let req: UploadRequest =
            serde_json::from_str(r#"{"file_path": "Attendance_Jan_2025.xlsx"}"#).unwrap();
        assert_eq!(req.file_path, "Attendance_Jan_2025.xlsx");
    }
}
