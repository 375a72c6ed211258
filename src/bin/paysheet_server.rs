//! Paysheet API Server binary
//!
//! HTTP REST API for attendance upload, buffer selection and salary export.

use std::path::PathBuf;

use clap::Parser;
use paysheet::api::{run_api_server, ApiConfig};
use paysheet::config::PaysheetConfig;

#[derive(Parser, Debug)]
#[command(name = "paysheet-server")]
#[command(version)]
#[command(about = "Paysheet API Server - attendance-to-salary calculation over HTTP")]
#[command(long_about = r#"
Paysheet API Server - HTTP REST API

Session endpoints:
  - POST   /api/v1/sessions                              - Upload a workbook
  - GET    /api/v1/sessions/:id                          - Summary + salary reports
  - GET    /api/v1/sessions/:id/employees/:employee_id   - One employee, buffer picker state
  - PUT    /api/v1/sessions/:id/upload                   - Replace the workbook
  - POST   /api/v1/sessions/:id/buffer                   - Toggle a buffer day
  - POST   /api/v1/sessions/:id/export                   - Write .xlsx or .json report
  - DELETE /api/v1/sessions/:id                          - End the session

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Example usage:
  paysheet-server                           # Start on localhost:8080
  paysheet-server --host 0.0.0.0 --port 3000 --config paysheet.yaml

  curl -X POST http://localhost:8080/api/v1/sessions \
    -H "Content-Type: application/json" \
    -d '{"file_path": "Attendance_Jan_2025.xlsx"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "PAYSHEET_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "PAYSHEET_PORT")]
    port: u16,

    /// Policy/layout overrides (YAML)
    #[arg(short, long, env = "PAYSHEET_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        paysheet: PaysheetConfig::load_or_default(args.config.as_deref())?,
    };

    run_api_server(config).await
}
