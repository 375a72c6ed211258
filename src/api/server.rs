//! Paysheet API Server implementation
//!
//! HTTP REST API using Axum. Uploaded workbooks live in in-memory
//! sessions keyed by uuid.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use super::handlers;
use crate::config::PaysheetConfig;
use crate::core::PayrollSession;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub paysheet: PaysheetConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            paysheet: PaysheetConfig::default(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    /// Policy and layout applied to every upload
    pub config: PaysheetConfig,
    pub sessions: Mutex<HashMap<Uuid, PayrollSession>>,
}

impl AppState {
    pub fn new(config: PaysheetConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

/// Build the router with all routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Session endpoints
        .route("/api/v1/sessions", post(handlers::create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/api/v1/sessions/:id/employees/:employee_id",
            get(handlers::get_employee),
        )
        .route("/api/v1/sessions/:id/upload", put(handlers::replace_upload))
        .route("/api/v1/sessions/:id/buffer", post(handlers::toggle_buffer))
        .route("/api/v1/sessions/:id/export", post(handlers::export))
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "paysheet_server=info,paysheet=info,tower_http=info".into()
            }),
        )
        .init();

    let state = Arc::new(AppState::new(config.paysheet));
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("💰 Paysheet API Server starting on http://{}", addr);
    info!("   Sessions: /api/v1/sessions[/:id[/upload|/buffer|/export|/employees/:employee_id]]");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Paysheet API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
