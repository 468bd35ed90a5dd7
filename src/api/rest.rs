//! REST API router and configuration.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    chat_handler, create_task_handler, due_tasks_handler, health_handler, reminders_handler,
    schedule_meeting_handler, status_handler, upcoming_meetings_handler, ApiState,
};
use crate::assistant::Assistant;
use crate::config::ServerConfig;

/// REST API configuration.
#[derive(Debug, Clone)]
pub struct RestApiConfig {
    /// Enable CORS.
    pub enable_cors: bool,
    /// API prefix (e.g., "/api").
    pub prefix: String,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            prefix: "/api".to_string(),
        }
    }
}

impl From<&ServerConfig> for RestApiConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            enable_cors: config.enable_cors,
            prefix: config.prefix.clone(),
        }
    }
}

/// Create the REST API router.
///
/// Endpoints:
/// - GET    /api/health             - Liveness check
/// - POST   /api/tasks/create       - Create a task
/// - GET    /api/tasks/due?days=N   - Tasks due soon
/// - POST   /api/assist/chat        - Chat with the assistant
/// - POST   /api/reminders/trigger  - Send stale-task reminders
/// - POST   /api/meetings/schedule  - Book a meeting
/// - GET    /api/meetings/upcoming  - Upcoming meetings
/// - GET    /api/status             - Project status
pub fn create_rest_router(assistant: Arc<Assistant>, config: &RestApiConfig) -> Router {
    let state = Arc::new(ApiState::new(assistant));

    let api_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/tasks/create", post(create_task_handler))
        .route("/tasks/due", get(due_tasks_handler))
        .route("/assist/chat", post(chat_handler))
        .route("/reminders/trigger", post(reminders_handler))
        .route("/meetings/schedule", post(schedule_meeting_handler))
        .route("/meetings/upcoming", get(upcoming_meetings_handler))
        .route("/status", get(status_handler))
        .with_state(state);

    // Build the full router with prefix
    let router = Router::new()
        .nest(&config.prefix, api_routes)
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_origin(Any);

        router.layer(cors)
    } else {
        router
    }
}

/// Bind `host:port` and serve the API until the process is stopped.
pub async fn serve(assistant: Arc<Assistant>, server: &ServerConfig) -> anyhow::Result<()> {
    let router = create_rest_router(assistant, &RestApiConfig::from(server));
    let addr = format!("{}:{}", server.host, server.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("REST API listening on http://{}{}", addr, server.prefix);

    axum::serve(listener, router).await?;
    Ok(())
}
