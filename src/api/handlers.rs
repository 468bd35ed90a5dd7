//! REST API request handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::assistant::Assistant;
use crate::calendar::{parse_date_time, MeetingRequest, MeetingSummary};
use crate::error::AssistantError;
use crate::services::NewTask;
use crate::tasks::{
    AnnotatedTask, ProjectSnapshot, ReminderReport, TaskRecord, MAX_HORIZON_DAYS,
};

/// Application state shared across handlers.
pub struct ApiState {
    pub assistant: Arc<Assistant>,
}

impl ApiState {
    pub fn new(assistant: Arc<Assistant>) -> Self {
        Self { assistant }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Create task request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    /// Board member id to assign.
    pub owner: Option<String>,
    /// ISO-8601 date-time or `YYYY-MM-DD`.
    pub due_date: Option<String>,
    pub priority: Option<String>,
}

/// Chat request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    pub message: String,
}

/// Schedule meeting request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleMeetingRequest {
    pub title: String,
    /// ISO-8601; values without an offset are read in the configured timezone.
    pub date_time: String,
    pub attendees: Vec<String>,
    pub description: String,
}

/// `?days=N` query parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskResponse {
    pub success: bool,
    pub message: String,
    pub task: TaskRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct DueTasksResponse {
    pub success: bool,
    pub tasks: Vec<AnnotatedTask>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemindersResponse {
    pub success: bool,
    pub reminders_sent: ReminderReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleMeetingResponse {
    pub success: bool,
    pub message: String,
    pub meeting: MeetingSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingMeetingsResponse {
    pub success: bool,
    pub meetings: Vec<MeetingSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub status: ProjectSnapshot,
    pub summary: String,
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            message,
        }),
    )
        .into_response()
}

/// Map an assistant error to 400, 503 or 500.
fn failure(action: &str, err: AssistantError) -> Response {
    let status = if err.is_bad_request() {
        StatusCode::BAD_REQUEST
    } else if err.is_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    if status.is_server_error() {
        tracing::error!(action, error = %err, "Request failed");
    } else {
        tracing::debug!(action, error = %err, "Request rejected");
    }

    error_response(status, format!("Failed to {}: {}", action, err))
}

fn bad_request(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, message.into())
}

/// `?days=0` and windows past `MAX_HORIZON_DAYS` are rejected; absent means the default.
fn days_param(query: &DaysQuery, default: u32) -> Result<u32, Response> {
    match query.days {
        Some(0) => Err(bad_request("days must be greater than 0")),
        Some(days) if days > MAX_HORIZON_DAYS => Err(bad_request(format!(
            "days must be at most {MAX_HORIZON_DAYS}"
        ))),
        Some(days) => Ok(days),
        None => Ok(default),
    }
}

/// Due dates may be full date-times or plain dates (end of that day).
fn parse_due(text: &str, tz: Tz) -> Option<DateTime<Utc>> {
    parse_date_time(text, tz).or_else(|| {
        let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()?;
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
        parse_date_time(&date.and_time(end_of_day).format("%Y-%m-%dT%H:%M:%S").to_string(), tz)
    })
}

// ============================================================================
// Handler Functions
// ============================================================================

/// GET /api/health - Liveness check.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        message: "API is running",
    })
}

/// POST /api/tasks/create - Create a card in the to-do list.
pub async fn create_task_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<CreateTaskRequest>,
) -> Response {
    if request.title.trim().is_empty() {
        return bad_request("Task title is required");
    }

    let mut task = NewTask::new(request.title.trim());
    task.description = request.description;
    task.owner_id = request.owner.filter(|o| !o.trim().is_empty());
    if let Some(priority) = request.priority {
        task.priority = priority;
    }
    if let Some(due) = request.due_date.as_deref().filter(|d| !d.trim().is_empty()) {
        match parse_due(due, state.assistant.tz()) {
            Some(due) => task.due = Some(due),
            None => return bad_request(format!("Invalid dueDate: {}", due)),
        }
    }

    match state.assistant.create_task(task).await {
        Ok(task) => (
            StatusCode::OK,
            Json(CreateTaskResponse {
                success: true,
                message: "Task created successfully".to_string(),
                task,
            }),
        )
            .into_response(),
        Err(e) => failure("create task", e),
    }
}

/// GET /api/tasks/due?days=N - Tasks due within the window.
pub async fn due_tasks_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DaysQuery>,
) -> Response {
    let days = match days_param(&query, state.assistant.horizon_days()) {
        Ok(days) => days,
        Err(response) => return response,
    };

    match state.assistant.due(Some(days)).await {
        Ok(tasks) => Json(DueTasksResponse {
            success: true,
            tasks,
        })
        .into_response(),
        Err(e) => failure("get due tasks", e),
    }
}

/// POST /api/assist/chat - Answer a chat message.
pub async fn chat_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    if request.message.trim().is_empty() {
        return bad_request("Message is required");
    }

    match state.assistant.respond(&request.message).await {
        Ok(response) => Json(ChatResponse {
            success: true,
            response,
        })
        .into_response(),
        Err(e) => failure("process message", e),
    }
}

/// POST /api/reminders/trigger - Run the stale-task reminder check.
pub async fn reminders_handler(State(state): State<Arc<ApiState>>) -> Response {
    match state.assistant.remind_stale().await {
        Ok(report) => Json(RemindersResponse {
            success: true,
            reminders_sent: report,
        })
        .into_response(),
        Err(e) => failure("trigger reminders", e),
    }
}

/// POST /api/meetings/schedule - Book a meeting.
pub async fn schedule_meeting_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ScheduleMeetingRequest>,
) -> Response {
    if request.title.trim().is_empty() {
        return bad_request("Meeting title is required");
    }
    let Some(start) = parse_date_time(&request.date_time, state.assistant.tz()) else {
        return bad_request("Invalid dateTime format. Expected ISO format.");
    };

    let meeting = MeetingRequest::new(request.title.trim(), start, state.assistant.meeting_length())
        .with_description(request.description)
        .with_attendees(request.attendees);

    match state.assistant.schedule_meeting(meeting).await {
        Ok(meeting) => Json(ScheduleMeetingResponse {
            success: true,
            message: "Meeting scheduled successfully".to_string(),
            meeting,
        })
        .into_response(),
        Err(e) => failure("schedule meeting", e),
    }
}

/// GET /api/meetings/upcoming?days=N - Upcoming timed meetings.
pub async fn upcoming_meetings_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DaysQuery>,
) -> Response {
    let days = match days_param(&query, 7) {
        Ok(days) => days,
        Err(response) => return response,
    };

    match state.assistant.upcoming_meetings(days).await {
        Ok(meetings) => Json(UpcomingMeetingsResponse {
            success: true,
            meetings,
        })
        .into_response(),
        Err(e) => failure("get upcoming meetings", e),
    }
}

/// GET /api/status - Project snapshot and its summary sentence.
pub async fn status_handler(State(state): State<Arc<ApiState>>) -> Response {
    match state.assistant.status().await {
        Ok(status) => {
            let summary = state.assistant.describe_status(&status);
            Json(StatusResponse {
                success: true,
                status,
                summary,
            })
            .into_response()
        }
        Err(e) => failure("get project status", e),
    }
}
