//! Configuration loading and wiring the real service clients.

use std::collections::HashMap;
use std::io::Write;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use pm_assistant::{create_rest_router, Assistant, AssistantError, Config, RestApiConfig};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_from_file() {
    let file = write_config(
        r#"
        [server]
        port = 8080
        prefix = "/v1"

        [board]
        board_id = "board-1"
        todo_list_id = "list-todo"

        [assistant]
        horizon_days = 14
        timezone = "Europe/London"

        [[team]]
        name = "Alice Smith"
        email = "alice@example.com"
        member_id = "m-alice"
        "#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.prefix, "/v1");
    assert_eq!(config.board.board_id.as_deref(), Some("board-1"));
    assert_eq!(config.assistant.horizon_days, 14);
    assert_eq!(config.assistant.tz().unwrap(), chrono_tz::Europe::London);
    assert_eq!(config.team.len(), 1);
    assert_eq!(config.team[0].member_id.as_deref(), Some("m-alice"));
    assert!(config.team[0].username.is_none());
}

#[test]
fn test_invalid_config_is_rejected() {
    let file = write_config("[assistant]\ntimezone = \"Mars/Olympus\"\n");
    let err = Config::from_file(file.path()).unwrap_err();
    assert!(matches!(err, AssistantError::Config(_)));

    let file = write_config("[[team]]\nname = \"Bob\"\nemail = \"not-an-email\"\n");
    assert!(Config::from_file(file.path()).is_err());

    let file = write_config("[server\nport = 1");
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, AssistantError::Config(_)));
}

#[test]
fn test_environment_fills_blank_credentials_only() {
    let file = write_config(
        r#"
        [board]
        api_key = "from-file"
        token = ""
        "#,
    );
    let mut config = Config::from_file(file.path()).unwrap();

    let env: HashMap<&str, &str> = [
        ("TRELLO_KEY", "from-env"),
        ("TRELLO_TOKEN", "token-env"),
        ("GCALENDAR_CALENDAR_ID", "team@group.calendar.google.com"),
        ("DEFAULT_TIMEZONE", "America/Chicago"),
        ("MAIL_FROM", "pm@example.com"),
    ]
    .into_iter()
    .collect();
    config.apply_env_from(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(config.board.api_key.as_deref(), Some("from-file"));
    assert_eq!(config.board.token.as_deref(), Some("token-env"));
    assert_eq!(config.calendar.calendar_id, "team@group.calendar.google.com");
    assert_eq!(config.assistant.timezone, "America/Chicago");
    assert_eq!(config.email.from.as_deref(), Some("pm@example.com"));
    assert!(config.validate().is_ok());
}

#[tokio::test]
async fn test_unconfigured_services_answer_service_unavailable() {
    let assistant = Assistant::from_config(&Config::default()).unwrap();

    let err = assistant.due(None).await.unwrap_err();
    assert!(err.is_unavailable());

    let router = create_rest_router(assistant.into(), &RestApiConfig::default());
    let response = router
        .oneshot(Request::get("/api/tasks/due").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn test_meeting_length_out_of_range_is_rejected() {
    let mut config = Config::default();
    config.calendar.meeting_minutes = 0;
    let err = Assistant::from_config(&config).err().unwrap();
    assert!(matches!(err, AssistantError::Config(_)));

    config.calendar.meeting_minutes = i64::MAX;
    assert!(Assistant::from_config(&config).is_err());

    config.calendar.meeting_minutes = 45;
    let assistant = Assistant::from_config(&config).unwrap();
    assert_eq!(assistant.meeting_length(), chrono::Duration::minutes(45));
}
