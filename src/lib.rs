//! pm-assistant: a project-management assistant
//!
//! Answers natural-language questions about a Trello board, books meetings
//! in Google Calendar and sends reminder emails. Exposed as a REST API and
//! a command-line client.

pub mod api;
pub mod assistant;
pub mod calendar;
pub mod config;
pub mod error;
pub mod query;
pub mod services;
pub mod tasks;

pub use api::{create_rest_router, serve, ApiState, RestApiConfig};
pub use assistant::Assistant;
pub use calendar::{MeetingRequest, MeetingSummary};
pub use config::{Config, TeamMember};
pub use error::{AssistantError, ConfigError, Result, ServiceError};
pub use query::{compose, Intent, IntentClassifier, MeetingDetails, ReplyData};
pub use services::{
    EmailMessage, GoogleCalendarClient, MailRelayClient, MeetingSource, MemberDirectory, NewTask,
    Notifier, TaskSource, TrelloClient,
};
pub use tasks::{
    due_soon, AnnotatedTask, ListMapping, MemberRef, ProjectSnapshot, ReminderReport, TaskRecord,
    TaskStatus,
};
