//! External collaborators: the Trello board, Google Calendar and the mail relay.
//!
//! Each client is plain I/O behind one of the traits in [`traits`]. Clients
//! are built from [`Config`](crate::config::Config) at startup. Missing
//! credentials are not a construction error; calls fail with
//! [`ServiceError::NotConfigured`] so the HTTP layer can answer 503.

mod google_calendar;
mod mail;
mod traits;
mod trello;

pub use google_calendar::GoogleCalendarClient;
pub use mail::{chat_reminder_email, stale_reminder_email, MailRelayClient};
pub use traits::{
    capitalize, EmailMessage, MeetingSource, MemberDirectory, Notifier, NewTask, TaskSource,
};
pub use trello::{card_created_at, TrelloClient};

use reqwest::{Client, Response};
use std::time::Duration;

use crate::error::{Result, ServiceError};

fn http_client(service: &'static str, timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ServiceError::Request {
            service,
            detail: format!("Failed to create HTTP client: {}", e),
        })
        .map_err(Into::into)
}

/// Pass successful responses through; turn the rest into [`ServiceError::Api`].
async fn check_status(service: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ServiceError::Api {
        service,
        status: status.as_u16(),
        detail,
    }
    .into())
}

/// A configured, non-blank value.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
