//! Transactional mail relay client and reminder message templates.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::EmailConfig;
use crate::error::{Result, ServiceError};
use crate::tasks::TaskRecord;

use super::{check_status, http_client, present, EmailMessage, Notifier};

const SERVICE: &str = "Email";

/// Sends plain-text mail through an HTTP relay (`POST {base_url}/send`).
pub struct MailRelayClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    from: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl MailRelayClient {
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(SERVICE, config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Notifier for MailRelayClient {
    async fn send_email(&self, message: EmailMessage) -> Result<()> {
        let (Some(api_key), Some(from)) = (present(&self.api_key), present(&self.from)) else {
            return Err(ServiceError::not_configured(SERVICE, "credentials not configured").into());
        };

        let body = SendRequest {
            from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .client
            .post(format!("{}/send", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;
        check_status(SERVICE, response).await?;

        tracing::info!(to = %message.to, subject = %message.subject, "Sent email");
        Ok(())
    }
}

/// Reminder for a task that has had no activity for `age_days`.
pub fn stale_reminder_email(
    to: &str,
    owner_name: &str,
    task: &TaskRecord,
    age_days: i64,
) -> EmailMessage {
    let due = task
        .due
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Not specified".to_string());

    let body = format!(
        "Hi {owner},\n\n\
         This is a friendly reminder that the task \"{title}\" was created {age} days ago and requires your attention.\n\n\
         Due date: {due}\n\n\
         Please update the task status or reach out if you need help.\n\n\
         Best regards,\n\
         Project Management Assistant\n",
        owner = owner_name,
        title = task.title,
        age = age_days,
        due = due,
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("Reminder: Task '{}' needs attention", task.title),
        body,
    }
}

/// Reminder requested from chat ("remind bob about the client report").
pub fn chat_reminder_email(to: &str, name: &str, subject: &str) -> EmailMessage {
    let body = format!(
        "Hi {name},\n\n\
         This is a friendly reminder about {subject}.\n\n\
         Please take a look when you get a chance.\n\n\
         Best regards,\n\
         Project Management Assistant\n",
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("Reminder: {}", subject),
        body,
    }
}
