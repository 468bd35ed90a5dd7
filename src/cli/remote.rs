//! Remote execution via the REST API.
//!
//! This module executes CLI commands against a running pm-assistant server.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use pm_assistant::tasks::{AnnotatedTask, ReminderReport};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::types::StatusResult;

#[derive(Debug, Deserialize)]
struct ChatReply {
    response: String,
}

#[derive(Debug, Deserialize)]
struct DueReply {
    tasks: Vec<AnnotatedTask>,
}

#[derive(Debug, Deserialize)]
struct RemindReply {
    reminders_sent: ReminderReport,
}

/// Client for a remote pm-assistant REST API.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send a request and decode the success body, or surface the server's message.
    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.context("Request to server failed")?;
        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .context("Server returned a non-JSON response")?;

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            return Err(anyhow!("Server error ({}): {}", status, message));
        }

        serde_json::from_value(body).map_err(|e| anyhow!("Failed to parse response: {}", e))
    }

    pub async fn chat(&self, message: &str) -> Result<String> {
        let request = self
            .client
            .post(format!("{}/assist/chat", self.base_url))
            .json(&serde_json::json!({ "message": message }));
        let reply: ChatReply = self.call(request).await?;
        Ok(reply.response)
    }

    pub async fn due(&self, days: Option<u32>) -> Result<Vec<AnnotatedTask>> {
        let mut request = self.client.get(format!("{}/tasks/due", self.base_url));
        if let Some(days) = days {
            request = request.query(&[("days", days)]);
        }
        let reply: DueReply = self.call(request).await?;
        Ok(reply.tasks)
    }

    pub async fn status(&self) -> Result<StatusResult> {
        let request = self.client.get(format!("{}/status", self.base_url));
        self.call(request).await
    }

    pub async fn remind_stale(&self) -> Result<ReminderReport> {
        let request = self
            .client
            .post(format!("{}/reminders/trigger", self.base_url));
        let reply: RemindReply = self.call(request).await?;
        Ok(reply.reminders_sent)
    }
}
