//! Local execution against the configured services.

use anyhow::Result;
use pm_assistant::{
    tasks::{AnnotatedTask, ReminderReport},
    Assistant, Config,
};

use super::types::StatusResult;

pub async fn chat(config: &Config, message: &str) -> Result<String> {
    let assistant = Assistant::from_config(config)?;
    Ok(assistant.respond(message).await?)
}

pub async fn due(config: &Config, days: u32) -> Result<Vec<AnnotatedTask>> {
    let assistant = Assistant::from_config(config)?;
    Ok(assistant.due(Some(days)).await?)
}

pub async fn status(config: &Config) -> Result<StatusResult> {
    let assistant = Assistant::from_config(config)?;
    let status = assistant.status().await?;
    let summary = assistant.describe_status(&status);
    Ok(StatusResult { status, summary })
}

pub async fn remind_stale(config: &Config) -> Result<ReminderReport> {
    let assistant = Assistant::from_config(config)?;
    Ok(assistant.remind_stale().await?)
}
