//! CLI command dispatcher.
//!
//! This module dispatches CLI commands to either local or remote execution.

use anyhow::Result;
use pm_assistant::{query::IntentClassifier, Config};

use super::types::StatusResult;
use super::{local, output, remote};

/// Execution mode for CLI commands.
#[derive(Clone)]
pub enum ExecutionMode {
    /// Execute locally against the configured services
    Local(Box<Config>),
    /// Execute against a remote REST API (e.g. `http://localhost:5000/api`)
    Remote(String),
}

/// Run the chat command.
pub async fn run_chat(mode: ExecutionMode, message: String, json_output: bool) -> Result<()> {
    let reply = match mode {
        ExecutionMode::Local(config) => local::chat(&config, &message).await?,
        ExecutionMode::Remote(url) => remote::ApiClient::new(&url)?.chat(&message).await?,
    };
    output::print_reply(&reply, json_output)
}

/// Run the classify command. Always local; no services are contacted.
pub fn run_classify(text: String, json_output: bool) -> Result<()> {
    let intent = IntentClassifier::new().classify(&text);
    output::print_intent(&intent, json_output)
}

/// Run the due command.
pub async fn run_due(mode: ExecutionMode, days: Option<u32>, json_output: bool) -> Result<()> {
    let (tasks, days) = match mode {
        ExecutionMode::Local(config) => {
            let days = days.unwrap_or(config.assistant.horizon_days);
            (local::due(&config, days).await?, Some(days))
        }
        ExecutionMode::Remote(url) => (remote::ApiClient::new(&url)?.due(days).await?, days),
    };
    output::print_due_tasks(&tasks, days, json_output)
}

/// Run the status command.
pub async fn run_status(mode: ExecutionMode, json_output: bool) -> Result<()> {
    let result: StatusResult = match mode {
        ExecutionMode::Local(config) => local::status(&config).await?,
        ExecutionMode::Remote(url) => remote::ApiClient::new(&url)?.status().await?,
    };
    output::print_status(&result, json_output)
}

/// Run the remind-stale command.
pub async fn run_remind_stale(mode: ExecutionMode, json_output: bool) -> Result<()> {
    let report = match mode {
        ExecutionMode::Local(config) => local::remind_stale(&config).await?,
        ExecutionMode::Remote(url) => remote::ApiClient::new(&url)?.remind_stale().await?,
    };
    output::print_reminder_report(&report, json_output)
}
