//! Collaborator trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::calendar::{MeetingRequest, MeetingSummary};
use crate::error::Result;
use crate::tasks::{MemberRef, TaskRecord};

/// Lookup of board members by id.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Resolve a member. An unknown id yields `Ok(None)`.
    async fn resolve_member(&self, member_id: &str) -> Result<Option<MemberRef>>;
}

/// The card board tasks live on.
#[async_trait]
pub trait TaskSource: MemberDirectory {
    /// Every card on the board. Cards with malformed data are skipped.
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>>;

    /// Create a card in the to-do list.
    async fn create_task(&self, task: NewTask) -> Result<TaskRecord>;

    async fn add_comment(&self, task_id: &str, text: &str) -> Result<()>;
}

/// The calendar meetings are read from and booked on.
#[async_trait]
pub trait MeetingSource: Send + Sync {
    /// Timed meetings starting within `days` of `now`, ordered by start.
    async fn upcoming(&self, now: DateTime<Utc>, days: u32) -> Result<Vec<MeetingSummary>>;

    async fn schedule(&self, request: MeetingRequest) -> Result<MeetingSummary>;
}

/// Outbound email.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(&self, message: EmailMessage) -> Result<()>;
}

/// A card to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    /// Board member id to assign.
    pub owner_id: Option<String>,
    pub due: Option<DateTime<Utc>>,
    pub priority: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            owner_id: None,
            due: None,
            priority: "medium".to_string(),
        }
    }

    /// Description as stored on the card, with the priority appended.
    pub fn card_description(&self) -> String {
        let priority = self.priority.trim();
        if priority.is_empty() {
            return self.description.clone();
        }
        format!("{}\n\nPriority: {}", self.description, capitalize(priority))
    }
}

/// A plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Upper-case the first character, lower-case the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
