//! Task record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::BoardConfig;

// ============================================================================
// Task Status
// ============================================================================

/// Status of a task, derived from the board list the card sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    /// The card sits in a list that is not mapped to a status.
    Unknown,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_done(&self) -> bool {
        *self == Self::Done
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// List Mapping
// ============================================================================

/// Maps board list ids to [`TaskStatus`].
///
/// Applied once, when a card enters the system. Unmapped or unconfigured
/// lists map to [`TaskStatus::Unknown`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMapping {
    todo: Option<String>,
    in_progress: Option<String>,
    done: Option<String>,
}

impl ListMapping {
    pub fn new(
        todo: Option<String>,
        in_progress: Option<String>,
        done: Option<String>,
    ) -> Self {
        let clean = |id: Option<String>| id.filter(|v| !v.trim().is_empty());
        Self {
            todo: clean(todo),
            in_progress: clean(in_progress),
            done: clean(done),
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(
            config.todo_list_id.clone(),
            config.in_progress_list_id.clone(),
            config.done_list_id.clone(),
        )
    }

    pub fn status_for(&self, list_id: &str) -> TaskStatus {
        let is = |slot: &Option<String>| slot.as_deref() == Some(list_id);
        if is(&self.todo) {
            TaskStatus::Todo
        } else if is(&self.in_progress) {
            TaskStatus::InProgress
        } else if is(&self.done) {
            TaskStatus::Done
        } else {
            TaskStatus::Unknown
        }
    }

    /// The list new tasks are created in.
    pub fn todo_list(&self) -> Option<&str> {
        self.todo.as_deref()
    }
}

// ============================================================================
// Task Record
// ============================================================================

/// A task as read from the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    /// Board list the card belongs to.
    pub list_id: String,
    /// First member assigned to the card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    status: TaskStatus,
}

impl TaskRecord {
    /// Create a record; its status comes from `list_id` through `lists`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        list_id: impl Into<String>,
        lists: &ListMapping,
    ) -> Self {
        let list_id = list_id.into();
        let status = lists.status_for(&list_id);
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            due: None,
            list_id,
            owner_id: None,
            created_at: None,
            last_activity: None,
            status,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_last_activity(mut self, last_activity: DateTime<Utc>) -> Self {
        self.last_activity = Some(last_activity);
        self
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    /// Due before `now` and not done.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        matches!(self.due, Some(due) if due < now) && !self.is_done()
    }
}

// ============================================================================
// Member Reference
// ============================================================================

/// A board member as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub id: String,
    /// Display name.
    pub name: String,
    pub initials: String,
    #[serde(default)]
    pub username: String,
}

impl MemberRef {
    /// Placeholder for a member whose lookup failed.
    pub fn unresolved(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: "Unknown".to_string(),
            initials: "??".to_string(),
            username: String::new(),
        }
    }
}

// ============================================================================
// Annotated Task
// ============================================================================

/// A due task with its owner resolved and its status label attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub owner: Option<MemberRef>,
    pub status: TaskStatus,
}

impl AnnotatedTask {
    /// Owner display name, or "Unassigned".
    pub fn owner_name(&self) -> &str {
        self.owner
            .as_ref()
            .map(|m| m.name.as_str())
            .unwrap_or("Unassigned")
    }
}
