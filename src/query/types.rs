//! Types for the chat command interpreter.

use serde::Serialize;

// ============================================================================
// Intent
// ============================================================================

/// What a chat message asks the assistant to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// "What tasks are due this week?"
    DueTasks,
    /// "Remind bob about the client report"
    Reminder { person: String, subject: String },
    /// "Schedule a meeting on monday at 10am with alice, bob"
    ScheduleMeeting(MeetingDetails),
    /// "How is the project going?"
    ProjectStatus,
    /// Nothing matched.
    Unknown,
}

impl Intent {
    /// Get a human-readable name for this intent.
    pub fn display_name(&self) -> &str {
        match self {
            Self::DueTasks => "Due Tasks",
            Self::Reminder { .. } => "Reminder",
            Self::ScheduleMeeting(_) => "Schedule Meeting",
            Self::ProjectStatus => "Project Status",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether answering needs the board's task records.
    pub fn needs_tasks(&self) -> bool {
        matches!(self, Self::DueTasks | Self::ProjectStatus)
    }
}

// ============================================================================
// Meeting Details
// ============================================================================

/// Fragments pulled out of a meeting request, as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MeetingDetails {
    pub date_text: Option<String>,
    pub time_text: Option<String>,
    pub attendees: Vec<String>,
}

impl MeetingDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date_text = Some(date.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time_text = Some(time.into());
        self
    }

    pub fn with_attendees(mut self, attendees: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attendees = attendees.into_iter().map(Into::into).collect();
        self
    }

    /// Both a date and a time were given.
    pub fn is_complete(&self) -> bool {
        self.date_text.is_some() && self.time_text.is_some()
    }

    /// Names of the fields still needed, in asking order.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.date_text.is_none() {
            missing.push("date");
        }
        if self.time_text.is_none() {
            missing.push("time");
        }
        missing
    }
}
