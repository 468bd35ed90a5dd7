//! Meeting types.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// An upcoming meeting as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: DateTime<Utc>,
    /// Start date in the display timezone, `YYYY-MM-DD`.
    pub date: String,
    /// Start time in the display timezone, `hh:mm AM`.
    pub time: String,
    /// Attendee display names.
    #[serde(default)]
    pub attendees: Vec<String>,
}

impl MeetingSummary {
    /// Build a summary, rendering `date` and `time` in `tz`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        tz: Tz,
    ) -> Self {
        let local = start.with_timezone(&tz);
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            start,
            date: local.format("%Y-%m-%d").to_string(),
            time: local.format("%I:%M %p").to_string(),
            attendees: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_attendees(mut self, attendees: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attendees = attendees.into_iter().map(Into::into).collect();
        self
    }
}

/// The earliest meeting starting at or after `now`.
pub fn next_meeting(meetings: &[MeetingSummary], now: DateTime<Utc>) -> Option<&MeetingSummary> {
    meetings
        .iter()
        .filter(|m| m.start >= now)
        .min_by_key(|m| m.start)
}

/// A meeting to book on the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRequest {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Attendee email addresses.
    pub attendees: Vec<String>,
}

impl MeetingRequest {
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, length: Duration) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            start,
            end: start + length,
            attendees: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Keep only entries that look like email addresses.
    pub fn with_attendees(mut self, attendees: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attendees = attendees
            .into_iter()
            .map(Into::into)
            .map(|a: String| a.trim().to_string())
            .filter(|a| a.contains('@'))
            .collect();
        self
    }
}
