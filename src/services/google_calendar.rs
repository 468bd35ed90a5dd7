//! Google Calendar client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::calendar::{MeetingRequest, MeetingSummary};
use crate::config::{AssistantSettings, CalendarConfig};
use crate::error::{Result, ServiceError};
use crate::tasks::DueWindow;

use super::{check_status, http_client, present, MeetingSource};

const SERVICE: &str = "Google Calendar";

/// Google Calendar v3 events client.
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    calendar_id: String,
    tz: Tz,
}

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    start: EventTime,
    #[serde(default)]
    attendees: Vec<RawAttendee>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttendee {
    display_name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewEvent<'a> {
    summary: &'a str,
    description: &'a str,
    start: NewEventTime,
    end: NewEventTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attendees: Vec<NewAttendee<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewEventTime {
    date_time: String,
    time_zone: String,
}

#[derive(Debug, Serialize)]
struct NewAttendee<'a> {
    email: &'a str,
}

impl RawAttendee {
    /// Display name, falling back to the local part of the email.
    fn label(self) -> Option<String> {
        match (self.display_name, self.email) {
            (Some(name), _) => Some(name),
            (None, Some(email)) => email.split('@').next().map(str::to_string),
            (None, None) => None,
        }
    }
}

impl RawEvent {
    /// All-day events and events with an unreadable start are dropped.
    fn into_summary(self, tz: Tz) -> Option<MeetingSummary> {
        let raw_start = self.start.date_time.as_deref()?;
        let start = match DateTime::parse_from_rfc3339(raw_start) {
            Ok(start) => start.with_timezone(&Utc),
            Err(e) => {
                tracing::warn!(event_id = %self.id, start = raw_start, error = %e, "Skipping event with malformed start");
                return None;
            }
        };

        let attendees: Vec<String> = self
            .attendees
            .into_iter()
            .filter_map(RawAttendee::label)
            .collect();

        Some(
            MeetingSummary::new(self.id, self.summary, start, tz)
                .with_description(self.description)
                .with_attendees(attendees),
        )
    }
}

impl GoogleCalendarClient {
    pub fn from_config(config: &CalendarConfig, settings: &AssistantSettings) -> Result<Self> {
        Ok(Self {
            client: http_client(SERVICE, config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            calendar_id: config.calendar_id.clone(),
            tz: settings.tz()?,
        })
    }

    fn api_key(&self) -> Result<&str> {
        present(&self.api_key)
            .ok_or_else(|| ServiceError::not_configured(SERVICE, "API key not configured").into())
    }

    /// `{base}/calendars/{calendar_id}/events`, with the id percent-encoded.
    fn events_url(&self) -> Result<Url> {
        let invalid = |detail: String| ServiceError::not_configured(SERVICE, detail);

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("base URL cannot take a path: {}", self.base_url)))?
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }

    fn event_time(&self, at: DateTime<Utc>) -> NewEventTime {
        NewEventTime {
            date_time: at.with_timezone(&self.tz).to_rfc3339(),
            time_zone: self.tz.name().to_string(),
        }
    }
}

#[async_trait]
impl MeetingSource for GoogleCalendarClient {
    async fn upcoming(&self, now: DateTime<Utc>, days: u32) -> Result<Vec<MeetingSummary>> {
        let key = self.api_key()?;
        let time_max = DueWindow::new(now, days).end();

        let response = self
            .client
            .get(self.events_url()?)
            .query(&[
                ("timeMin", now.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("key", key.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;
        let response = check_status(SERVICE, response).await?;
        let events: EventList = response
            .json()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        let mut meetings: Vec<MeetingSummary> = events
            .items
            .into_iter()
            .filter_map(|event| event.into_summary(self.tz))
            .collect();
        meetings.sort_by_key(|m| m.start);

        tracing::debug!(count = meetings.len(), days, "Fetched upcoming meetings");
        Ok(meetings)
    }

    async fn schedule(&self, request: MeetingRequest) -> Result<MeetingSummary> {
        let key = self.api_key()?;

        let body = NewEvent {
            summary: &request.title,
            description: &request.description,
            start: self.event_time(request.start),
            end: self.event_time(request.end),
            attendees: request
                .attendees
                .iter()
                .map(|email| NewAttendee { email })
                .collect(),
        };

        let response = self
            .client
            .post(self.events_url()?)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;
        let response = check_status(SERVICE, response).await?;
        let event: RawEvent = response
            .json()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        let event_id = event.id.clone();
        let summary = event.into_summary(self.tz).unwrap_or_else(|| {
            MeetingSummary::new(event_id, &request.title, request.start, self.tz)
                .with_description(&request.description)
                .with_attendees(request.attendees.iter().map(String::as_str))
        });

        tracing::info!(event_id = %summary.id, date = %summary.date, time = %summary.time, "Scheduled meeting");
        Ok(summary)
    }
}
