//! The assistant: routes chat messages and API calls to the collaborators.
//!
//! The assistant owns the collaborator handles and the read-only settings.
//! Each call is independent; nothing is cached between calls.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::calendar::{resolve_start, MeetingRequest, MeetingSummary};
use crate::config::{AssistantSettings, Config, TeamMember};
use crate::error::{AssistantError, Result};
use crate::query::{compose, unresolved_meeting, Intent, IntentClassifier, MeetingDetails, ReplyData};
use crate::services::{
    capitalize, chat_reminder_email, stale_reminder_email, GoogleCalendarClient, MailRelayClient,
    MeetingSource, NewTask, Notifier, TaskSource, TrelloClient,
};
use crate::tasks::{
    age_in_days, due_soon, stale_tasks, AnnotatedTask, MemberRef, ProjectSnapshot, ReminderReport,
    TaskRecord,
};

/// Project-management assistant.
pub struct Assistant {
    tasks: Arc<dyn TaskSource>,
    meetings: Arc<dyn MeetingSource>,
    notifier: Arc<dyn Notifier>,
    team: Vec<TeamMember>,
    settings: AssistantSettings,
    tz: Tz,
    meeting_length: Duration,
    classifier: IntentClassifier,
}

impl Assistant {
    /// Create an assistant over the given collaborators.
    pub fn new(
        tasks: Arc<dyn TaskSource>,
        meetings: Arc<dyn MeetingSource>,
        notifier: Arc<dyn Notifier>,
        config: &Config,
    ) -> Result<Self> {
        Ok(Self {
            tasks,
            meetings,
            notifier,
            team: config.team.clone(),
            settings: config.assistant.clone(),
            tz: config.assistant.tz()?,
            meeting_length: config.calendar.meeting_length()?,
            classifier: IntentClassifier::new(),
        })
    }

    /// Create an assistant backed by Trello, Google Calendar and the mail relay.
    pub fn from_config(config: &Config) -> Result<Self> {
        let tasks = Arc::new(TrelloClient::from_config(&config.board)?);
        let meetings = Arc::new(GoogleCalendarClient::from_config(
            &config.calendar,
            &config.assistant,
        )?);
        let notifier = Arc::new(MailRelayClient::from_config(&config.email)?);
        Self::new(tasks, meetings, notifier, config)
    }

    pub fn horizon_days(&self) -> u32 {
        self.settings.horizon_days
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn meeting_length(&self) -> Duration {
        self.meeting_length
    }

    pub fn classify(&self, message: &str) -> Intent {
        self.classifier.classify(message)
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// Answer a chat message.
    pub async fn respond(&self, message: &str) -> Result<String> {
        self.respond_at(message, Utc::now()).await
    }

    /// Answer a chat message as of `now`.
    pub async fn respond_at(&self, message: &str, now: DateTime<Utc>) -> Result<String> {
        let intent = self.classify(message);
        info!(intent = intent.display_name(), "Handling chat message");

        let data = ReplyData::default().with_horizon(self.horizon_days());
        let data = match &intent {
            Intent::DueTasks => data.with_due_tasks(self.due_at(now, self.horizon_days()).await?),
            Intent::ProjectStatus => match self.status_at(now).await {
                Ok(snapshot) => data.with_snapshot(snapshot),
                Err(e) => {
                    warn!(error = %e, "Project status unavailable");
                    data
                }
            },
            Intent::Reminder { person, subject } => {
                self.send_chat_reminder(person, subject).await?;
                data
            }
            Intent::ScheduleMeeting(details) if details.is_complete() => {
                if self.book_from_chat(details, now).await?.is_none() {
                    return Ok(unresolved_meeting(details));
                }
                data
            }
            Intent::ScheduleMeeting(_) | Intent::Unknown => data,
        };

        Ok(compose(&intent, &data))
    }

    async fn send_chat_reminder(&self, person: &str, subject: &str) -> Result<()> {
        let member = self
            .team_member_named(person)
            .ok_or_else(|| AssistantError::UnknownTeamMember(capitalize(person)))?;

        self.notifier
            .send_email(chat_reminder_email(&member.email, &member.name, subject))
            .await?;
        info!(to = %member.name, "Sent chat reminder");
        Ok(())
    }

    /// Book a meeting from chat fragments. `None` when the date or time
    /// cannot be resolved.
    async fn book_from_chat(
        &self,
        details: &MeetingDetails,
        now: DateTime<Utc>,
    ) -> Result<Option<MeetingSummary>> {
        let (Some(date), Some(time)) = (&details.date_text, &details.time_text) else {
            return Ok(None);
        };
        let Some(start) = resolve_start(date, time, now, self.tz) else {
            debug!(date = %date, time = %time, "Could not resolve meeting time");
            return Ok(None);
        };

        let (emails, names): (Vec<&String>, Vec<&String>) =
            details.attendees.iter().partition(|a| a.contains('@'));
        let names: Vec<String> = names.into_iter().map(|n| capitalize(n)).collect();

        let title = if details.attendees.is_empty() {
            "Meeting".to_string()
        } else {
            let everyone: Vec<String> = details
                .attendees
                .iter()
                .map(|a| if a.contains('@') { a.clone() } else { capitalize(a) })
                .collect();
            format!("Meeting with {}", everyone.join(", "))
        };

        let mut request = MeetingRequest::new(title, start, self.meeting_length)
            .with_attendees(emails.into_iter().map(String::as_str));
        if !names.is_empty() {
            request = request.with_description(format!("Attendees: {}", names.join(", ")));
        }

        let meeting = self.meetings.schedule(request).await?;
        Ok(Some(meeting))
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    /// Tasks due within `days` (default: the configured horizon).
    pub async fn due(&self, days: Option<u32>) -> Result<Vec<AnnotatedTask>> {
        self.due_at(Utc::now(), days.unwrap_or(self.horizon_days())).await
    }

    pub async fn due_at(&self, now: DateTime<Utc>, days: u32) -> Result<Vec<AnnotatedTask>> {
        let records = self.tasks.fetch_tasks().await?;
        Ok(due_soon(&records, now, days, &*self.tasks).await)
    }

    pub async fn create_task(&self, task: NewTask) -> Result<TaskRecord> {
        if task.title.trim().is_empty() {
            return Err(AssistantError::InvalidInput("Task title is required".to_string()));
        }
        self.tasks.create_task(task).await
    }

    // ========================================================================
    // Status
    // ========================================================================

    pub async fn status(&self) -> Result<ProjectSnapshot> {
        self.status_at(Utc::now()).await
    }

    /// Snapshot of the board. A calendar failure only drops the next meeting.
    pub async fn status_at(&self, now: DateTime<Utc>) -> Result<ProjectSnapshot> {
        let horizon = self.horizon_days();
        let (records, meetings) = tokio::join!(
            self.tasks.fetch_tasks(),
            self.meetings.upcoming(now, horizon)
        );

        let records = records?;
        let meetings = meetings.unwrap_or_else(|e| {
            warn!(error = %e, "Upcoming meetings unavailable for status");
            Vec::new()
        });

        Ok(ProjectSnapshot::build(&records, &meetings, now, horizon))
    }

    /// Summary sentence for a snapshot.
    pub fn describe_status(&self, snapshot: &ProjectSnapshot) -> String {
        let data = ReplyData::default()
            .with_horizon(self.horizon_days())
            .with_snapshot(snapshot.clone());
        compose(&Intent::ProjectStatus, &data)
    }

    // ========================================================================
    // Meetings
    // ========================================================================

    pub async fn upcoming_meetings(&self, days: u32) -> Result<Vec<MeetingSummary>> {
        self.meetings.upcoming(Utc::now(), days).await
    }

    pub async fn schedule_meeting(&self, request: MeetingRequest) -> Result<MeetingSummary> {
        if request.title.trim().is_empty() {
            return Err(AssistantError::InvalidInput("Meeting title is required".to_string()));
        }
        self.meetings.schedule(request).await
    }

    // ========================================================================
    // Stale-task reminders
    // ========================================================================

    pub async fn remind_stale(&self) -> Result<ReminderReport> {
        self.remind_stale_at(Utc::now()).await
    }

    /// Email the owner of every stale task and note it on the card.
    ///
    /// A missing mail configuration aborts the run; any other per-task
    /// failure is logged and the task counted as skipped.
    pub async fn remind_stale_at(&self, now: DateTime<Utc>) -> Result<ReminderReport> {
        let records = self.tasks.fetch_tasks().await?;
        let stale = stale_tasks(&records, now, self.settings.stale_after_days);

        let mut report = ReminderReport {
            checked: stale.len(),
            ..Default::default()
        };

        for task in stale {
            match self.remind_owner(task, now).await {
                Ok(Some(owner)) => report.record_sent(task, owner),
                Ok(None) => report.record_skipped(),
                Err(e) if e.is_unavailable() => return Err(e),
                Err(e) => {
                    warn!(task_id = %task.id, error = %e, "Failed to send reminder");
                    report.record_skipped();
                }
            }
        }

        info!(
            checked = report.checked,
            sent = report.reminders_sent,
            skipped = report.skipped,
            "Stale-task reminder run finished"
        );
        Ok(report)
    }

    /// Returns the owner's name when a reminder went out.
    async fn remind_owner(&self, task: &TaskRecord, now: DateTime<Utc>) -> Result<Option<String>> {
        let Some(owner_id) = task.owner_id.as_deref() else {
            debug!(task_id = %task.id, "Stale task has no owner");
            return Ok(None);
        };
        let Some(member) = self.tasks.resolve_member(owner_id).await? else {
            warn!(task_id = %task.id, owner_id, "Owner not found on the board");
            return Ok(None);
        };
        let Some(contact) = self.team_member_for(&member) else {
            warn!(task_id = %task.id, owner = %member.name, "No email on file for owner");
            return Ok(None);
        };

        let age = age_in_days(task, now);
        self.notifier
            .send_email(stale_reminder_email(&contact.email, &member.name, task, age))
            .await?;

        let note = format!(
            "Reminder sent to {} after {} days without activity.",
            member.name, age
        );
        if let Err(e) = self.tasks.add_comment(&task.id, &note).await {
            warn!(task_id = %task.id, error = %e, "Failed to comment on card");
        }

        Ok(Some(member.name))
    }

    // ========================================================================
    // Team directory
    // ========================================================================

    /// Team entry for a spoken name: full name, first name or username.
    fn team_member_named(&self, person: &str) -> Option<&TeamMember> {
        let person = person.trim();
        self.team.iter().find(|m| m.name.eq_ignore_ascii_case(person)).or_else(|| {
            self.team.iter().find(|m| {
                m.name
                    .split_whitespace()
                    .next()
                    .is_some_and(|first| first.eq_ignore_ascii_case(person))
                    || m.username
                        .as_deref()
                        .is_some_and(|u| u.eq_ignore_ascii_case(person))
            })
        })
    }

    /// Team entry for a board member: member id, then username, then name.
    fn team_member_for(&self, member: &MemberRef) -> Option<&TeamMember> {
        self.team
            .iter()
            .find(|m| m.member_id.as_deref() == Some(member.id.as_str()))
            .or_else(|| {
                self.team.iter().find(|m| {
                    !member.username.is_empty()
                        && m.username
                            .as_deref()
                            .is_some_and(|u| u.eq_ignore_ascii_case(&member.username))
                })
            })
            .or_else(|| {
                self.team
                    .iter()
                    .find(|m| m.name.eq_ignore_ascii_case(&member.name))
            })
    }
}
