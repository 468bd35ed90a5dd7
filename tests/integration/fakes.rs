//! In-memory collaborators that record what the assistant asked of them.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;

use pm_assistant::{
    config::Config, error::Result, Assistant, EmailMessage, ListMapping, MeetingRequest,
    MeetingSource, MeetingSummary, MemberDirectory, MemberRef, NewTask, Notifier, ServiceError,
    TaskRecord, TaskSource, TeamMember,
};

pub const TODO: &str = "list-todo";
pub const DOING: &str = "list-doing";
pub const DONE: &str = "list-done";

/// Monday 2025-03-10, 14:00 UTC (10:00 in New York).
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap()
}

pub fn lists() -> ListMapping {
    ListMapping::new(
        Some(TODO.to_string()),
        Some(DOING.to_string()),
        Some(DONE.to_string()),
    )
}

pub fn member(id: &str, name: &str, username: &str) -> MemberRef {
    MemberRef {
        id: id.to_string(),
        name: name.to_string(),
        initials: name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .collect(),
        username: username.to_string(),
    }
}

// ============================================================================
// Board
// ============================================================================

#[derive(Default)]
pub struct FakeBoard {
    pub tasks: Mutex<Vec<TaskRecord>>,
    pub members: HashMap<String, MemberRef>,
    pub created: Mutex<Vec<NewTask>>,
    pub comments: Mutex<Vec<(String, String)>>,
    pub unreachable: bool,
}

impl FakeBoard {
    pub fn with_tasks(tasks: Vec<TaskRecord>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            ..Default::default()
        }
    }

    pub fn with_member(mut self, member: MemberRef) -> Self {
        self.members.insert(member.id.clone(), member);
        self
    }

    pub fn comments(&self) -> Vec<(String, String)> {
        self.comments.lock().unwrap().clone()
    }

    fn check(&self) -> Result<()> {
        if self.unreachable {
            return Err(ServiceError::Api {
                service: "Trello",
                status: 502,
                detail: "Bad gateway".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for FakeBoard {
    async fn resolve_member(&self, member_id: &str) -> Result<Option<MemberRef>> {
        self.check()?;
        Ok(self.members.get(member_id).cloned())
    }
}

#[async_trait]
impl TaskSource for FakeBoard {
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>> {
        self.check()?;
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn create_task(&self, task: NewTask) -> Result<TaskRecord> {
        self.check()?;
        let mut tasks = self.tasks.lock().unwrap();
        let mut record = TaskRecord::new(
            format!("card-{}", tasks.len() + 1),
            task.title.clone(),
            TODO,
            &lists(),
        )
        .with_description(task.card_description())
        .with_created_at(now());
        if let Some(due) = task.due {
            record = record.with_due(due);
        }
        if let Some(owner) = &task.owner_id {
            record = record.with_owner(owner.clone());
        }
        tasks.push(record.clone());
        self.created.lock().unwrap().push(task);
        Ok(record)
    }

    async fn add_comment(&self, task_id: &str, text: &str) -> Result<()> {
        self.check()?;
        self.comments
            .lock()
            .unwrap()
            .push((task_id.to_string(), text.to_string()));
        Ok(())
    }
}

// ============================================================================
// Calendar
// ============================================================================

pub struct FakeCalendar {
    pub tz: Tz,
    pub meetings: Vec<MeetingSummary>,
    pub booked: Mutex<Vec<MeetingRequest>>,
    pub configured: bool,
}

impl Default for FakeCalendar {
    fn default() -> Self {
        Self {
            tz: chrono_tz::America::New_York,
            meetings: Vec::new(),
            booked: Mutex::new(Vec::new()),
            configured: true,
        }
    }
}

impl FakeCalendar {
    pub fn booked(&self) -> Vec<MeetingRequest> {
        self.booked.lock().unwrap().clone()
    }

    fn check(&self) -> Result<()> {
        if !self.configured {
            return Err(ServiceError::not_configured("Google Calendar", "API key not configured").into());
        }
        Ok(())
    }
}

#[async_trait]
impl MeetingSource for FakeCalendar {
    async fn upcoming(&self, now: DateTime<Utc>, days: u32) -> Result<Vec<MeetingSummary>> {
        self.check()?;
        let end = now + Duration::days(i64::from(days));
        let mut meetings: Vec<MeetingSummary> = self
            .meetings
            .iter()
            .filter(|m| m.start >= now && m.start <= end)
            .cloned()
            .collect();
        meetings.sort_by_key(|m| m.start);
        Ok(meetings)
    }

    async fn schedule(&self, request: MeetingRequest) -> Result<MeetingSummary> {
        self.check()?;
        let mut booked = self.booked.lock().unwrap();
        let summary = MeetingSummary::new(
            format!("event-{}", booked.len() + 1),
            request.title.clone(),
            request.start,
            self.tz,
        )
        .with_description(request.description.clone())
        .with_attendees(request.attendees.clone());
        booked.push(request);
        Ok(summary)
    }
}

// ============================================================================
// Mail
// ============================================================================

pub struct FakeMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub configured: bool,
}

impl Default for FakeMailer {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            configured: true,
        }
    }
}

impl FakeMailer {
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeMailer {
    async fn send_email(&self, message: EmailMessage) -> Result<()> {
        if !self.configured {
            return Err(ServiceError::not_configured("Mail", "credentials not configured").into());
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub fn team() -> Vec<TeamMember> {
    vec![
        TeamMember {
            name: "Alice Smith".to_string(),
            email: "alice@example.com".to_string(),
            member_id: Some("m-alice".to_string()),
            username: Some("alices".to_string()),
        },
        TeamMember {
            name: "Bob Jones".to_string(),
            email: "bob@example.com".to_string(),
            member_id: None,
            username: Some("bobj".to_string()),
        },
    ]
}

pub fn config() -> Config {
    let mut config = Config::default();
    config.team = team();
    config
}

/// Collaborators plus the assistant wired over them.
pub struct Harness {
    pub board: Arc<FakeBoard>,
    pub calendar: Arc<FakeCalendar>,
    pub mailer: Arc<FakeMailer>,
    pub assistant: Arc<Assistant>,
}

impl Harness {
    pub fn new(board: FakeBoard, calendar: FakeCalendar, mailer: FakeMailer) -> Self {
        let board = Arc::new(board);
        let calendar = Arc::new(calendar);
        let mailer = Arc::new(mailer);
        let assistant = Assistant::new(
            board.clone(),
            calendar.clone(),
            mailer.clone(),
            &config(),
        )
        .unwrap();
        Self {
            board,
            calendar,
            mailer,
            assistant: Arc::new(assistant),
        }
    }

    pub fn with_board(board: FakeBoard) -> Self {
        Self::new(board, FakeCalendar::default(), FakeMailer::default())
    }
}

/// A small board: one task due tomorrow (Alice), one due in ten days,
/// one done, one stale with no activity (Alice), one in progress (Bob).
pub fn sample_board() -> FakeBoard {
    let lists = lists();
    let now = now();
    FakeBoard::with_tasks(vec![
        TaskRecord::new("c1", "Prepare Q1 report", TODO, &lists)
            .with_due(now + Duration::days(1))
            .with_owner("m-alice")
            .with_created_at(now - Duration::days(1))
            .with_last_activity(now - Duration::hours(2)),
        TaskRecord::new("c2", "Plan offsite", TODO, &lists)
            .with_due(now + Duration::days(10))
            .with_created_at(now - Duration::days(1)),
        TaskRecord::new("c3", "Ship beta", DONE, &lists)
            .with_due(now + Duration::days(2))
            .with_created_at(now - Duration::days(20)),
        TaskRecord::new("c4", "Update roadmap", TODO, &lists)
            .with_owner("m-alice")
            .with_created_at(now - Duration::days(5)),
        TaskRecord::new("c5", "Review designs", DOING, &lists)
            .with_due(now - Duration::days(1))
            .with_owner("m-bob")
            .with_created_at(now - Duration::days(1))
            .with_last_activity(now - Duration::hours(1)),
    ])
    .with_member(member("m-alice", "Alice Smith", "alices"))
    .with_member(member("m-bob", "Bob Jones", "bobj"))
}
