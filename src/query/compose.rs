//! Reply text for classified chat messages.

use crate::query::types::{Intent, MeetingDetails};
use crate::services::capitalize;
use crate::tasks::{AnnotatedTask, ProjectSnapshot, DEFAULT_HORIZON_DAYS};

/// Data gathered for an intent before composing the reply.
#[derive(Debug, Clone)]
pub struct ReplyData {
    pub due_tasks: Vec<AnnotatedTask>,
    /// `None` when the board or calendar could not supply figures.
    pub snapshot: Option<ProjectSnapshot>,
    pub horizon_days: u32,
}

impl Default for ReplyData {
    fn default() -> Self {
        Self {
            due_tasks: Vec::new(),
            snapshot: None,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl ReplyData {
    pub fn with_due_tasks(mut self, tasks: Vec<AnnotatedTask>) -> Self {
        self.due_tasks = tasks;
        self
    }

    pub fn with_snapshot(mut self, snapshot: ProjectSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_horizon(mut self, days: u32) -> Self {
        self.horizon_days = days;
        self
    }
}

pub const HELP_MESSAGE: &str = "I'm here to help with project management tasks. You can ask me about pending tasks, schedule meetings, or send reminders. For example, try asking 'What tasks are due?'";

/// Compose the reply for `intent`.
pub fn compose(intent: &Intent, data: &ReplyData) -> String {
    match intent {
        Intent::DueTasks => due_tasks_reply(&data.due_tasks, data.horizon_days),
        Intent::Reminder { person, subject } => format!(
            "I've sent a reminder to {} about '{}'. They'll receive an email notification shortly.",
            capitalize(person),
            subject
        ),
        Intent::ScheduleMeeting(details) => match (&details.date_text, &details.time_text) {
            (Some(date), Some(time)) => format!(
                "I've scheduled a meeting for {} at {} with {}. Calendar invites have been sent.",
                date,
                time,
                attendee_list(&details.attendees)
            ),
            _ => clarification(details),
        },
        Intent::ProjectStatus => match &data.snapshot {
            Some(snapshot) => status_reply(snapshot, data.horizon_days),
            None => "I couldn't get the project status right now. Please try again once the board and calendar are reachable.".to_string(),
        },
        Intent::Unknown => HELP_MESSAGE.to_string(),
    }
}

/// Reply for a complete meeting request whose date or time could not be read.
pub fn unresolved_meeting(details: &MeetingDetails) -> String {
    format!(
        "I couldn't work out when '{} at {}' is. Could you give a day such as 'monday', 'tomorrow' or 'march 14' and a time such as '10am' or '2:30 pm'?",
        details.date_text.as_deref().unwrap_or_default(),
        details.time_text.as_deref().unwrap_or_default()
    )
}

fn due_tasks_reply(tasks: &[AnnotatedTask], horizon_days: u32) -> String {
    if tasks.is_empty() {
        return format!(
            "You don't have any tasks due in the next {} days. You're all caught up!",
            horizon_days
        );
    }

    let mut reply = format!(
        "You have {} {} due in the next {} days:\n\n",
        tasks.len(),
        if tasks.len() == 1 { "task" } else { "tasks" },
        horizon_days
    );
    for task in tasks {
        reply.push_str(&format!(
            "- {} (Due: {}, Assigned to: {})\n",
            task.title,
            task.due_date.format("%Y-%m-%d"),
            task.owner_name()
        ));
    }
    reply
}

fn clarification(details: &MeetingDetails) -> String {
    let missing = details.missing();
    if missing.len() == 2 {
        return "I'd be happy to schedule a meeting. Could you provide the date, time, and attendees for the meeting?".to_string();
    }
    format!(
        "I'd be happy to schedule a meeting. Could you provide the {} for the meeting?",
        missing.join(" and ")
    )
}

fn attendee_list(attendees: &[String]) -> String {
    if attendees.is_empty() {
        return "you".to_string();
    }
    attendees
        .iter()
        .map(|name| {
            if name.contains('@') {
                name.clone()
            } else {
                capitalize(name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn status_reply(snapshot: &ProjectSnapshot, horizon_days: u32) -> String {
    if snapshot.total == 0 {
        return "There are no tasks on the board yet.".to_string();
    }

    let mut reply = format!(
        "{} of {} tasks are complete ({}%) and {} in progress. {} due in the next {} days and {} overdue.",
        snapshot.completed,
        snapshot.total,
        snapshot.percent_complete(),
        snapshot.in_progress,
        snapshot.due_soon,
        horizon_days,
        snapshot.overdue
    );

    match &snapshot.next_meeting {
        Some(meeting) => reply.push_str(&format!(
            " Next meeting: {} on {} at {}.",
            meeting.title, meeting.date, meeting.time
        )),
        None => reply.push_str(" No meetings are coming up."),
    }
    reply
}
