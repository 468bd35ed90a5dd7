//! Project-wide aggregate counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{next_meeting, MeetingSummary};
use crate::tasks::due::{select_due, DueWindow};
use crate::tasks::types::{TaskRecord, TaskStatus};

/// Counts across every task on the board plus the next meeting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub due_soon: usize,
    pub overdue: usize,
    pub next_meeting: Option<MeetingSummary>,
}

impl ProjectSnapshot {
    pub fn build(
        tasks: &[TaskRecord],
        meetings: &[MeetingSummary],
        now: DateTime<Utc>,
        horizon_days: u32,
    ) -> Self {
        let window = DueWindow::new(now, horizon_days);
        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status() == status).count();

        Self {
            total: tasks.len(),
            completed: count(TaskStatus::Done),
            in_progress: count(TaskStatus::InProgress),
            due_soon: select_due(tasks, &window).count(),
            overdue: tasks.iter().filter(|t| t.is_overdue(now)).count(),
            next_meeting: next_meeting(meetings, now).cloned(),
        }
    }

    /// Completed share of all tasks, as a whole percentage.
    pub fn percent_complete(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100) / self.total) as u32
    }
}
