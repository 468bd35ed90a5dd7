//! Detection of tasks that have gone quiet.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::tasks::types::TaskRecord;

/// Whether `task` has sat untouched for at least `after_days`.
///
/// Records without a creation time are never stale. A missing last
/// activity counts as the creation time.
pub fn is_stale(task: &TaskRecord, now: DateTime<Utc>, after_days: u32) -> bool {
    if task.is_done() {
        return false;
    }
    let Some(created_at) = task.created_at else {
        return false;
    };

    let cutoff = Duration::try_days(i64::from(after_days))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let last_touched = task.last_activity.unwrap_or(created_at).max(created_at);
    created_at <= cutoff && last_touched <= cutoff
}

/// Stale records, in input order.
pub fn stale_tasks<'a>(
    tasks: &'a [TaskRecord],
    now: DateTime<Utc>,
    after_days: u32,
) -> Vec<&'a TaskRecord> {
    tasks
        .iter()
        .filter(|task| is_stale(task, now, after_days))
        .collect()
}

/// Whole days since the record was created.
pub fn age_in_days(task: &TaskRecord, now: DateTime<Utc>) -> i64 {
    task.created_at
        .map(|created| (now - created).num_days().max(0))
        .unwrap_or(0)
}

/// A task that received a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemindedTask {
    pub id: String,
    pub title: String,
    pub owner: String,
}

/// Outcome of one stale-task reminder run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderReport {
    /// Stale tasks considered.
    pub checked: usize,
    pub reminders_sent: usize,
    /// Stale tasks with no owner, no team entry or a failed delivery.
    pub skipped: usize,
    pub tasks: Vec<RemindedTask>,
}

impl ReminderReport {
    pub fn record_sent(&mut self, task: &TaskRecord, owner: impl Into<String>) {
        self.reminders_sent += 1;
        self.tasks.push(RemindedTask {
            id: task.id.clone(),
            title: task.title.clone(),
            owner: owner.into(),
        });
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }
}
