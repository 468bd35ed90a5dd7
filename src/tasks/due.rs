//! Due-window aggregation.

use chrono::{DateTime, Duration, Utc};

use crate::services::MemberDirectory;
use crate::tasks::types::{AnnotatedTask, MemberRef, TaskRecord};

/// Default size of the due window in days.
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Largest window accepted from callers and configuration.
pub const MAX_HORIZON_DAYS: u32 = 3650;

/// Inclusive time range `[now, now + days]` that counts as "due soon".
///
/// Built per query from the caller's `now`; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    days: u32,
}

impl DueWindow {
    /// The end saturates at the latest representable instant.
    pub fn new(now: DateTime<Utc>, days: u32) -> Self {
        let end = Duration::try_days(i64::from(days))
            .and_then(|span| now.checked_add_signed(span))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            start: now,
            end,
            days,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Has a due date inside the window and is not done.
    pub fn admits(&self, task: &TaskRecord) -> bool {
        match task.due {
            Some(due) => self.contains(due) && !task.is_done(),
            None => false,
        }
    }
}

/// Records due inside `window`, in input order.
pub fn select_due<'a>(
    tasks: &'a [TaskRecord],
    window: &DueWindow,
) -> impl Iterator<Item = &'a TaskRecord> + 'a {
    let window = *window;
    tasks.iter().filter(move |task| window.admits(task))
}

/// Tasks due within `horizon_days` of `now`, with owners resolved.
///
/// Owners are looked up one at a time through `members`. A task without an
/// owner gets `None`; a failed lookup is logged and yields a placeholder
/// member so one bad lookup never sinks the whole query.
pub async fn due_soon<M>(
    tasks: &[TaskRecord],
    now: DateTime<Utc>,
    horizon_days: u32,
    members: &M,
) -> Vec<AnnotatedTask>
where
    M: MemberDirectory + ?Sized,
{
    let window = DueWindow::new(now, horizon_days);
    let mut annotated = Vec::new();

    for task in select_due(tasks, &window) {
        let owner = match task.owner_id.as_deref() {
            Some(owner_id) => resolve_owner(members, &task.id, owner_id).await,
            None => None,
        };

        // select_due only admits records with a due date
        let Some(due_date) = task.due else { continue };

        annotated.push(AnnotatedTask {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date,
            owner,
            status: task.status(),
        });
    }

    tracing::debug!(
        total = tasks.len(),
        due = annotated.len(),
        horizon_days,
        "Filtered due tasks"
    );

    annotated
}

async fn resolve_owner<M>(members: &M, task_id: &str, owner_id: &str) -> Option<MemberRef>
where
    M: MemberDirectory + ?Sized,
{
    match members.resolve_member(owner_id).await {
        Ok(member) => member,
        Err(e) => {
            tracing::warn!(task_id, owner_id, error = %e, "Member lookup failed");
            Some(MemberRef::unresolved(owner_id))
        }
    }
}
