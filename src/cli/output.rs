//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable text.

use anyhow::Result;
use pm_assistant::{
    query::Intent,
    tasks::{AnnotatedTask, ReminderReport},
};
use serde::Serialize;

use super::types::StatusResult;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a chat reply.
pub fn print_reply(reply: &str, json: bool) -> Result<()> {
    if json {
        return print_json(&serde_json::json!({ "response": reply }));
    }
    println!("{}", reply.trim_end());
    Ok(())
}

/// Print a classified intent.
pub fn print_intent(intent: &Intent, json: bool) -> Result<()> {
    if json {
        return print_json(intent);
    }

    println!("Intent: {}", intent.display_name());
    match intent {
        Intent::Reminder { person, subject } => {
            println!("Person:  {}", person);
            println!("Subject: {}", subject);
        }
        Intent::ScheduleMeeting(details) => {
            println!("Date:      {}", details.date_text.as_deref().unwrap_or("(missing)"));
            println!("Time:      {}", details.time_text.as_deref().unwrap_or("(missing)"));
            if details.attendees.is_empty() {
                println!("Attendees: (none)");
            } else {
                println!("Attendees: {}", details.attendees.join(", "));
            }
        }
        Intent::DueTasks | Intent::ProjectStatus | Intent::Unknown => {}
    }
    Ok(())
}

/// Print tasks due soon.
pub fn print_due_tasks(tasks: &[AnnotatedTask], days: Option<u32>, json: bool) -> Result<()> {
    if json {
        return print_json(tasks);
    }

    let window = days
        .map(|d| format!("in the next {} days", d))
        .unwrap_or_else(|| "soon".to_string());
    if tasks.is_empty() {
        println!("No tasks due {}.", window);
        return Ok(());
    }

    println!("{} task(s) due {}\n", tasks.len(), window);
    for task in tasks {
        println!(
            "  {}  [{}] {}",
            task.due_date.format("%Y-%m-%d"),
            task.status,
            task.title
        );
        println!("              Assigned to: {}", task.owner_name());
    }
    Ok(())
}

/// Print the project status.
pub fn print_status(result: &StatusResult, json: bool) -> Result<()> {
    if json {
        return print_json(result);
    }

    let status = &result.status;
    println!("Project Status");
    println!("{}", "=".repeat(40));
    println!("Tasks:        {}", status.total);
    println!("Completed:    {} ({}%)", status.completed, status.percent_complete());
    println!("In progress:  {}", status.in_progress);
    println!("Due soon:     {}", status.due_soon);
    println!("Overdue:      {}", status.overdue);
    match &status.next_meeting {
        Some(meeting) => println!(
            "Next meeting: {} ({} {})",
            meeting.title, meeting.date, meeting.time
        ),
        None => println!("Next meeting: none"),
    }
    println!("\n{}", result.summary);
    Ok(())
}

/// Print a stale-task reminder report.
pub fn print_reminder_report(report: &ReminderReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }

    println!(
        "Checked {} stale task(s): {} reminder(s) sent, {} skipped",
        report.checked, report.reminders_sent, report.skipped
    );
    for task in &report.tasks {
        println!("  - {} -> {}", task.title, task.owner);
    }
    Ok(())
}
