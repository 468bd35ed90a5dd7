//! End-to-end chat and reminder scenarios.

use chrono::{Duration, TimeZone, Utc};
use pm_assistant::{AssistantError, MeetingSummary, NewTask};

use crate::fakes::{
    lists, now, sample_board, FakeBoard, FakeCalendar, FakeMailer, Harness, TODO,
};

#[tokio::test]
async fn test_due_tasks_reply_lists_open_tasks_in_window() {
    let harness = Harness::with_board(sample_board());

    let reply = harness
        .assistant
        .respond_at("What tasks are due this week?", now())
        .await
        .unwrap();

    assert_eq!(
        reply,
        "You have 1 task due in the next 7 days:\n\n\
         - Prepare Q1 report (Due: 2025-03-11, Assigned to: Alice Smith)\n"
    );
}

#[tokio::test]
async fn test_due_tasks_reply_when_caught_up() {
    let harness = Harness::with_board(FakeBoard::default());

    let reply = harness
        .assistant
        .respond_at("Any deadlines on my tasks?", now())
        .await
        .unwrap();

    assert_eq!(
        reply,
        "You don't have any tasks due in the next 7 days. You're all caught up!"
    );
}

#[tokio::test]
async fn test_due_tasks_with_unknown_owner_are_unassigned() {
    let board = FakeBoard::with_tasks(vec![pm_assistant::TaskRecord::new(
        "c9",
        "Orphaned",
        TODO,
        &lists(),
    )
    .with_due(now() + Duration::days(2))
    .with_owner("m-gone")]);
    let harness = Harness::with_board(board);

    let tasks = harness.assistant.due_at(now(), 7).await.unwrap();
    assert_eq!(tasks.len(), 1);
    // a member the board no longer knows leaves the task unassigned
    assert_eq!(tasks[0].owner_name(), "Unassigned");
}

#[tokio::test]
async fn test_due_tasks_fail_when_board_unreachable() {
    let board = FakeBoard {
        unreachable: true,
        ..Default::default()
    };
    let harness = Harness::with_board(board);

    let err = harness
        .assistant
        .respond_at("What's due?", now())
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::Service(_)));
}

#[tokio::test]
async fn test_reminder_emails_team_member() {
    let harness = Harness::with_board(sample_board());

    let reply = harness
        .assistant
        .respond_at("Remind bob about the budget review.", now())
        .await
        .unwrap();

    assert_eq!(
        reply,
        "I've sent a reminder to Bob about 'the budget review'. They'll receive an email notification shortly."
    );
    let sent = harness.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "bob@example.com");
    assert_eq!(sent[0].subject, "Reminder: the budget review");
    assert!(sent[0].body.starts_with("Hi Bob Jones,"));
}

#[tokio::test]
async fn test_reminder_for_unknown_person_is_rejected() {
    let harness = Harness::with_board(sample_board());

    let err = harness
        .assistant
        .respond_at("remind zed to file the expenses", now())
        .await
        .unwrap_err();

    assert!(matches!(err, AssistantError::UnknownTeamMember(ref name) if name == "Zed"));
    assert!(err.is_bad_request());
    assert!(harness.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_schedule_meeting_books_calendar_event() {
    let harness = Harness::with_board(sample_board());

    let reply = harness
        .assistant
        .respond_at(
            "Schedule a meeting with alice and carol@example.com on friday at 3pm",
            now(),
        )
        .await
        .unwrap();

    assert_eq!(
        reply,
        "I've scheduled a meeting for friday at 3pm with Alice, carol@example.com. Calendar invites have been sent."
    );

    let booked = harness.calendar.booked();
    assert_eq!(booked.len(), 1);
    let request = &booked[0];
    assert_eq!(request.title, "Meeting with Alice, carol@example.com");
    // Friday 2025-03-14, 15:00 EDT
    assert_eq!(request.start, Utc.with_ymd_and_hms(2025, 3, 14, 19, 0, 0).unwrap());
    assert_eq!(request.end - request.start, Duration::minutes(60));
    assert_eq!(request.attendees, vec!["carol@example.com".to_string()]);
    assert_eq!(request.description, "Attendees: Alice");
}

#[tokio::test]
async fn test_schedule_meeting_asks_for_missing_time() {
    let harness = Harness::with_board(sample_board());

    let reply = harness
        .assistant
        .respond_at("schedule a meeting with bob on monday", now())
        .await
        .unwrap();

    assert_eq!(
        reply,
        "I'd be happy to schedule a meeting. Could you provide the time for the meeting?"
    );
    assert!(harness.calendar.booked().is_empty());
}

#[tokio::test]
async fn test_schedule_meeting_asks_for_everything() {
    let harness = Harness::with_board(sample_board());

    let reply = harness
        .assistant
        .respond_at("Schedule a meeting", now())
        .await
        .unwrap();

    assert!(reply.starts_with("I'd be happy to schedule a meeting."));
    assert!(harness.calendar.booked().is_empty());
}

#[tokio::test]
async fn test_schedule_meeting_with_unreadable_date() {
    let harness = Harness::with_board(sample_board());

    let reply = harness
        .assistant
        .respond_at("schedule a meeting on someday at 10am", now())
        .await
        .unwrap();

    assert!(reply.starts_with("I couldn't work out when 'someday at 10am' is."));
    assert!(harness.calendar.booked().is_empty());
}

#[tokio::test]
async fn test_project_status_reply() {
    let calendar = FakeCalendar {
        meetings: vec![MeetingSummary::new(
            "e1",
            "Standup",
            now() + Duration::hours(25),
            chrono_tz::America::New_York,
        )],
        ..Default::default()
    };
    let harness = Harness::new(sample_board(), calendar, FakeMailer::default());

    let reply = harness
        .assistant
        .respond_at("How is the project going?", now())
        .await
        .unwrap();

    assert_eq!(
        reply,
        "1 of 5 tasks are complete (20%) and 1 in progress. 1 due in the next 7 days and 1 overdue. \
         Next meeting: Standup on 2025-03-11 at 11:00 AM."
    );
}

#[tokio::test]
async fn test_project_status_survives_calendar_outage() {
    let calendar = FakeCalendar {
        configured: false,
        ..Default::default()
    };
    let harness = Harness::new(sample_board(), calendar, FakeMailer::default());

    let snapshot = harness.assistant.status_at(now()).await.unwrap();
    assert_eq!(snapshot.total, 5);
    assert!(snapshot.next_meeting.is_none());
}

#[tokio::test]
async fn test_project_status_reply_when_board_unreachable() {
    let board = FakeBoard {
        unreachable: true,
        ..Default::default()
    };
    let harness = Harness::with_board(board);

    let reply = harness
        .assistant
        .respond_at("project status", now())
        .await
        .unwrap();

    assert!(reply.starts_with("I couldn't get the project status right now."));
}

#[tokio::test]
async fn test_unknown_message_gets_help() {
    let harness = Harness::with_board(sample_board());

    let reply = harness.assistant.respond_at("hello there", now()).await.unwrap();
    assert!(reply.starts_with("I'm here to help with project management tasks."));
}

#[tokio::test]
async fn test_stale_reminders_email_owner_and_comment_on_card() {
    let harness = Harness::with_board(sample_board());

    let report = harness.assistant.remind_stale_at(now()).await.unwrap();

    assert_eq!(report.checked, 1);
    assert_eq!(report.reminders_sent, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.tasks[0].id, "c4");
    assert_eq!(report.tasks[0].owner, "Alice Smith");

    let sent = harness.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert_eq!(sent[0].subject, "Reminder: Task 'Update roadmap' needs attention");
    assert!(sent[0].body.contains("was created 5 days ago"));

    assert_eq!(
        harness.board.comments(),
        vec![(
            "c4".to_string(),
            "Reminder sent to Alice Smith after 5 days without activity.".to_string()
        )]
    );
}

#[tokio::test]
async fn test_stale_reminders_skip_tasks_without_owner_email() {
    let lists = lists();
    let board = FakeBoard::with_tasks(vec![
        pm_assistant::TaskRecord::new("s1", "Nobody's job", TODO, &lists)
            .with_created_at(now() - Duration::days(6)),
        pm_assistant::TaskRecord::new("s2", "Contractor work", TODO, &lists)
            .with_owner("m-carol")
            .with_created_at(now() - Duration::days(6)),
    ])
    .with_member(crate::fakes::member("m-carol", "Carol White", "carolw"));
    let harness = Harness::with_board(board);

    let report = harness.assistant.remind_stale_at(now()).await.unwrap();

    assert_eq!(report.checked, 2);
    assert_eq!(report.reminders_sent, 0);
    assert_eq!(report.skipped, 2);
    assert!(harness.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_stale_reminders_abort_without_mail_configuration() {
    let harness = Harness::new(
        sample_board(),
        FakeCalendar::default(),
        FakeMailer::unconfigured(),
    );

    let err = harness.assistant.remind_stale_at(now()).await.unwrap_err();
    assert!(err.is_unavailable());
    assert!(harness.board.comments().is_empty());
}

#[tokio::test]
async fn test_create_task_requires_title() {
    let harness = Harness::with_board(FakeBoard::default());

    let err = harness
        .assistant
        .create_task(NewTask::new("   "))
        .await
        .unwrap_err();
    assert!(err.is_bad_request());

    let mut task = NewTask::new("Draft agenda");
    task.priority = "high".to_string();
    let record = harness.assistant.create_task(task).await.unwrap();
    assert_eq!(record.description, "\n\nPriority: High");
    assert_eq!(record.list_id, TODO);
}
