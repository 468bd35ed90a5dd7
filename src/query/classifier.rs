//! Chat Intent Classifier.
//!
//! Classifies chat messages into a closed set of intents with a fixed,
//! ordered table of pattern rules. The first rule whose trigger matches
//! decides the intent; if its extractor cannot pull the parameters out,
//! the message is [`Intent::Unknown`].

use std::sync::LazyLock;

use regex::Regex;

use super::types::*;

// ============================================================================
// Rules
// ============================================================================

/// One classification rule.
struct Rule {
    name: &'static str,
    /// Tested against the lower-cased message.
    matches: fn(&str) -> bool,
    /// Given the trimmed message as written.
    extract: fn(&str) -> Option<Intent>,
}

/// Rules in priority order.
static RULES: [Rule; 4] = [
    Rule {
        name: "due_tasks",
        matches: |text| DUE_PATTERN.is_match(text),
        extract: |_| Some(Intent::DueTasks),
    },
    Rule {
        name: "reminder",
        matches: |text| REMIND_TRIGGER.is_match(text),
        extract: extract_reminder,
    },
    Rule {
        name: "schedule_meeting",
        matches: |text| SCHEDULE_PATTERN.is_match(text),
        extract: |text| Some(Intent::ScheduleMeeting(extract_meeting(text))),
    },
    Rule {
        name: "project_status",
        matches: |text| STATUS_PATTERN.is_match(text),
        extract: |_| Some(Intent::ProjectStatus),
    },
];

// ============================================================================
// Intent Classifier
// ============================================================================

/// Classifies chat messages into intents.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a chat message. Never fails; unmatched text is `Unknown`.
    pub fn classify(&self, message: &str) -> Intent {
        let message = message.trim();
        let lower = message.to_lowercase();

        for rule in RULES.iter() {
            if (rule.matches)(&lower) {
                let intent = (rule.extract)(message).unwrap_or(Intent::Unknown);
                tracing::debug!(rule = rule.name, intent = intent.display_name(), "Classified message");
                return intent;
            }
        }

        Intent::Unknown
    }

    /// Rule names in the order they are tried.
    pub fn rule_names(&self) -> Vec<&'static str> {
        RULES.iter().map(|rule| rule.name).collect()
    }
}

// ============================================================================
// Parameter Extraction
// ============================================================================

fn extract_reminder(text: &str) -> Option<Intent> {
    let caps = REMIND_PATTERN.captures(text)?;
    let person = caps.get(1)?.as_str().to_string();
    let subject = strip_trailing_punctuation(caps.get(2)?.as_str().trim());
    if subject.is_empty() {
        return None;
    }
    Some(Intent::Reminder {
        person,
        subject: subject.to_string(),
    })
}

fn extract_meeting(text: &str) -> MeetingDetails {
    let text = strip_trailing_punctuation(text);
    let mut details = MeetingDetails::new();

    let date = DATE_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|date| !is_filler(date));
    if let Some(date) = date {
        details = details.with_date(date.to_lowercase());
    }

    if let Some(time) = TIME_PATTERN.captures(text).and_then(|caps| caps.get(1)) {
        details = details.with_time(time.as_str().trim().to_lowercase());
    }

    if let Some(names) = ATTENDEES_PATTERN.captures(text).and_then(|caps| caps.get(1)) {
        let attendees: Vec<&str> = LIST_SEPARATOR
            .split(names.as_str())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();
        details = details.with_attendees(attendees);
    }

    details
}

/// "for the team" and the like name no date.
fn is_filler(date: &str) -> bool {
    let first = date.split_whitespace().next().unwrap_or_default();
    matches!(
        first.to_lowercase().as_str(),
        "the" | "a" | "an" | "my" | "our" | "us" | "me" | "everyone"
    )
}

fn strip_trailing_punctuation(text: &str) -> &str {
    text.trim_end_matches(['.', '?', '!']).trim_end()
}

// ============================================================================
// Regex Patterns (using LazyLock for static initialization)
// ============================================================================

static DUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\btasks?\b.*(due|deadline)|(due|deadline).*\btasks?\b|\bwhat\b.+due")
        .expect("Invalid regex")
});
static REMIND_TRIGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bremind\b").expect("Invalid regex"));
static REMIND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bremind\s+(\w+)\s+(?:about|to|of)\s+(.+)").expect("Invalid regex")
});
static SCHEDULE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bschedule\s+(?:a\s+)?meeting\b").expect("Invalid regex"));
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:on|for)\s+(\w+(?:\s+\d+)?)").expect("Invalid regex")
});
static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bat\s+(\d{1,2}(?::\d{2})?\s*(?:am|pm)?)").expect("Invalid regex")
});
static ATTENDEES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwith\s+(.+?)(?:\s+on\b|\s+at\b|\s+for\b|\s*$)").expect("Invalid regex")
});
static LIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*,\s*(?:and\s+)?|\s+and\s+").expect("Invalid regex"));
static STATUS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"project|status|progress|\bhow\b.+going").expect("Invalid regex")
});
