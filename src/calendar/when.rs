//! Resolution of spoken dates and times.
//!
//! The interpreter hands over raw fragments such as `"monday"`,
//! `"march 5"` or `"10:30 am"`. These helpers turn them into concrete
//! dates and times relative to a reference day, or give up with `None`.

use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Duration, Month, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use chrono_tz::Tz;
use regex::Regex;

/// Resolve a date fragment against `today`.
///
/// Accepts `today`, `tomorrow`, weekday names (the next occurrence, today
/// included) and `<month> <day>` (rolled into next year once past).
pub fn resolve_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim().to_lowercase();

    match text.as_str() {
        "today" | "tonight" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    let mut parts = text.split_whitespace();
    let first = parts.next()?;
    let second = parts.next();
    if parts.next().is_some() {
        return None;
    }

    match second {
        None => first
            .parse::<Weekday>()
            .ok()
            .map(|weekday| next_weekday(today, weekday)),
        Some(day) => {
            let month = first.parse::<Month>().ok()?;
            let day: u32 = day.parse().ok()?;
            month_day(today, month.number_from_month(), day)
        }
    }
}

/// Resolve a time fragment such as `10`, `10am`, `10:30` or `10:30 pm`.
///
/// A bare hour from 1 to 7 is read as afternoon.
pub fn resolve_time(text: &str) -> Option<NaiveTime> {
    let caps = TIME_PATTERN.captures(text.trim())?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps
        .get(2)
        .map(|m| m.as_str().parse())
        .transpose()
        .ok()?
        .unwrap_or(0);

    match caps.get(3).map(|m| m.as_str().to_lowercase()) {
        Some(period) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            if period.starts_with('p') && hour != 12 {
                hour += 12;
            } else if period.starts_with('a') && hour == 12 {
                hour = 0;
            }
        }
        None => {
            if (1..=7).contains(&hour) {
                hour += 12;
            }
        }
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Resolve date and time fragments to an instant, reading them in `tz`.
pub fn resolve_start(
    date_text: &str,
    time_text: &str,
    now: DateTime<Utc>,
    tz: Tz,
) -> Option<DateTime<Utc>> {
    let today = now.with_timezone(&tz).date_naive();
    let date = resolve_date(date_text, today)?;
    let time = resolve_time(time_text)?;
    localize(date.and_time(time), tz)
}

/// Parse an ISO-8601 date-time. Values without an offset are read in `tz`.
pub fn parse_date_time(text: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .and_then(|naive| localize(naive, tz))
}

fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn next_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_monday();
    let target = target.num_days_from_monday();
    let days_ahead = (7 + target - current) % 7;
    today + Duration::days(i64::from(days_ahead))
}

fn month_day(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
    match this_year {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2})(?::(\d{2}))?\s*(am|pm|a\.m\.|p\.m\.)?$").expect("Invalid regex")
});
