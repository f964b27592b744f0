#![forbid(unsafe_code)]

use crate::ValidationError;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// Normalizes a due date to `YYYY-MM-DDTHH:MM`.
///
/// An empty value yields `None`, which callers treat as "no due date".
pub fn normalize_due_at(raw: &str) -> Result<Option<String>, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let parsed = parse_due_at(value).ok_or_else(|| ValidationError::InvalidDueDate {
        value: value.to_string(),
    })?;
    Ok(Some(format_due_at(parsed)))
}

fn parse_due_at(value: &str) -> Option<PrimitiveDateTime> {
    let minutes = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    let seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let spaced_minutes = format_description!("[year]-[month]-[day] [hour]:[minute]");
    let spaced_seconds = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let date_only = format_description!("[year]-[month]-[day]");

    for format in [minutes, seconds, spaced_minutes, spaced_seconds] {
        if let Ok(parsed) = PrimitiveDateTime::parse(value, format) {
            return Some(parsed);
        }
    }
    Date::parse(value, date_only)
        .ok()
        .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
}

fn format_due_at(value: PrimitiveDateTime) -> String {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    value
        .format(format)
        .unwrap_or_else(|_| "1970-01-01T00:00".to_string())
}

/// Due dates carry no zone; they compare against UTC wall time in the same
/// canonical shape so string ordering matches chronological ordering.
pub fn due_at_from_ms(ts_ms: i64) -> String {
    let nanos = (ts_ms as i128) * 1_000_000i128;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    format_due_at(PrimitiveDateTime::new(dt.date(), dt.time()))
}

/// Milliseconds since the epoch for a due-style timestamp, read as UTC.
pub fn ms_from_due_at(raw: &str) -> Option<i64> {
    let parsed = parse_due_at(raw.trim())?;
    let nanos = parsed.assume_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).ok()
}

/// Like `normalize_due_at`, but a bare date means the last minute of that day
/// so it can close an inclusive range.
pub fn normalize_due_until(raw: &str) -> Result<Option<String>, ValidationError> {
    let value = raw.trim();
    let date_only = format_description!("[year]-[month]-[day]");
    match Date::parse(value, date_only) {
        Ok(date) => {
            let start = format_due_at(PrimitiveDateTime::new(date, Time::MIDNIGHT));
            let day = start.split('T').next().unwrap_or(&start);
            Ok(Some(format!("{day}T23:59")))
        }
        Err(_) => normalize_due_at(value),
    }
}

/// Day of the week of a UTC timestamp, `0` for Monday through `6` for Sunday.
pub fn weekday_index_from_ms(ts_ms: i64) -> usize {
    let nanos = (ts_ms as i128) * 1_000_000i128;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    usize::from(dt.weekday().number_days_from_monday())
}
