//! Event model: scheduled happenings with a date window.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Wire format for event start/end datetimes.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Full event row for the root surface and single-event lookups.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Event {
    pub unique_id: String,
    pub name: String,
    pub stripped: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub location: String,
    #[serde(rename = "start")]
    pub start_time: NaiveDateTime,
    #[serde(rename = "end")]
    pub end_time: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub views: i64,
    pub image: Option<String>,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public listing row: no description body.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventSummary {
    pub unique_id: String,
    pub name: String,
    pub stripped: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub location: String,
    #[serde(rename = "start")]
    pub start_time: NaiveDateTime,
    #[serde(rename = "end")]
    pub end_time: Option<NaiveDateTime>,
    pub views: i64,
    pub image: Option<String>,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = validate_window))]
pub struct CreateEvent {
    #[validate(length(min = 3, max = 300, message = "Invalid length (3 - 300) characters"))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 3, max = 20, message = "Invalid length (3 - 20) characters"))]
    pub kind: String,
    #[validate(length(min = 3, max = 300, message = "Invalid length (3 - 300) characters"))]
    pub location: String,
    #[validate(custom(function = validate_future_start))]
    pub start: String,
    pub end: Option<String>,
    #[validate(length(min = 3, max = 65535, message = "Invalid length (3 - 65535) characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEventName {
    #[validate(length(min = 3, max = 300, message = "Invalid length (3 - 300) characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEventType {
    #[serde(rename = "type")]
    #[validate(length(min = 3, max = 20, message = "Invalid length (3 - 20) characters"))]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEventLocation {
    #[validate(length(min = 3, max = 300, message = "Invalid length (3 - 300) characters"))]
    pub location: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = validate_duration_window))]
pub struct UpdateEventDuration {
    #[validate(custom(function = validate_future_start))]
    pub start: String,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEventDescription {
    #[validate(length(min = 3, max = 65535, message = "Invalid length (3 - 65535) characters"))]
    pub description: Option<String>,
}

/// Parse a wire datetime (`YYYY-MM-DD HH:mm`).
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).ok()
}

fn window_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn validate_future_start(start: &str) -> Result<(), ValidationError> {
    let parsed = parse_datetime(start).ok_or_else(|| {
        window_error("start_format", "Invalid start datetime format (YYYY-MM-DD HH:mm)")
    })?;
    if parsed <= Utc::now().naive_utc() {
        return Err(window_error("start_past", "Invalid start datetime"));
    }
    Ok(())
}

/// Struct-level check shared by create and duration update: when an end is
/// supplied it must parse and fall strictly after the start.
fn validate_window_parts(start: &str, end: Option<&str>) -> Result<(), ValidationError> {
    let Some(end) = end else {
        return Ok(());
    };
    let end_parsed = parse_datetime(end).ok_or_else(|| {
        window_error("end_format", "Invalid end datetime format (YYYY-MM-DD HH:mm)")
    })?;
    match parse_datetime(start) {
        Some(start_parsed) if start_parsed < end_parsed => Ok(()),
        _ => Err(window_error("end_before_start", "Invalid end datetime")),
    }
}

fn validate_window(event: &CreateEvent) -> Result<(), ValidationError> {
    validate_window_parts(&event.start, event.end.as_deref())
}

fn validate_duration_window(update: &UpdateEventDuration) -> Result<(), ValidationError> {
    validate_window_parts(&update.start, update.end.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_format_round_trip() {
        let parsed = parse_datetime("2031-05-20 18:30").unwrap();
        assert_eq!(parsed.format(DATETIME_FORMAT).to_string(), "2031-05-20 18:30");
        assert!(parse_datetime("2031-05-20T18:30").is_none());
        assert!(parse_datetime("20/05/2031 18:30").is_none());
    }

    #[test]
    fn future_start_accepted_past_rejected() {
        assert!(validate_future_start("2099-01-01 09:00").is_ok());
        assert!(validate_future_start("2001-01-01 09:00").is_err());
        assert!(validate_future_start("not a date").is_err());
    }

    #[test]
    fn end_must_follow_start() {
        assert!(validate_window_parts("2099-01-01 09:00", None).is_ok());
        assert!(validate_window_parts("2099-01-01 09:00", Some("2099-01-01 10:00")).is_ok());
        assert!(validate_window_parts("2099-01-01 09:00", Some("2099-01-01 09:00")).is_err());
        assert!(validate_window_parts("2099-01-01 09:00", Some("2098-12-31 09:00")).is_err());
        assert!(validate_window_parts("2099-01-01 09:00", Some("garbage")).is_err());
    }

    #[test]
    fn create_event_validation() {
        let event = CreateEvent {
            name: "Annual Lecture".into(),
            kind: "lecture".into(),
            location: "Main Hall".into(),
            start: "2099-03-01 10:00".into(),
            end: Some("2099-03-01 12:00".into()),
            description: None,
        };
        assert!(event.validate().is_ok());

        let bad = CreateEvent {
            end: Some("2099-03-01 09:00".into()),
            ..event
        };
        assert!(bad.validate().is_err());
    }
}
