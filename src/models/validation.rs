//! Request field validation
//!
//! Shared by the service layer before any store access. Everything here is
//! a pure structural check; state-dependent rules (uniqueness, capacity,
//! lifecycle) belong to the store and the services guarding it.

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::models::event::{CreateEventRequest, UpdateEventRequest};
use crate::models::user::{CreateUserRequest, UpdateProfileRequest};
use crate::utils::errors::{Result, VolunHubError};

const USERNAME_PATTERN: &str = r"^[a-zA-Z0-9_]+$";
const EMAIL_PATTERN: &str = r"^\S+@\S+\.\S+$";
const PHONE_PATTERN: &str = r"^[0-9]{10}$";
const EVENT_TITLE_PATTERN: &str = r"^[a-zA-Z0-9 _-]+$";

/// Events must run for at least this long
pub const MIN_EVENT_DURATION_MINUTES: i64 = 30;

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(USERNAME_PATTERN).expect("hard-coded pattern"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("hard-coded pattern"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("hard-coded pattern"))
}

fn event_title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EVENT_TITLE_PATTERN).expect("hard-coded pattern"))
}

fn invalid(message: impl Into<String>) -> VolunHubError {
    VolunHubError::InvalidInput(message.into())
}

pub fn validate_username(username: &str) -> Result<()> {
    if username.len() < 3 || username.len() > 30 {
        return Err(invalid("username must be 3-30 characters"));
    }
    if !username_regex().is_match(username) {
        return Err(invalid(
            "username may only contain letters, digits and underscores",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() || email.len() > 100 {
        return Err(invalid("email must be 1-100 characters"));
    }
    if !email_regex().is_match(email) {
        return Err(invalid("email address is malformed"));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<()> {
    if !phone_regex().is_match(phone) {
        return Err(invalid("phone number must be exactly 10 digits"));
    }
    Ok(())
}

pub fn validate_age(age: i32) -> Result<()> {
    if !(13..=120).contains(&age) {
        return Err(invalid("age must be between 13 and 120"));
    }
    Ok(())
}

/// Structural checks for user registration
pub fn validate_new_user(request: &CreateUserRequest) -> Result<()> {
    validate_username(&request.username)?;
    validate_email(&request.email)?;
    if request.password_hash.is_empty() {
        return Err(invalid("password hash must not be empty"));
    }
    if let Some(phone) = &request.phone {
        validate_phone(phone)?;
    }
    if let Some(age) = request.age {
        validate_age(age)?;
    }
    Ok(())
}

/// Structural checks for a profile update; absent fields are untouched
pub fn validate_profile_update(request: &UpdateProfileRequest) -> Result<()> {
    if let Some(username) = &request.username {
        validate_username(username)?;
    }
    if let Some(email) = &request.email {
        validate_email(email)?;
    }
    if let Some(phone) = &request.phone {
        validate_phone(phone)?;
    }
    if let Some(age) = request.age {
        validate_age(age)?;
    }
    Ok(())
}

pub fn validate_event_title(title: &str) -> Result<()> {
    if title.len() < 5 || title.len() > 50 {
        return Err(invalid("event title must be 5-50 characters"));
    }
    if !event_title_regex().is_match(title) {
        return Err(invalid(
            "event title may only contain letters, digits, spaces, underscores and dashes",
        ));
    }
    Ok(())
}

/// End must trail start by the minimum duration
pub fn validate_event_times(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<()> {
    if end_time < start_time + Duration::minutes(MIN_EVENT_DURATION_MINUTES) {
        return Err(invalid(format!(
            "event must run for at least {MIN_EVENT_DURATION_MINUTES} minutes"
        )));
    }
    Ok(())
}

pub fn validate_capacity(max_capacity: i32) -> Result<()> {
    if !(1..=200).contains(&max_capacity) {
        return Err(invalid("max capacity must be between 1 and 200"));
    }
    Ok(())
}

/// Structural checks for event creation; the start must still be ahead
pub fn validate_new_event(request: &CreateEventRequest, now: DateTime<Utc>) -> Result<()> {
    validate_event_title(&request.title)?;
    if request.start_time <= now {
        return Err(invalid("event start time must be in the future"));
    }
    validate_event_times(request.start_time, request.end_time)?;
    validate_capacity(request.max_capacity)?;
    if let Some(description) = &request.description {
        if description.len() > 500 {
            return Err(invalid("description must be at most 500 characters"));
        }
    }
    if let Some(location_url) = &request.location_url {
        if location_url.len() > 500 {
            return Err(invalid("location url must be at most 500 characters"));
        }
    }
    Ok(())
}

/// Structural checks for an event update against the merged schedule.
///
/// `current_start`/`current_end` are the stored values; whichever side the
/// request leaves out keeps them, and the pair is checked as a whole.
pub fn validate_event_update(
    request: &UpdateEventRequest,
    current_start: DateTime<Utc>,
    current_end: DateTime<Utc>,
) -> Result<()> {
    if let Some(title) = &request.title {
        validate_event_title(title)?;
    }
    if request.start_time.is_some() || request.end_time.is_some() {
        let start = request.start_time.unwrap_or(current_start);
        let end = request.end_time.unwrap_or(current_end);
        validate_event_times(start, end)?;
    }
    if let Some(capacity) = request.max_capacity {
        validate_capacity(capacity)?;
    }
    if let Some(description) = &request.description {
        if description.len() > 500 {
            return Err(invalid("description must be at most 500 characters"));
        }
    }
    if let Some(location_url) = &request.location_url {
        if location_url.len() > 500 {
            return Err(invalid("location url must be at most 500 characters"));
        }
    }
    Ok(())
}

/// Comment bodies are trimmed by the caller before this check
pub fn validate_comment_content(content: &str) -> Result<()> {
    if content.is_empty() {
        return Err(invalid("comment content must not be empty"));
    }
    if content.len() > 1000 {
        return Err(invalid("comment content must be at most 1000 characters"));
    }
    Ok(())
}

pub fn validate_report_fields(reason: &str, description: &str) -> Result<()> {
    if reason.is_empty() || reason.len() > 50 {
        return Err(invalid("report reason must be 1-50 characters"));
    }
    if description.is_empty() || description.len() > 500 {
        return Err(invalid("report description must be 1-500 characters"));
    }
    Ok(())
}
