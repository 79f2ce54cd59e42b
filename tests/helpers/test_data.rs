//! Test data builders
//!
//! Request builders with unique usernames/titles so tests sharing one
//! database never trip the uniqueness constraints by accident.

use chrono::{Duration, Utc};
use fake::faker::address::en::CityName;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

use VolunHub::models::comment::CreateCommentRequest;
use VolunHub::models::event::CreateEventRequest;
use VolunHub::models::report::{NewReportRequest, ReportSeverity, ReportTarget};
use VolunHub::models::user::CreateUserRequest;
use VolunHub::utils::helpers::generate_random_string;

/// Random lowercase suffix; keeps usernames within the allowed charset
pub fn unique_tag() -> String {
    generate_random_string(8).to_lowercase()
}

/// A valid signup request; `tag` keeps usernames readable in failures
pub fn user_request(tag: &str) -> CreateUserRequest {
    let suffix = unique_tag();
    CreateUserRequest {
        username: format!("{}_{}", tag, suffix),
        email: format!("{}_{}@example.com", tag, suffix),
        password_hash: format!("argon2id${}", generate_random_string(24)),
        phone: None,
        first_name: Some(FirstName().fake()),
        last_name: Some(LastName().fake()),
        city: Some(CityName().fake()),
        state: None,
        age: Some((18..80).fake::<i32>()),
        profile_picture_url: None,
    }
}

/// A valid future event request with the given capacity
pub fn event_request(capacity: i32) -> CreateEventRequest {
    event_request_titled(&format!("Park Cleanup {}", unique_tag()), capacity)
}

/// Like [`event_request`] but with a caller-chosen title
pub fn event_request_titled(title: &str, capacity: i32) -> CreateEventRequest {
    let start = Utc::now() + Duration::days(7);
    CreateEventRequest {
        title: title.to_string(),
        description: Some("Bring gloves and water".to_string()),
        location_url: None,
        address: Some("12 Riverside Dr".to_string()),
        city: Some(CityName().fake()),
        state: None,
        tags: Some(vec!["outdoors".to_string(), "cleanup".to_string()]),
        start_time: start,
        end_time: start + Duration::hours(3),
        max_capacity: capacity,
    }
}

/// Top-level comment request
pub fn comment_request(event_id: i64, content: &str) -> CreateCommentRequest {
    CreateCommentRequest {
        event_id,
        content: content.to_string(),
        parent_comment_id: None,
    }
}

/// Reply request nested under `parent_comment_id`
pub fn reply_request(event_id: i64, parent_comment_id: i64, content: &str) -> CreateCommentRequest {
    CreateCommentRequest {
        event_id,
        content: content.to_string(),
        parent_comment_id: Some(parent_comment_id),
    }
}

/// A well-formed report against `target`
pub fn report_request(target: ReportTarget) -> NewReportRequest {
    NewReportRequest {
        target,
        reason: "spam".to_string(),
        description: "posts the same link in every thread".to_string(),
        severity: ReportSeverity::Medium,
    }
}
