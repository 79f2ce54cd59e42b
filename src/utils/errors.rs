//! Error handling for VolunHub
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. Every variant maps to
//! exactly one [`ErrorKind`], which is what the request dispatch layer uses
//! to pick a transport response.

use thiserror::Error;

/// Main error type for VolunHub operations
#[derive(Error, Debug)]
pub enum VolunHubError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Comment not found: {comment_id}")]
    CommentNotFound { comment_id: i64 },

    #[error("Friendship not found: {friendship_id}")]
    FriendshipNotFound { friendship_id: i64 },

    #[error("Report not found: {report_id}")]
    ReportNotFound { report_id: i64 },

    #[error("No active registration for user {user_id} on event {event_id}")]
    RegistrationNotFound { user_id: i64, event_id: i64 },

    #[error("Event {event_id} is at full capacity")]
    EventFull { event_id: i64 },

    #[error("Capacity {requested} is below the {active} active registrations of event {event_id}")]
    CapacityBelowActive {
        event_id: i64,
        requested: i32,
        active: i64,
    },

    #[error("Event {event_id} is not completed yet; rewards unavailable")]
    EventNotCompleted { event_id: i64 },

    #[error("Already registered for event {event_id}")]
    AlreadyRegistered { event_id: i64 },

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("A friendship record already exists between these users")]
    DuplicateFriendship,

    #[error("Target already reported")]
    DuplicateReport,

    #[error("Cannot befriend yourself")]
    SelfFriendship,

    #[error("Cannot report yourself")]
    SelfReport,

    #[error("Comment {parent_id} is itself a reply and cannot be replied to")]
    ReplyDepthExceeded { parent_id: i64 },

    #[error("Parent comment {parent_id} does not belong to event {event_id}")]
    ParentEventMismatch { parent_id: i64, event_id: i64 },

    #[error("Comment {comment_id} is disabled")]
    CommentDisabled { comment_id: i64 },

    #[error("Event {event_id} is disabled")]
    EventDisabled { event_id: i64 },

    #[error("Comment {comment_id} still has active replies")]
    CommentHasReplies { comment_id: i64 },

    #[error("User {user_id} is already checked in for event {event_id}")]
    AlreadyCheckedIn { event_id: i64, user_id: i64 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for VolunHub operations
pub type Result<T> = std::result::Result<T, VolunHubError>;

/// Error taxonomy exposed to the dispatch layer.
///
/// Guards and predicates never return a generic catch-all: a denial is
/// always NotFound, Forbidden or Conflict, and only Internal errors are
/// worth retrying without changing intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Conflict,
    Validation,
    Internal,
}

impl ErrorKind {
    /// HTTP-equivalent status hint for transport layers
    pub fn status_hint(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Forbidden => 403,
            ErrorKind::Conflict => 409,
            ErrorKind::Validation => 400,
            ErrorKind::Internal => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "NOT_FOUND"),
            ErrorKind::Forbidden => write!(f, "FORBIDDEN"),
            ErrorKind::Conflict => write!(f, "CONFLICT"),
            ErrorKind::Validation => write!(f, "VALIDATION"),
            ErrorKind::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl VolunHubError {
    /// Classify the error into the closed taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            VolunHubError::Database(_) => ErrorKind::Internal,
            VolunHubError::Migration(_) => ErrorKind::Internal,
            VolunHubError::Config(_) => ErrorKind::Internal,
            VolunHubError::Serialization(_) => ErrorKind::Internal,
            VolunHubError::Io(_) => ErrorKind::Internal,
            VolunHubError::ServiceUnavailable(_) => ErrorKind::Internal,

            VolunHubError::AuthenticationRequired => ErrorKind::Forbidden,
            VolunHubError::PermissionDenied(_) => ErrorKind::Forbidden,

            VolunHubError::UserNotFound { .. } => ErrorKind::NotFound,
            VolunHubError::EventNotFound { .. } => ErrorKind::NotFound,
            VolunHubError::CommentNotFound { .. } => ErrorKind::NotFound,
            VolunHubError::FriendshipNotFound { .. } => ErrorKind::NotFound,
            VolunHubError::ReportNotFound { .. } => ErrorKind::NotFound,
            VolunHubError::RegistrationNotFound { .. } => ErrorKind::NotFound,

            VolunHubError::EventFull { .. } => ErrorKind::Conflict,
            VolunHubError::CapacityBelowActive { .. } => ErrorKind::Conflict,
            VolunHubError::EventNotCompleted { .. } => ErrorKind::Conflict,
            VolunHubError::AlreadyRegistered { .. } => ErrorKind::Conflict,
            VolunHubError::AlreadyExists(_) => ErrorKind::Conflict,
            VolunHubError::DuplicateFriendship => ErrorKind::Conflict,
            VolunHubError::DuplicateReport => ErrorKind::Conflict,
            VolunHubError::SelfFriendship => ErrorKind::Conflict,
            VolunHubError::SelfReport => ErrorKind::Conflict,
            VolunHubError::ReplyDepthExceeded { .. } => ErrorKind::Conflict,
            VolunHubError::ParentEventMismatch { .. } => ErrorKind::Conflict,
            VolunHubError::CommentDisabled { .. } => ErrorKind::Conflict,
            VolunHubError::EventDisabled { .. } => ErrorKind::Conflict,
            VolunHubError::CommentHasReplies { .. } => ErrorKind::Conflict,
            VolunHubError::AlreadyCheckedIn { .. } => ErrorKind::Conflict,
            VolunHubError::InvalidStateTransition { .. } => ErrorKind::Conflict,

            VolunHubError::InvalidInput(_) => ErrorKind::Validation,
        }
    }

    /// Check if the caller may retry without changing intent
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denials_map_to_specific_kinds() {
        assert_eq!(
            VolunHubError::UserNotFound { user_id: 7 }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            VolunHubError::PermissionDenied("not the organizer".to_string()).kind(),
            ErrorKind::Forbidden
        );
        assert_eq!(
            VolunHubError::EventFull { event_id: 3 }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            VolunHubError::InvalidInput("title too short".to_string()).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_only_internal_errors_are_retryable() {
        assert!(VolunHubError::ServiceUnavailable("db down".to_string()).is_retryable());
        assert!(!VolunHubError::DuplicateReport.is_retryable());
        assert!(!VolunHubError::AuthenticationRequired.is_retryable());
        assert!(!VolunHubError::AlreadyRegistered { event_id: 1 }.is_retryable());
    }

    #[test]
    fn test_status_hints() {
        assert_eq!(ErrorKind::NotFound.status_hint(), 404);
        assert_eq!(ErrorKind::Forbidden.status_hint(), 403);
        assert_eq!(ErrorKind::Conflict.status_hint(), 409);
        assert_eq!(ErrorKind::Validation.status_hint(), 400);
        assert_eq!(ErrorKind::Internal.status_hint(), 500);
    }

    #[test]
    fn test_display_messages_are_user_facing() {
        let err = VolunHubError::DuplicateReport;
        assert_eq!(err.to_string(), "Target already reported");

        let err = VolunHubError::EventFull { event_id: 12 };
        assert_eq!(err.to_string(), "Event 12 is at full capacity");

        let err = VolunHubError::InvalidStateTransition {
            from: "completed".to_string(),
            to: "ongoing".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid state transition: completed -> ongoing");
    }
}
