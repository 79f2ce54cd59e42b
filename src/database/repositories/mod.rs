//! Database repositories module
//!
//! This module contains all repository implementations for data access.
//! Uniqueness invariants are enforced by the store's unique indexes;
//! repositories translate those violations into domain conflicts by
//! constraint name instead of surfacing a generic database error.

pub mod user;
pub mod event;
pub mod registration;
pub mod comment;
pub mod friendship;
pub mod report;

// Re-export repositories
pub use user::UserRepository;
pub use event::EventRepository;
pub use registration::RegistrationRepository;
pub use comment::CommentRepository;
pub use friendship::FriendshipRepository;
pub use report::ReportRepository;

/// Name of the violated unique constraint, when `err` is a Postgres
/// unique violation (SQLSTATE 23505).
pub(crate) fn unique_constraint(err: &sqlx::Error) -> Option<&str> {
    let db_err = err.as_database_error()?;
    if db_err.code().as_deref() == Some("23505") {
        db_err.constraint()
    } else {
        None
    }
}
