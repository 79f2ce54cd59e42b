//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod event;
pub mod registration;
pub mod comment;
pub mod friendship;
pub mod report;
pub mod validation;

// Re-export commonly used models
pub use user::{User, AccountStats, Rank, CreateUserRequest, UpdateProfileRequest};
pub use event::{Event, EventStatus, CreateEventRequest, UpdateEventRequest};
pub use registration::EventRegistration;
pub use comment::{Comment, CreateCommentRequest, MAX_REPLY_DEPTH};
pub use friendship::{Friendship, FriendshipStatus, FriendView, FriendshipState};
pub use report::{
    Report, ReportTarget, ReportTargetKind, ReportSeverity, ResolutionStatus,
    ResolutionDecision, NewReportRequest, ResolveReportRequest,
};
