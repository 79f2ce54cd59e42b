//! Services module
//!
//! Business logic over the repositories. Every mutating operation runs
//! the same sequence: authenticate the actor, authorize against role and
//! ownership, then admit the mutation through whatever atomic guard the
//! store provides for it.

pub mod comment;
pub mod event;
pub mod friendship;
pub mod registration;
pub mod report;
pub mod user;

// Re-export commonly used services
pub use comment::CommentService;
pub use event::EventService;
pub use friendship::FriendshipService;
pub use registration::RegistrationService;
pub use report::ReportService;
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub user_service: UserService,
    pub event_service: EventService,
    pub registration_service: RegistrationService,
    pub comment_service: CommentService,
    pub friendship_service: FriendshipService,
    pub report_service: ReportService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(db: &DatabaseService, settings: Settings) -> Self {
        let user_service = UserService::new(db, settings.clone());
        let event_service = EventService::new(db, settings.clone());
        let registration_service = RegistrationService::new(db, settings.clone());
        let comment_service = CommentService::new(db, settings.clone());
        let friendship_service = FriendshipService::new(db, settings.clone());
        let report_service = ReportService::new(db, settings);

        Self {
            user_service,
            event_service,
            registration_service,
            comment_service,
            friendship_service,
            report_service,
        }
    }
}
