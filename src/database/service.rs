//! Database service layer
//!
//! Bundles the per-entity repositories over one shared pool. Lifecycle
//! rules and authorization live a layer up in `services`; everything here
//! is plain data access.

use crate::database::{
    CommentRepository, DatabasePool, EventRepository, FriendshipRepository,
    RegistrationRepository, ReportRepository, UserRepository,
};
use crate::utils::errors::VolunHubError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
    pub comments: CommentRepository,
    pub friendships: FriendshipRepository,
    pub reports: ReportRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            friendships: FriendshipRepository::new(pool.clone()),
            reports: ReportRepository::new(pool.clone()),
            pool,
        }
    }

    /// Quick connectivity probe
    pub async fn health_check(&self) -> Result<(), VolunHubError> {
        crate::database::health_check(&self.pool).await
    }
}
