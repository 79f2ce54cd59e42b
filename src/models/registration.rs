//! Event registration model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Join row between a user and an event.
///
/// At most one row exists per (user, event) pair for the lifetime of both;
/// cancellation flips `cancelled` and re-registration flips it back on the
/// same row instead of inserting a second one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRegistration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub registered_at: DateTime<Utc>,
    pub cancelled: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub attended: bool,
    pub checkin_time: Option<DateTime<Utc>>,
    /// Set once by the reward payout; guards against double crediting
    pub rewarded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventRegistration {
    pub fn is_active(&self) -> bool {
        !self.cancelled
    }
}
