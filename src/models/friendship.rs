//! Friendship model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "friendship_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FriendshipStatus::Pending => write!(f, "pending"),
            FriendshipStatus::Accepted => write!(f, "accepted"),
            FriendshipStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// One row per unordered user pair; `user_id` is the requester
/// and `friend_id` the recipient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Friendship {
    pub id: i64,
    pub user_id: i64,
    pub friend_id: i64,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// Whether `user_id` participates in this record
    pub fn involves(&self, user_id: i64) -> bool {
        self.user_id == user_id || self.friend_id == user_id
    }

    /// The participant that is not `user_id`
    pub fn other_party(&self, user_id: i64) -> i64 {
        if self.user_id == user_id {
            self.friend_id
        } else {
            self.user_id
        }
    }
}

/// Listing projection: the other party of a friendship from the
/// caller's point of view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FriendView {
    pub friendship_id: i64,
    pub status: FriendshipStatus,
    pub friend_id: i64,
    pub friend_username: String,
    pub friend_profile_picture_url: Option<String>,
    /// True when the caller sent the original request
    pub is_requester: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Relationship summary between two users, for UI gating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendshipState {
    pub status: Option<FriendshipStatus>,
    pub friendship_id: Option<i64>,
    pub is_requester: bool,
    pub can_send_request: bool,
}
