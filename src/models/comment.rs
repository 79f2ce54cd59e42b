//! Comment model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Maximum reply nesting: a reply (depth 1) cannot be replied to
pub const MAX_REPLY_DEPTH: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub content: String,
    pub parent_comment_id: Option<i64>,
    /// Denormalized depth, 0 for top-level and 1 for replies
    pub reply_depth: i32,
    pub report_count: i32,
    pub disabled: bool,
    pub disabled_reason: Option<String>,
    pub disabled_at: Option<DateTime<Utc>>,
    pub disabled_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }

    /// Whether another reply may still be attached under this comment
    pub fn accepts_replies(&self) -> bool {
        self.reply_depth < MAX_REPLY_DEPTH
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub event_id: i64,
    pub content: String,
    pub parent_comment_id: Option<i64>,
}
