//! Friendship repository implementation
//!
//! One row per unordered pair, enforced by a unique index over
//! (LEAST(user_id, friend_id), GREATEST(user_id, friend_id)). Status
//! transitions are conditional UPDATEs against 'pending' so a request
//! can only be answered once.

use sqlx::PgPool;
use crate::models::friendship::{FriendView, Friendship, FriendshipStatus};
use crate::utils::errors::VolunHubError;

use super::unique_constraint;

const FRIENDSHIP_COLUMNS: &str = "id, user_id, friend_id, status, created_at, updated_at";

/// Projection of the other party, aliased to match [`FriendView`]
const FRIEND_VIEW_COLUMNS: &str = "f.id AS friendship_id, f.status, \
     u.id AS friend_id, u.username AS friend_username, \
     u.profile_picture_url AS friend_profile_picture_url, \
     (f.user_id = $1) AS is_requester, f.created_at, f.updated_at";

fn map_friendship_unique(err: sqlx::Error) -> VolunHubError {
    match unique_constraint(&err) {
        Some("friendships_pair_key") => VolunHubError::DuplicateFriendship,
        _ => VolunHubError::from(err),
    }
}

#[derive(Debug, Clone)]
pub struct FriendshipRepository {
    pool: PgPool,
}

impl FriendshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending request from `user_id` to `friend_id`
    pub async fn create(&self, user_id: i64, friend_id: i64) -> Result<Friendship, VolunHubError> {
        let friendship = sqlx::query_as::<_, Friendship>(&format!(
            r#"
            INSERT INTO friendships (user_id, friend_id)
            VALUES ($1, $2)
            RETURNING {}
            "#,
            FRIENDSHIP_COLUMNS
        ))
        .bind(user_id)
        .bind(friend_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_friendship_unique)?;

        Ok(friendship)
    }

    /// Find friendship by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Friendship>, VolunHubError> {
        let friendship = sqlx::query_as::<_, Friendship>(&format!(
            "SELECT {} FROM friendships WHERE id = $1",
            FRIENDSHIP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    /// The record between two users, whichever direction it was sent in
    pub async fn find_by_pair(
        &self,
        user_a: i64,
        user_b: i64,
    ) -> Result<Option<Friendship>, VolunHubError> {
        let friendship = sqlx::query_as::<_, Friendship>(&format!(
            r#"
            SELECT {} FROM friendships
            WHERE (user_id = $1 AND friend_id = $2) OR (user_id = $2 AND friend_id = $1)
            "#,
            FRIENDSHIP_COLUMNS
        ))
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    /// Move a pending request to `status`. None when the row is gone or
    /// was already answered.
    pub async fn set_status_if_pending(
        &self,
        id: i64,
        status: FriendshipStatus,
    ) -> Result<Option<Friendship>, VolunHubError> {
        let friendship = sqlx::query_as::<_, Friendship>(&format!(
            r#"
            UPDATE friendships
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {}
            "#,
            FRIENDSHIP_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    /// Delete the record only while it holds `status`; false when the
    /// state moved on first
    pub async fn delete_if_status(
        &self,
        id: i64,
        status: FriendshipStatus,
    ) -> Result<bool, VolunHubError> {
        let result = sqlx::query("DELETE FROM friendships WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Friendships of `user_id` in `status`, projected onto the other
    /// party, most recently touched first
    pub async fn list_views(
        &self,
        user_id: i64,
        status: FriendshipStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FriendView>, VolunHubError> {
        let views = sqlx::query_as::<_, FriendView>(&format!(
            r#"
            SELECT {}
            FROM friendships f
            JOIN users u
              ON u.id = CASE WHEN f.user_id = $1 THEN f.friend_id ELSE f.user_id END
            WHERE (f.user_id = $1 OR f.friend_id = $1) AND f.status = $2
            ORDER BY f.updated_at DESC, f.id DESC
            LIMIT $3 OFFSET $4
            "#,
            FRIEND_VIEW_COLUMNS
        ))
        .bind(user_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }

    /// Pending requests waiting on `user_id`, newest first
    pub async fn list_incoming_pending(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FriendView>, VolunHubError> {
        let views = sqlx::query_as::<_, FriendView>(&format!(
            r#"
            SELECT {}
            FROM friendships f
            JOIN users u ON u.id = f.user_id
            WHERE f.friend_id = $1 AND f.status = 'pending'
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT $2 OFFSET $3
            "#,
            FRIEND_VIEW_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }

    /// Pending requests `user_id` has sent, newest first
    pub async fn list_outgoing_pending(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FriendView>, VolunHubError> {
        let views = sqlx::query_as::<_, FriendView>(&format!(
            r#"
            SELECT {}
            FROM friendships f
            JOIN users u ON u.id = f.friend_id
            WHERE f.user_id = $1 AND f.status = 'pending'
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT $2 OFFSET $3
            "#,
            FRIEND_VIEW_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_friendship_repository_creation() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/volunhub_test")
            .expect("lazy pool");
        let repo = FriendshipRepository::new(pool);
        assert!(!repo.pool.is_closed());
    }
}
