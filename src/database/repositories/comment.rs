//! Comment repository implementation

use sqlx::PgPool;
use crate::models::comment::Comment;
use crate::utils::errors::VolunHubError;

const COMMENT_COLUMNS: &str = "id, event_id, user_id, content, parent_comment_id, reply_depth, \
     report_count, disabled, disabled_reason, disabled_at, disabled_by, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a comment; `reply_depth` was derived from the parent by the caller
    pub async fn create(
        &self,
        event_id: i64,
        user_id: i64,
        content: &str,
        parent_comment_id: Option<i64>,
        reply_depth: i32,
    ) -> Result<Comment, VolunHubError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (event_id, user_id, content, parent_comment_id, reply_depth)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        ))
        .bind(event_id)
        .bind(user_id)
        .bind(content)
        .bind(parent_comment_id)
        .bind(reply_depth)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Find comment by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, VolunHubError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE id = $1",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Delete comment; false when no row matched
    pub async fn delete(&self, id: i64) -> Result<bool, VolunHubError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Non-disabled replies under a comment; deletion is blocked while
    /// this is non-zero
    pub async fn count_active_replies(&self, parent_id: i64) -> Result<i64, VolunHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM comments WHERE parent_comment_id = $1 AND NOT disabled",
        )
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Bump the lightweight report counter and return the updated row
    pub async fn increment_report_count(&self, id: i64) -> Result<Comment, VolunHubError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments
            SET report_count = report_count + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Hide the comment and record who pulled it and why
    pub async fn set_disabled(
        &self,
        id: i64,
        reason: &str,
        admin_id: i64,
    ) -> Result<Comment, VolunHubError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments
            SET disabled = TRUE,
                disabled_reason = $2,
                disabled_at = NOW(),
                disabled_by = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        ))
        .bind(id)
        .bind(reason)
        .bind(admin_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Clear the moderation flag
    pub async fn set_enabled(&self, id: i64) -> Result<Comment, VolunHubError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments
            SET disabled = FALSE,
                disabled_reason = NULL,
                disabled_at = NULL,
                disabled_by = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Top-level comments of an event, newest first. Disabled rows are
    /// only included when `include_disabled` is set (admin view).
    pub async fn list_top_level_for_event(
        &self,
        event_id: i64,
        include_disabled: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, VolunHubError> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {} FROM comments
            WHERE event_id = $1 AND parent_comment_id IS NULL AND ($2 OR NOT disabled)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
            COMMENT_COLUMNS
        ))
        .bind(event_id)
        .bind(include_disabled)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Replies under a comment in conversation order (oldest first)
    pub async fn list_replies(
        &self,
        parent_id: i64,
        include_disabled: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, VolunHubError> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {} FROM comments
            WHERE parent_comment_id = $1 AND ($2 OR NOT disabled)
            ORDER BY created_at ASC, id ASC
            LIMIT $3 OFFSET $4
            "#,
            COMMENT_COLUMNS
        ))
        .bind(parent_id)
        .bind(include_disabled)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Visible comments written by one user, newest first
    pub async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, VolunHubError> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {} FROM comments
            WHERE user_id = $1 AND NOT disabled
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            COMMENT_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_comment_repository_creation() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/volunhub_test")
            .expect("lazy pool");
        let repo = CommentRepository::new(pool);
        assert!(!repo.pool.is_closed());
    }
}
