//! User repository implementation

use sqlx::PgPool;
use crate::config::RewardsConfig;
use crate::models::user::{User, CreateUserRequest, UpdateProfileRequest};
use crate::utils::errors::VolunHubError;

use super::unique_constraint;

const USER_COLUMNS: &str = "id, username, email, phone, password_hash, first_name, last_name, \
     city, state, age, profile_picture_url, is_admin, is_active, points, rank, \
     events_attended_count, events_organized, friends_count, comments_count, \
     created_at, updated_at";

fn map_user_unique(err: sqlx::Error) -> VolunHubError {
    match unique_constraint(&err) {
        Some("users_username_key") => {
            VolunHubError::AlreadyExists("A user with this username".to_string())
        }
        Some("users_email_key") => {
            VolunHubError::AlreadyExists("A user with this email".to_string())
        }
        Some("users_phone_key") => {
            VolunHubError::AlreadyExists("A user with this phone number".to_string())
        }
        _ => VolunHubError::from(err),
    }
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, VolunHubError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, phone, first_name, last_name,
                               city, state, age, profile_picture_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(request.username)
        .bind(request.email)
        .bind(request.password_hash)
        .bind(request.phone)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.city)
        .bind(request.state)
        .bind(request.age)
        .bind(request.profile_picture_url)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_unique)?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, VolunHubError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update profile fields; absent fields keep their current values
    pub async fn update_profile(
        &self,
        id: i64,
        request: UpdateProfileRequest,
    ) -> Result<User, VolunHubError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                first_name = COALESCE($5, first_name),
                last_name = COALESCE($6, last_name),
                city = COALESCE($7, city),
                state = COALESCE($8, state),
                age = COALESCE($9, age),
                profile_picture_url = COALESCE($10, profile_picture_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(request.username)
        .bind(request.email)
        .bind(request.phone)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.city)
        .bind(request.state)
        .bind(request.age)
        .bind(request.profile_picture_url)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_unique)?;

        Ok(user)
    }

    /// Replace the stored password hash
    pub async fn change_password_hash(&self, id: i64, password_hash: &str) -> Result<(), VolunHubError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Activate/deactivate user
    pub async fn set_active_status(&self, id: i64, is_active: bool) -> Result<User, VolunHubError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete user; false when no row matched
    pub async fn delete(&self, id: i64) -> Result<bool, VolunHubError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all users with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, VolunHubError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Leaderboard: active users ordered by points
    pub async fn top_by_points(&self, limit: i64) -> Result<Vec<User>, VolunHubError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE is_active ORDER BY points DESC, id ASC LIMIT $1",
            USER_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Credit an attended event: points, rank and attendance counter
    /// move together in one atomic statement.
    pub async fn credit_event_reward(
        &self,
        id: i64,
        points_delta: i64,
        rewards: &RewardsConfig,
    ) -> Result<User, VolunHubError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET points = points + $2,
                rank = CASE
                    WHEN points + $2 >= $5 THEN 'platinum'::user_rank
                    WHEN points + $2 >= $4 THEN 'gold'::user_rank
                    WHEN points + $2 >= $3 THEN 'silver'::user_rank
                    ELSE 'bronze'::user_rank
                END,
                events_attended_count = events_attended_count + 1,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(points_delta)
        .bind(rewards.silver_threshold)
        .bind(rewards.gold_threshold)
        .bind(rewards.platinum_threshold)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Atomically adjust the organized-events counter
    pub async fn increment_events_organized(&self, id: i64, delta: i32) -> Result<(), VolunHubError> {
        sqlx::query(
            "UPDATE users SET events_organized = GREATEST(events_organized + $2, 0), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Atomically adjust the friends counter
    pub async fn increment_friends_count(&self, id: i64, delta: i32) -> Result<(), VolunHubError> {
        sqlx::query(
            "UPDATE users SET friends_count = GREATEST(friends_count + $2, 0), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Atomically adjust the comments counter
    pub async fn increment_comments_count(&self, id: i64, delta: i32) -> Result<(), VolunHubError> {
        sqlx::query(
            "UPDATE users SET comments_count = GREATEST(comments_count + $2, 0), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_user_repository_creation() {
        // connect_lazy performs no I/O until a query runs
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/volunhub_test")
            .expect("lazy pool");
        let repo = UserRepository::new(pool);
        assert!(!repo.pool.is_closed());
    }
}
