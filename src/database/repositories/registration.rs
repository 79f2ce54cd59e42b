//! Event registration repository implementation
//!
//! The unique (user_id, event_id) index keeps one row per pair for the
//! lifetime of both entities. Re-registration reactivates that row through
//! an upsert whose DO UPDATE clause only fires on cancelled rows; an active
//! row therefore comes back as zero rows, which callers treat as a lost
//! race against a concurrent duplicate.

use sqlx::PgPool;
use crate::models::registration::EventRegistration;
use crate::utils::errors::VolunHubError;

const REGISTRATION_COLUMNS: &str = "id, user_id, event_id, registered_at, cancelled, \
     cancelled_at, attended, checkin_time, rewarded, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The (user, event) row regardless of lifecycle state
    pub async fn find_by_pair(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<EventRegistration>, VolunHubError> {
        let registration = sqlx::query_as::<_, EventRegistration>(&format!(
            "SELECT {} FROM event_registrations WHERE user_id = $1 AND event_id = $2",
            REGISTRATION_COLUMNS
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Insert a fresh registration or reactivate a cancelled one.
    ///
    /// Returns None when the pair already has an active row; the caller
    /// holds a claimed capacity slot at that point and must release it.
    pub async fn activate(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<EventRegistration>, VolunHubError> {
        let registration = sqlx::query_as::<_, EventRegistration>(&format!(
            r#"
            INSERT INTO event_registrations (user_id, event_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, event_id) DO UPDATE
            SET cancelled = FALSE,
                cancelled_at = NULL,
                registered_at = NOW(),
                updated_at = NOW()
            WHERE event_registrations.cancelled
            RETURNING {}
            "#,
            REGISTRATION_COLUMNS
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Cancel the active registration for the pair. None when there was
    /// no active row to cancel.
    pub async fn cancel_active(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<EventRegistration>, VolunHubError> {
        let registration = sqlx::query_as::<_, EventRegistration>(&format!(
            r#"
            UPDATE event_registrations
            SET cancelled = TRUE, cancelled_at = NOW(), updated_at = NOW()
            WHERE user_id = $1 AND event_id = $2 AND NOT cancelled
            RETURNING {}
            "#,
            REGISTRATION_COLUMNS
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Record attendance once. None when the row is missing, cancelled
    /// or already checked in.
    pub async fn mark_attended(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<EventRegistration>, VolunHubError> {
        let registration = sqlx::query_as::<_, EventRegistration>(&format!(
            r#"
            UPDATE event_registrations
            SET attended = TRUE, checkin_time = NOW(), updated_at = NOW()
            WHERE user_id = $1 AND event_id = $2 AND NOT cancelled AND NOT attended
            RETURNING {}
            "#,
            REGISTRATION_COLUMNS
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Flip `rewarded` on every active, not-yet-rewarded registration of
    /// the event and return those rows. Rows claimed here are credited
    /// exactly once; a second payout run returns an empty set.
    pub async fn claim_unrewarded(
        &self,
        event_id: i64,
    ) -> Result<Vec<EventRegistration>, VolunHubError> {
        let registrations = sqlx::query_as::<_, EventRegistration>(&format!(
            r#"
            UPDATE event_registrations
            SET rewarded = TRUE, updated_at = NOW()
            WHERE event_id = $1 AND NOT cancelled AND NOT rewarded
            RETURNING {}
            "#,
            REGISTRATION_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Active registrations of an event in sign-up order
    pub async fn list_for_event(
        &self,
        event_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EventRegistration>, VolunHubError> {
        let registrations = sqlx::query_as::<_, EventRegistration>(&format!(
            r#"
            SELECT {} FROM event_registrations
            WHERE event_id = $1 AND NOT cancelled
            ORDER BY registered_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
            REGISTRATION_COLUMNS
        ))
        .bind(event_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// All registrations of a user, newest first, cancelled rows included
    pub async fn list_for_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EventRegistration>, VolunHubError> {
        let registrations = sqlx::query_as::<_, EventRegistration>(&format!(
            r#"
            SELECT {} FROM event_registrations
            WHERE user_id = $1
            ORDER BY registered_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            REGISTRATION_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_registration_repository_creation() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/volunhub_test")
            .expect("lazy pool");
        let repo = RegistrationRepository::new(pool);
        assert!(!repo.pool.is_closed());
    }
}
