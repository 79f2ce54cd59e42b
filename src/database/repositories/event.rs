//! Event repository implementation
//!
//! Capacity admission lives here as a single conditional UPDATE: a slot is
//! claimed only while `registrations_count < max_capacity`, so concurrent
//! joins can never push the counter past the cap.

use sqlx::PgPool;
use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::utils::errors::VolunHubError;

use super::unique_constraint;

const EVENT_COLUMNS: &str = "id, organizer_id, title, description, location_url, address, \
     city, state, tags, start_time, end_time, max_capacity, status, \
     registrations_count, checked_in_count, comments_count, \
     disabled, disabled_reason, disabled_at, disabled_by, created_at, updated_at";

fn map_event_unique(err: sqlx::Error) -> VolunHubError {
    match unique_constraint(&err) {
        Some("events_organizer_active_title_key") => {
            VolunHubError::AlreadyExists("An active event with this title".to_string())
        }
        _ => VolunHubError::from(err),
    }
}

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event for `organizer_id`
    pub async fn create(
        &self,
        organizer_id: i64,
        request: CreateEventRequest,
    ) -> Result<Event, VolunHubError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (organizer_id, title, description, location_url, address,
                                city, state, tags, start_time, end_time, max_capacity)
            VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, ARRAY[]::TEXT[]), $9, $10, $11)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(organizer_id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.location_url)
        .bind(request.address)
        .bind(request.city)
        .bind(request.state)
        .bind(request.tags)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.max_capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(map_event_unique)?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, VolunHubError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE id = $1",
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Whether `organizer_id` already has an active event titled `title`,
    /// ignoring `exclude_id` when given (used by updates)
    pub async fn title_in_use(
        &self,
        organizer_id: i64,
        title: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, VolunHubError> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM events
                WHERE organizer_id = $1
                  AND title = $2
                  AND status IN ('upcoming', 'ongoing')
                  AND ($3::BIGINT IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(organizer_id)
        .bind(title)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Update event fields; absent fields keep their current values
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, VolunHubError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                location_url = COALESCE($4, location_url),
                address = COALESCE($5, address),
                city = COALESCE($6, city),
                state = COALESCE($7, state),
                tags = COALESCE($8, tags),
                start_time = COALESCE($9, start_time),
                end_time = COALESCE($10, end_time),
                max_capacity = COALESCE($11, max_capacity),
                status = COALESCE($12, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.location_url)
        .bind(request.address)
        .bind(request.city)
        .bind(request.state)
        .bind(request.tags)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.max_capacity)
        .bind(request.status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_event_unique)?;

        Ok(event)
    }

    /// Claim one capacity slot. Returns false when the event is already
    /// full; never oversubscribes under concurrent callers.
    pub async fn claim_capacity_slot(&self, id: i64) -> Result<bool, VolunHubError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET registrations_count = registrations_count + 1, updated_at = NOW()
            WHERE id = $1 AND registrations_count < max_capacity
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Give back a previously claimed slot (cancellation or lost race)
    pub async fn release_capacity_slot(&self, id: i64) -> Result<(), VolunHubError> {
        sqlx::query(
            r#"
            UPDATE events
            SET registrations_count = GREATEST(registrations_count - 1, 0), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Atomically adjust the checked-in counter
    pub async fn increment_checked_in(&self, id: i64, delta: i32) -> Result<(), VolunHubError> {
        sqlx::query(
            "UPDATE events SET checked_in_count = GREATEST(checked_in_count + $2, 0), updated_at = NOW() WHERE id = $1",
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
            "UPDATE events SET comments_count = GREATEST(comments_count + $2, 0), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Hide the event and record who pulled it and why
    pub async fn set_disabled(
        &self,
        id: i64,
        reason: &str,
        admin_id: i64,
    ) -> Result<Event, VolunHubError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET disabled = TRUE,
                disabled_reason = $2,
                disabled_at = NOW(),
                disabled_by = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(reason)
        .bind(admin_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Clear the moderation flag
    pub async fn set_enabled(&self, id: i64) -> Result<Event, VolunHubError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET disabled = FALSE,
                disabled_reason = NULL,
                disabled_at = NULL,
                disabled_by = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event; false when no row matched. Registrations and comments
    /// go with it through ON DELETE CASCADE.
    pub async fn delete(&self, id: i64) -> Result<bool, VolunHubError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all events with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Event>, VolunHubError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events ORDER BY start_time ASC, id ASC LIMIT $1 OFFSET $2",
            EVENT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Upcoming, visible events that have not started yet
    pub async fn list_upcoming(&self, limit: i64) -> Result<Vec<Event>, VolunHubError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {} FROM events
            WHERE status = 'upcoming' AND NOT disabled AND start_time > NOW()
            ORDER BY start_time ASC
            LIMIT $1
            "#,
            EVENT_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Events organized by one user, newest schedule first
    pub async fn list_by_organizer(
        &self,
        organizer_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, VolunHubError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE organizer_id = $1 ORDER BY start_time DESC LIMIT $2 OFFSET $3",
            EVENT_COLUMNS
        ))
        .bind(organizer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_event_repository_creation() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/volunhub_test")
            .expect("lazy pool");
        let repo = EventRepository::new(pool);
        assert!(!repo.pool.is_closed());
    }
}
