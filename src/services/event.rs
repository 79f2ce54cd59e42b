//! Event lifecycle service
//!
//! Creation, updates, moderation and listings. Ownership follows the
//! organizer; admins override everywhere. The one state rule enforced
//! here is the completion freeze: a completed event's status can only
//! be moved again by an admin.

use tracing::{debug, info};

use crate::auth;
use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::database::repositories::{EventRepository, UserRepository};
use crate::models::event::{CreateEventRequest, Event, EventStatus, UpdateEventRequest};
use crate::models::user::User;
use crate::models::validation;
use crate::utils::errors::{Result, VolunHubError};
use crate::utils::helpers::{calculate_offset, clamp_page_limit};
use crate::utils::logging::{log_admin_action, log_event_action};

#[derive(Clone)]
pub struct EventService {
    events: EventRepository,
    users: UserRepository,
    settings: Settings,
}

impl EventService {
    pub fn new(db: &DatabaseService, settings: Settings) -> Self {
        Self {
            events: db.events.clone(),
            users: db.users.clone(),
            settings,
        }
    }

    /// Create an event owned by the actor. The title must not collide
    /// with another active event of the same organizer.
    pub async fn create_event(
        &self,
        actor: Option<&User>,
        request: CreateEventRequest,
    ) -> Result<Event> {
        let actor = auth::require_authenticated(actor)?;

        validation::validate_new_event(&request, chrono::Utc::now())?;

        // Friendly pre-check; the partial unique index still decides races
        if self.events.title_in_use(actor.id, &request.title, None).await? {
            return Err(VolunHubError::AlreadyExists(
                "An active event with this title".to_string(),
            ));
        }

        let event = self.events.create(actor.id, request).await?;
        self.users.increment_events_organized(actor.id, 1).await?;
        log_event_action(event.id, "event_created", actor.id, None);

        Ok(event)
    }

    /// Fetch one event
    pub async fn get_event(&self, event_id: i64) -> Result<Event> {
        debug!(event_id = event_id, "Getting event");

        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(VolunHubError::EventNotFound { event_id })
    }

    /// Update event fields (organizer or admin).
    ///
    /// A completed event's status is frozen for non-admins, and capacity
    /// can never drop below the active registrations already admitted.
    pub async fn update_event(
        &self,
        actor: Option<&User>,
        event_id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        let actor = auth::require_authenticated(actor)?;
        let event = self.get_event(event_id).await?;
        auth::require_owner_or_admin(actor, &event)?;

        if let Some(new_status) = request.status {
            if event.status == EventStatus::Completed
                && new_status != EventStatus::Completed
                && !auth::is_admin(actor)
            {
                return Err(VolunHubError::InvalidStateTransition {
                    from: event.status.to_string(),
                    to: new_status.to_string(),
                });
            }
        }

        validation::validate_event_update(&request, event.start_time, event.end_time)?;

        if let Some(requested) = request.max_capacity {
            if requested < event.registrations_count {
                return Err(VolunHubError::CapacityBelowActive {
                    event_id,
                    requested,
                    active: event.registrations_count as i64,
                });
            }
        }

        if let Some(title) = &request.title {
            if title != &event.title
                && self
                    .events
                    .title_in_use(event.organizer_id, title, Some(event_id))
                    .await?
            {
                return Err(VolunHubError::AlreadyExists(
                    "An active event with this title".to_string(),
                ));
            }
        }

        let updated = self.events.update(event_id, request).await?;
        info!(event_id = event_id, actor_id = actor.id, "Event updated");

        Ok(updated)
    }

    /// Pull an event from public view (admin)
    pub async fn disable_event(
        &self,
        actor: Option<&User>,
        event_id: i64,
        reason: &str,
    ) -> Result<Event> {
        let actor = auth::require_authenticated(actor)?;
        auth::require_admin(actor)?;
        self.get_event(event_id).await?;

        let event = self.events.set_disabled(event_id, reason, actor.id).await?;
        log_admin_action(actor.id, "event_disabled", Some(&event_id.to_string()), Some(reason));

        Ok(event)
    }

    /// Restore a disabled event (admin)
    pub async fn enable_event(&self, actor: Option<&User>, event_id: i64) -> Result<Event> {
        let actor = auth::require_authenticated(actor)?;
        auth::require_admin(actor)?;
        self.get_event(event_id).await?;

        let event = self.events.set_enabled(event_id).await?;
        log_admin_action(actor.id, "event_enabled", Some(&event_id.to_string()), None);

        Ok(event)
    }

    /// Delete an event (organizer or admin); registrations and comments
    /// cascade in the store
    pub async fn delete_event(&self, actor: Option<&User>, event_id: i64) -> Result<()> {
        let actor = auth::require_authenticated(actor)?;
        let event = self.get_event(event_id).await?;
        auth::require_owner_or_admin(actor, &event)?;

        if !self.events.delete(event_id).await? {
            return Err(VolunHubError::EventNotFound { event_id });
        }
        self.users
            .increment_events_organized(event.organizer_id, -1)
            .await?;
        log_event_action(event_id, "event_deleted", actor.id, None);

        Ok(())
    }

    /// All events in schedule order
    pub async fn list_events(&self, page: u32, limit: Option<u32>) -> Result<Vec<Event>> {
        let limit = clamp_page_limit(
            limit,
            self.settings.pagination.default_limit,
            self.settings.pagination.max_limit,
        );
        let offset = calculate_offset(page, limit);

        self.events.list(limit as i64, offset).await
    }

    /// Upcoming visible events
    pub async fn list_upcoming(&self, limit: Option<u32>) -> Result<Vec<Event>> {
        let limit = clamp_page_limit(
            limit,
            self.settings.pagination.default_limit,
            self.settings.pagination.max_limit,
        );

        self.events.list_upcoming(limit as i64).await
    }

    /// Events organized by one user
    pub async fn list_by_organizer(
        &self,
        organizer_id: i64,
        page: u32,
        limit: Option<u32>,
    ) -> Result<Vec<Event>> {
        let limit = clamp_page_limit(
            limit,
            self.settings.pagination.default_limit,
            self.settings.pagination.max_limit,
        );
        let offset = calculate_offset(page, limit);

        self.events
            .list_by_organizer(organizer_id, limit as i64, offset)
            .await
    }
}
