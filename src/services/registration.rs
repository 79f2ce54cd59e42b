//! Registration service implementation
//!
//! Admission control for event sign-ups. The order is fixed: authenticate,
//! authorize, then admit. Admission itself is one atomic claim against
//! the event's capacity counter, so the cap holds under concurrent joins.
//! A claimed slot is given back whenever the follow-up row activation turns
//! out to be a lost race.

use tracing::{debug, info};

use crate::auth;
use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::database::repositories::{EventRepository, RegistrationRepository, UserRepository};
use crate::models::event::{Event, EventStatus};
use crate::models::registration::EventRegistration;
use crate::models::user::User;
use crate::utils::errors::{Result, VolunHubError};
use crate::utils::helpers::{calculate_offset, clamp_page_limit};
use crate::utils::logging::{log_denied, log_event_action};

#[derive(Clone)]
pub struct RegistrationService {
    registrations: RegistrationRepository,
    events: EventRepository,
    users: UserRepository,
    settings: Settings,
}

impl RegistrationService {
    pub fn new(db: &DatabaseService, settings: Settings) -> Self {
        Self {
            registrations: db.registrations.clone(),
            events: db.events.clone(),
            users: db.users.clone(),
            settings,
        }
    }

    async fn get_event(&self, event_id: i64) -> Result<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(VolunHubError::EventNotFound { event_id })
    }

    /// Register the actor for an event.
    ///
    /// A cancelled registration is reactivated on its original row; the
    /// pair never grows a second one. Full events refuse with a Conflict.
    pub async fn register(&self, actor: Option<&User>, event_id: i64) -> Result<EventRegistration> {
        let actor = auth::require_authenticated(actor)?;
        self.get_event(event_id).await?;

        // Friendly pre-check; the atomic path below still decides races
        if let Some(existing) = self.registrations.find_by_pair(actor.id, event_id).await? {
            if existing.is_active() {
                return Err(VolunHubError::AlreadyRegistered { event_id });
            }
        }

        if !self.events.claim_capacity_slot(event_id).await? {
            log_denied(Some(actor.id), "register", "event at full capacity");
            return Err(VolunHubError::EventFull { event_id });
        }

        match self.registrations.activate(actor.id, event_id).await? {
            Some(registration) => {
                log_event_action(event_id, "user_registered", actor.id, None);
                Ok(registration)
            }
            None => {
                // A concurrent duplicate won; give the claimed slot back
                self.events.release_capacity_slot(event_id).await?;
                Err(VolunHubError::AlreadyRegistered { event_id })
            }
        }
    }

    /// Cancel the actor's active registration and free its slot
    pub async fn cancel(&self, actor: Option<&User>, event_id: i64) -> Result<EventRegistration> {
        let actor = auth::require_authenticated(actor)?;
        self.get_event(event_id).await?;

        let registration = self
            .registrations
            .cancel_active(actor.id, event_id)
            .await?
            .ok_or(VolunHubError::RegistrationNotFound {
                user_id: actor.id,
                event_id,
            })?;

        self.events.release_capacity_slot(event_id).await?;
        log_event_action(event_id, "registration_cancelled", actor.id, None);

        Ok(registration)
    }

    /// Record on-site attendance for one participant (organizer or admin)
    pub async fn check_in(
        &self,
        actor: Option<&User>,
        event_id: i64,
        user_id: i64,
    ) -> Result<EventRegistration> {
        let actor = auth::require_authenticated(actor)?;
        let event = self.get_event(event_id).await?;
        auth::require_owner_or_admin(actor, &event)?;

        match self.registrations.mark_attended(user_id, event_id).await? {
            Some(registration) => {
                self.events.increment_checked_in(event_id, 1).await?;
                log_event_action(event_id, "participant_checked_in", actor.id, None);
                Ok(registration)
            }
            None => {
                // Zero rows: tell the caller whether the registration is
                // missing or the participant was already checked in
                match self.registrations.find_by_pair(user_id, event_id).await? {
                    Some(existing) if existing.is_active() && existing.attended => {
                        Err(VolunHubError::AlreadyCheckedIn { event_id, user_id })
                    }
                    _ => Err(VolunHubError::RegistrationNotFound { user_id, event_id }),
                }
            }
        }
    }

    /// Pay out attendance points to every active registration of a
    /// completed event (organizer or admin). Idempotent: rows already
    /// rewarded are skipped, so a second run credits nobody.
    pub async fn reward_registered_users(
        &self,
        actor: Option<&User>,
        event_id: i64,
    ) -> Result<usize> {
        let actor = auth::require_authenticated(actor)?;
        let event = self.get_event(event_id).await?;
        auth::require_owner_or_admin(actor, &event)?;

        if event.status != EventStatus::Completed {
            log_denied(Some(actor.id), "reward_registered_users", "event not completed");
            return Err(VolunHubError::EventNotCompleted { event_id });
        }

        let claimed = self.registrations.claim_unrewarded(event_id).await?;
        for registration in &claimed {
            self.users
                .credit_event_reward(
                    registration.user_id,
                    self.settings.rewards.points_per_event,
                    &self.settings.rewards,
                )
                .await?;
        }

        info!(
            event_id = event_id,
            actor_id = actor.id,
            rewarded = claimed.len(),
            "Event rewards paid out"
        );

        Ok(claimed.len())
    }

    /// Active registrations of an event (organizer or admin)
    pub async fn list_event_registrations(
        &self,
        actor: Option<&User>,
        event_id: i64,
        page: u32,
        limit: Option<u32>,
    ) -> Result<Vec<EventRegistration>> {
        let actor = auth::require_authenticated(actor)?;
        let event = self.get_event(event_id).await?;
        auth::require_owner_or_admin(actor, &event)?;

        let limit = clamp_page_limit(
            limit,
            self.settings.pagination.default_limit,
            self.settings.pagination.max_limit,
        );
        let offset = calculate_offset(page, limit);

        self.registrations
            .list_for_event(event_id, limit as i64, offset)
            .await
    }

    /// The actor's own registration history, cancelled rows included
    pub async fn my_registrations(
        &self,
        actor: Option<&User>,
        page: u32,
        limit: Option<u32>,
    ) -> Result<Vec<EventRegistration>> {
        let actor = auth::require_authenticated(actor)?;
        debug!(user_id = actor.id, "Listing own registrations");

        let limit = clamp_page_limit(
            limit,
            self.settings.pagination.default_limit,
            self.settings.pagination.max_limit,
        );
        let offset = calculate_offset(page, limit);

        self.registrations
            .list_for_user(actor.id, limit as i64, offset)
            .await
    }
}
