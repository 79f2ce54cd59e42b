//! User service implementation
//!
//! Registration, profiles, credentials, activation and the points
//! leaderboard. Every mutation authenticates the actor first, then
//! authorizes against the self-or-admin rule before touching the store.

use tracing::{debug, info};

use crate::auth;
use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::database::repositories::UserRepository;
use crate::models::user::{CreateUserRequest, UpdateProfileRequest, User};
use crate::models::validation;
use crate::utils::errors::{Result, VolunHubError};
use crate::utils::helpers::{calculate_offset, clamp_page_limit};
use crate::utils::logging::{log_admin_action, log_user_action};

/// User service for account operations
#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    settings: Settings,
}

impl UserService {
    pub fn new(db: &DatabaseService, settings: Settings) -> Self {
        Self {
            users: db.users.clone(),
            settings,
        }
    }

    /// Register a new account. Open to unauthenticated callers; the
    /// password is already hashed by the dispatch layer.
    pub async fn register_user(&self, mut request: CreateUserRequest) -> Result<User> {
        debug!(username = %request.username, "Registering new user");

        request.email = request.email.trim().to_lowercase();
        validation::validate_new_user(&request)?;

        let user = self.users.create(request).await?;
        log_user_action(user.id, "user_registered", None);

        Ok(user)
    }

    /// Fetch one user; the password hash never serializes
    pub async fn get_user(&self, user_id: i64) -> Result<User> {
        debug!(user_id = user_id, "Getting user");

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(VolunHubError::UserNotFound { user_id })
    }

    /// Update profile fields of `user_id`; only the user themselves or
    /// an admin may do so
    pub async fn update_profile(
        &self,
        actor: Option<&User>,
        user_id: i64,
        mut request: UpdateProfileRequest,
    ) -> Result<User> {
        let actor = auth::require_authenticated(actor)?;
        auth::require_self_or_admin(actor, user_id)?;

        if let Some(email) = request.email.take() {
            request.email = Some(email.trim().to_lowercase());
        }
        validation::validate_profile_update(&request)?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(VolunHubError::UserNotFound { user_id });
        }

        let user = self.users.update_profile(user_id, request).await?;
        info!(user_id = user_id, actor_id = actor.id, "User profile updated");

        Ok(user)
    }

    /// Replace the stored password hash; strictly self-service
    pub async fn change_password_hash(
        &self,
        actor: Option<&User>,
        user_id: i64,
        new_password_hash: &str,
    ) -> Result<()> {
        let actor = auth::require_authenticated(actor)?;
        if !auth::is_self(actor, user_id) {
            return Err(VolunHubError::PermissionDenied(
                "passwords can only be changed by the account owner".to_string(),
            ));
        }
        if new_password_hash.is_empty() {
            return Err(VolunHubError::InvalidInput(
                "password hash must not be empty".to_string(),
            ));
        }

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(VolunHubError::UserNotFound { user_id });
        }

        self.users.change_password_hash(user_id, new_password_hash).await?;
        log_user_action(user_id, "password_changed", None);

        Ok(())
    }

    /// Activate or deactivate an account (admin)
    pub async fn set_active(
        &self,
        actor: Option<&User>,
        user_id: i64,
        active: bool,
    ) -> Result<User> {
        let actor = auth::require_authenticated(actor)?;
        auth::require_admin(actor)?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(VolunHubError::UserNotFound { user_id });
        }

        let user = self.users.set_active_status(user_id, active).await?;
        log_admin_action(
            actor.id,
            if active { "user_activated" } else { "user_deactivated" },
            Some(&user_id.to_string()),
            None,
        );

        Ok(user)
    }

    /// Delete an account (admin). Owned events, registrations, comments
    /// and friendships cascade in the store.
    pub async fn delete_user(&self, actor: Option<&User>, user_id: i64) -> Result<()> {
        let actor = auth::require_authenticated(actor)?;
        auth::require_admin(actor)?;

        if !self.users.delete(user_id).await? {
            return Err(VolunHubError::UserNotFound { user_id });
        }
        log_admin_action(actor.id, "user_deleted", Some(&user_id.to_string()), None);

        Ok(())
    }

    /// List accounts (admin)
    pub async fn list_users(
        &self,
        actor: Option<&User>,
        page: u32,
        limit: Option<u32>,
    ) -> Result<Vec<User>> {
        let actor = auth::require_authenticated(actor)?;
        auth::require_admin(actor)?;

        let limit = clamp_page_limit(
            limit,
            self.settings.pagination.default_limit,
            self.settings.pagination.max_limit,
        );
        let offset = calculate_offset(page, limit);

        self.users.list(limit as i64, offset).await
    }

    /// Public leaderboard of active users by points
    pub async fn top_users(&self, limit: Option<u32>) -> Result<Vec<User>> {
        let limit = clamp_page_limit(
            limit,
            self.settings.pagination.default_limit,
            self.settings.pagination.max_limit,
        );

        self.users.top_by_points(limit as i64).await
    }
}
