//! Authorization predicates and ownership seam
//!
//! The predicates never return a generic error for "denied": callers get
//! `AuthenticationRequired` when no usable actor exists and
//! `PermissionDenied` when the actor is known but not allowed. A
//! deactivated account is treated exactly like no account at all.

use tracing::warn;

use crate::models::comment::Comment;
use crate::models::event::Event;
use crate::models::registration::EventRegistration;
use crate::models::report::Report;
use crate::models::user::User;
use crate::utils::errors::{Result, VolunHubError};

/// A resource with a single owning user.
///
/// Implemented by every entity whose mutation rights follow the
/// "owner or admin" rule. Friendships are deliberately not `Owned`:
/// their rights are party-specific (requester vs recipient) and live in
/// the friendship service.
pub trait Owned {
    fn owner_id(&self) -> i64;
}

impl Owned for Event {
    fn owner_id(&self) -> i64 {
        self.organizer_id
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

impl Owned for Report {
    fn owner_id(&self) -> i64 {
        self.reporter_id
    }
}

impl Owned for EventRegistration {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

/// Whether a usable actor is present. Deactivated accounts do not count.
pub fn is_authenticated(actor: Option<&User>) -> bool {
    actor.map(|user| user.is_active).unwrap_or(false)
}

/// Whether the actor holds the admin role
pub fn is_admin(actor: &User) -> bool {
    actor.is_admin
}

/// Whether an optional actor is an active admin. Listing code uses this
/// to decide if moderated rows stay visible.
pub fn is_active_admin(actor: Option<&User>) -> bool {
    actor.map(|user| user.is_active && user.is_admin).unwrap_or(false)
}

/// Whether the actor is the user identified by `user_id`
pub fn is_self(actor: &User, user_id: i64) -> bool {
    actor.id == user_id
}

/// Whether the actor owns `resource`
pub fn is_resource_owner<R: Owned>(actor: &User, resource: &R) -> bool {
    actor.id == resource.owner_id()
}

/// Admin role overrides ownership everywhere this rule applies
pub fn is_admin_or_owner<R: Owned>(actor: &User, resource: &R) -> bool {
    is_admin(actor) || is_resource_owner(actor, resource)
}

/// The authenticated actor, or `AuthenticationRequired`
pub fn require_authenticated(actor: Option<&User>) -> Result<&User> {
    match actor {
        Some(user) if user.is_active => Ok(user),
        Some(user) => {
            warn!(user_id = user.id, "denied: account is deactivated");
            Err(VolunHubError::AuthenticationRequired)
        }
        None => Err(VolunHubError::AuthenticationRequired),
    }
}

/// Deny unless the actor is an admin
pub fn require_admin(actor: &User) -> Result<()> {
    if is_admin(actor) {
        Ok(())
    } else {
        warn!(user_id = actor.id, "denied: administrator role required");
        Err(VolunHubError::PermissionDenied(
            "administrator role required".to_string(),
        ))
    }
}

/// Deny unless the actor is the named user or an admin
pub fn require_self_or_admin(actor: &User, user_id: i64) -> Result<()> {
    if is_self(actor, user_id) || is_admin(actor) {
        Ok(())
    } else {
        warn!(
            user_id = actor.id,
            target_user_id = user_id,
            "denied: not the account owner"
        );
        Err(VolunHubError::PermissionDenied(
            "you may only act on your own account".to_string(),
        ))
    }
}

/// Deny unless the actor owns `resource` or is an admin
pub fn require_owner_or_admin<R: Owned>(actor: &User, resource: &R) -> Result<()> {
    if is_admin_or_owner(actor, resource) {
        Ok(())
    } else {
        warn!(
            user_id = actor.id,
            owner_id = resource.owner_id(),
            "denied: not the resource owner"
        );
        Err(VolunHubError::PermissionDenied(
            "you do not own this resource".to_string(),
        ))
    }
}
