//! Friendship service implementation
//!
//! Friend requests between users with party-specific rights: only the
//! recipient answers a request, only the requester withdraws one, and
//! either side can unfriend once accepted. A single record per unordered
//! pair persists across all of this; rejected requests keep their row and
//! block a new request in either direction.

use tracing::{debug, info};

use crate::auth;
use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::database::repositories::{FriendshipRepository, UserRepository};
use crate::models::friendship::{FriendView, Friendship, FriendshipState, FriendshipStatus};
use crate::models::user::User;
use crate::utils::errors::{Result, VolunHubError};
use crate::utils::helpers::{calculate_offset, clamp_page_limit};
use crate::utils::logging::log_user_action;

#[derive(Clone)]
pub struct FriendshipService {
    friendships: FriendshipRepository,
    users: UserRepository,
    settings: Settings,
}

impl FriendshipService {
    pub fn new(db: &DatabaseService, settings: Settings) -> Self {
        Self {
            friendships: db.friendships.clone(),
            users: db.users.clone(),
            settings,
        }
    }

    fn page_bounds(&self, page: u32, limit: Option<u32>) -> (i64, i64) {
        let limit = clamp_page_limit(
            limit,
            self.settings.pagination.default_limit,
            self.settings.pagination.max_limit,
        );
        (limit as i64, calculate_offset(page, limit))
    }

    async fn get_friendship(&self, friendship_id: i64) -> Result<Friendship> {
        self.friendships
            .find_by_id(friendship_id)
            .await?
            .ok_or(VolunHubError::FriendshipNotFound { friendship_id })
    }

    /// Send a friend request to another user
    pub async fn send_request(&self, actor: Option<&User>, recipient_id: i64) -> Result<Friendship> {
        let actor = auth::require_authenticated(actor)?;

        if actor.id == recipient_id {
            return Err(VolunHubError::SelfFriendship);
        }
        if self.users.find_by_id(recipient_id).await?.is_none() {
            return Err(VolunHubError::UserNotFound { user_id: recipient_id });
        }

        // Friendly pre-check; the pair index still decides races
        if self
            .friendships
            .find_by_pair(actor.id, recipient_id)
            .await?
            .is_some()
        {
            return Err(VolunHubError::DuplicateFriendship);
        }

        let friendship = self.friendships.create(actor.id, recipient_id).await?;
        log_user_action(actor.id, "friend_request_sent", Some(&recipient_id.to_string()));

        Ok(friendship)
    }

    /// Accept a pending request (recipient only); bumps both friend
    /// counters exactly once
    pub async fn accept_request(
        &self,
        actor: Option<&User>,
        friendship_id: i64,
    ) -> Result<Friendship> {
        let actor = auth::require_authenticated(actor)?;
        let friendship = self.get_friendship(friendship_id).await?;

        if friendship.friend_id != actor.id {
            return Err(VolunHubError::PermissionDenied(
                "only the recipient may answer a friend request".to_string(),
            ));
        }

        let accepted = self
            .answer_pending(&friendship, FriendshipStatus::Accepted)
            .await?;

        self.users.increment_friends_count(accepted.user_id, 1).await?;
        self.users.increment_friends_count(accepted.friend_id, 1).await?;
        info!(
            friendship_id = friendship_id,
            user_id = accepted.user_id,
            friend_id = accepted.friend_id,
            "Friend request accepted"
        );

        Ok(accepted)
    }

    /// Reject a pending request (recipient only); the record stays and
    /// blocks future requests between the pair
    pub async fn reject_request(
        &self,
        actor: Option<&User>,
        friendship_id: i64,
    ) -> Result<Friendship> {
        let actor = auth::require_authenticated(actor)?;
        let friendship = self.get_friendship(friendship_id).await?;

        if friendship.friend_id != actor.id {
            return Err(VolunHubError::PermissionDenied(
                "only the recipient may answer a friend request".to_string(),
            ));
        }

        let rejected = self
            .answer_pending(&friendship, FriendshipStatus::Rejected)
            .await?;
        info!(friendship_id = friendship_id, "Friend request rejected");

        Ok(rejected)
    }

    /// Withdraw a pending request (requester only); deletes the record
    pub async fn cancel_request(&self, actor: Option<&User>, friendship_id: i64) -> Result<()> {
        let actor = auth::require_authenticated(actor)?;
        let friendship = self.get_friendship(friendship_id).await?;

        if friendship.user_id != actor.id {
            return Err(VolunHubError::PermissionDenied(
                "only the requester may withdraw a friend request".to_string(),
            ));
        }
        if friendship.status != FriendshipStatus::Pending {
            return Err(VolunHubError::InvalidStateTransition {
                from: friendship.status.to_string(),
                to: "cancelled".to_string(),
            });
        }

        if !self
            .friendships
            .delete_if_status(friendship_id, FriendshipStatus::Pending)
            .await?
        {
            // Answered between our read and the delete
            return Err(VolunHubError::InvalidStateTransition {
                from: "answered".to_string(),
                to: "cancelled".to_string(),
            });
        }
        debug!(friendship_id = friendship_id, "Friend request withdrawn");

        Ok(())
    }

    /// Unfriend (either party, accepted records only); decrements both
    /// friend counters
    pub async fn remove_friend(&self, actor: Option<&User>, friendship_id: i64) -> Result<()> {
        let actor = auth::require_authenticated(actor)?;
        let friendship = self.get_friendship(friendship_id).await?;

        if !friendship.involves(actor.id) {
            return Err(VolunHubError::PermissionDenied(
                "you are not part of this friendship".to_string(),
            ));
        }
        if friendship.status != FriendshipStatus::Accepted {
            return Err(VolunHubError::InvalidStateTransition {
                from: friendship.status.to_string(),
                to: "removed".to_string(),
            });
        }

        if !self
            .friendships
            .delete_if_status(friendship_id, FriendshipStatus::Accepted)
            .await?
        {
            return Err(VolunHubError::InvalidStateTransition {
                from: "changed".to_string(),
                to: "removed".to_string(),
            });
        }

        self.users.increment_friends_count(friendship.user_id, -1).await?;
        self.users.increment_friends_count(friendship.friend_id, -1).await?;
        info!(
            friendship_id = friendship_id,
            actor_id = actor.id,
            "Friendship removed"
        );

        Ok(())
    }

    /// The actor's friendships in `status` (accepted by default),
    /// projected onto the other party
    pub async fn list_friends(
        &self,
        actor: Option<&User>,
        status: Option<FriendshipStatus>,
        page: u32,
        limit: Option<u32>,
    ) -> Result<Vec<FriendView>> {
        let actor = auth::require_authenticated(actor)?;
        let status = status.unwrap_or(FriendshipStatus::Accepted);
        let (limit, offset) = self.page_bounds(page, limit);

        self.friendships
            .list_views(actor.id, status, limit, offset)
            .await
    }

    /// Requests waiting on the actor's answer
    pub async fn list_pending_requests(
        &self,
        actor: Option<&User>,
        page: u32,
        limit: Option<u32>,
    ) -> Result<Vec<FriendView>> {
        let actor = auth::require_authenticated(actor)?;
        let (limit, offset) = self.page_bounds(page, limit);

        self.friendships
            .list_incoming_pending(actor.id, limit, offset)
            .await
    }

    /// Requests the actor has sent and not yet been answered
    pub async fn list_sent_requests(
        &self,
        actor: Option<&User>,
        page: u32,
        limit: Option<u32>,
    ) -> Result<Vec<FriendView>> {
        let actor = auth::require_authenticated(actor)?;
        let (limit, offset) = self.page_bounds(page, limit);

        self.friendships
            .list_outgoing_pending(actor.id, limit, offset)
            .await
    }

    /// Relationship summary between the actor and another user
    pub async fn friendship_status(
        &self,
        actor: Option<&User>,
        other_user_id: i64,
    ) -> Result<FriendshipState> {
        let actor = auth::require_authenticated(actor)?;

        if actor.id == other_user_id {
            return Ok(FriendshipState {
                status: None,
                friendship_id: None,
                is_requester: false,
                can_send_request: false,
            });
        }
        if self.users.find_by_id(other_user_id).await?.is_none() {
            return Err(VolunHubError::UserNotFound { user_id: other_user_id });
        }

        let state = match self.friendships.find_by_pair(actor.id, other_user_id).await? {
            Some(record) => FriendshipState {
                status: Some(record.status),
                friendship_id: Some(record.id),
                is_requester: record.user_id == actor.id,
                can_send_request: false,
            },
            None => FriendshipState {
                status: None,
                friendship_id: None,
                is_requester: false,
                can_send_request: true,
            },
        };

        Ok(state)
    }

    /// Move a pending record to `status`, translating a lost race into
    /// the same Conflict a stale read would have produced
    async fn answer_pending(
        &self,
        friendship: &Friendship,
        status: FriendshipStatus,
    ) -> Result<Friendship> {
        if friendship.status != FriendshipStatus::Pending {
            return Err(VolunHubError::InvalidStateTransition {
                from: friendship.status.to_string(),
                to: status.to_string(),
            });
        }

        self.friendships
            .set_status_if_pending(friendship.id, status)
            .await?
            .ok_or(VolunHubError::InvalidStateTransition {
                from: "answered".to_string(),
                to: status.to_string(),
            })
    }
}
