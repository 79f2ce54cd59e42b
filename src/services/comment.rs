//! Comment service implementation
//!
//! Threaded comments under events with a hard depth cap of one: a reply
//! can never be replied to. Moderation (disable/enable) is admin-only and
//! hides rows from non-admin reads without deleting them.

use tracing::{debug, info};

use crate::auth;
use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::database::repositories::{CommentRepository, EventRepository, UserRepository};
use crate::models::comment::{Comment, CreateCommentRequest};
use crate::models::user::User;
use crate::models::validation;
use crate::utils::errors::{Result, VolunHubError};
use crate::utils::helpers::{calculate_offset, clamp_page_limit};
use crate::utils::logging::{log_admin_action, log_denied};

#[derive(Clone)]
pub struct CommentService {
    comments: CommentRepository,
    events: EventRepository,
    users: UserRepository,
    settings: Settings,
}

impl CommentService {
    pub fn new(db: &DatabaseService, settings: Settings) -> Self {
        Self {
            comments: db.comments.clone(),
            events: db.events.clone(),
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

    /// Post a comment, or a reply when `parent_comment_id` is set.
    ///
    /// Replies must target a visible top-level comment of the same event;
    /// anything deeper or crossing events is refused.
    pub async fn create_comment(
        &self,
        actor: Option<&User>,
        request: CreateCommentRequest,
    ) -> Result<Comment> {
        let actor = auth::require_authenticated(actor)?;

        let content = request.content.trim().to_string();
        validation::validate_comment_content(&content)?;

        let event = self
            .events
            .find_by_id(request.event_id)
            .await?
            .ok_or(VolunHubError::EventNotFound {
                event_id: request.event_id,
            })?;
        if event.disabled && !auth::is_admin(actor) {
            log_denied(Some(actor.id), "create_comment", "event is disabled");
            return Err(VolunHubError::EventDisabled { event_id: event.id });
        }

        let reply_depth = match request.parent_comment_id {
            Some(parent_id) => {
                let parent = self
                    .comments
                    .find_by_id(parent_id)
                    .await?
                    .ok_or(VolunHubError::CommentNotFound { comment_id: parent_id })?;

                if parent.disabled {
                    return Err(VolunHubError::CommentDisabled { comment_id: parent_id });
                }
                if !parent.accepts_replies() {
                    return Err(VolunHubError::ReplyDepthExceeded { parent_id });
                }
                if parent.event_id != request.event_id {
                    return Err(VolunHubError::ParentEventMismatch {
                        parent_id,
                        event_id: request.event_id,
                    });
                }

                parent.reply_depth + 1
            }
            None => 0,
        };

        let comment = self
            .comments
            .create(
                request.event_id,
                actor.id,
                &content,
                request.parent_comment_id,
                reply_depth,
            )
            .await?;

        self.events.increment_comments_count(event.id, 1).await?;
        self.users.increment_comments_count(actor.id, 1).await?;
        info!(
            comment_id = comment.id,
            event_id = event.id,
            user_id = actor.id,
            "Comment created"
        );

        Ok(comment)
    }

    /// Fetch one comment. Disabled rows stay hidden from non-admins.
    pub async fn get_comment(&self, actor: Option<&User>, comment_id: i64) -> Result<Comment> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(VolunHubError::CommentNotFound { comment_id })?;

        if comment.disabled && !auth::is_active_admin(actor) {
            return Err(VolunHubError::CommentNotFound { comment_id });
        }

        Ok(comment)
    }

    /// Delete a comment.
    ///
    /// Owners may only delete comments with no visible replies; admins
    /// force-delete regardless, and the store cascades the reply rows.
    pub async fn delete_comment(&self, actor: Option<&User>, comment_id: i64) -> Result<()> {
        let actor = auth::require_authenticated(actor)?;
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(VolunHubError::CommentNotFound { comment_id })?;

        if !auth::is_admin(actor) {
            if !auth::is_resource_owner(actor, &comment) {
                return Err(VolunHubError::PermissionDenied(
                    "only the author may delete this comment".to_string(),
                ));
            }

            let replies = self.comments.count_active_replies(comment_id).await?;
            if replies > 0 {
                log_denied(Some(actor.id), "delete_comment", "comment has active replies");
                return Err(VolunHubError::CommentHasReplies { comment_id });
            }
        }

        if !self.comments.delete(comment_id).await? {
            return Err(VolunHubError::CommentNotFound { comment_id });
        }

        self.events
            .increment_comments_count(comment.event_id, -1)
            .await?;
        self.users
            .increment_comments_count(comment.user_id, -1)
            .await?;
        info!(
            comment_id = comment_id,
            actor_id = actor.id,
            forced = auth::is_admin(actor) && actor.id != comment.user_id,
            "Comment deleted"
        );

        Ok(())
    }

    /// Flag a comment; bumps its lightweight report counter
    pub async fn report_comment(&self, actor: Option<&User>, comment_id: i64) -> Result<Comment> {
        let actor = auth::require_authenticated(actor)?;
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(VolunHubError::CommentNotFound { comment_id })?;

        if comment.disabled {
            return Err(VolunHubError::CommentDisabled { comment_id });
        }

        let comment = self.comments.increment_report_count(comment_id).await?;
        debug!(
            comment_id = comment_id,
            reporter_id = actor.id,
            report_count = comment.report_count,
            "Comment reported"
        );

        Ok(comment)
    }

    /// Hide a comment from non-admin reads (admin)
    pub async fn disable_comment(
        &self,
        actor: Option<&User>,
        comment_id: i64,
        reason: &str,
    ) -> Result<Comment> {
        let actor = auth::require_authenticated(actor)?;
        auth::require_admin(actor)?;

        if self.comments.find_by_id(comment_id).await?.is_none() {
            return Err(VolunHubError::CommentNotFound { comment_id });
        }

        let comment = self.comments.set_disabled(comment_id, reason, actor.id).await?;
        log_admin_action(actor.id, "comment_disabled", Some(&comment_id.to_string()), Some(reason));

        Ok(comment)
    }

    /// Restore a disabled comment (admin)
    pub async fn enable_comment(&self, actor: Option<&User>, comment_id: i64) -> Result<Comment> {
        let actor = auth::require_authenticated(actor)?;
        auth::require_admin(actor)?;

        if self.comments.find_by_id(comment_id).await?.is_none() {
            return Err(VolunHubError::CommentNotFound { comment_id });
        }

        let comment = self.comments.set_enabled(comment_id).await?;
        log_admin_action(actor.id, "comment_enabled", Some(&comment_id.to_string()), None);

        Ok(comment)
    }

    /// Top-level comments of an event, newest first. Admin actors also
    /// see disabled rows.
    pub async fn list_event_comments(
        &self,
        actor: Option<&User>,
        event_id: i64,
        page: u32,
        limit: Option<u32>,
    ) -> Result<Vec<Comment>> {
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(VolunHubError::EventNotFound { event_id });
        }

        let (limit, offset) = self.page_bounds(page, limit);
        self.comments
            .list_top_level_for_event(event_id, auth::is_active_admin(actor), limit, offset)
            .await
    }

    /// Replies under a comment in conversation order
    pub async fn list_replies(
        &self,
        actor: Option<&User>,
        comment_id: i64,
        page: u32,
        limit: Option<u32>,
    ) -> Result<Vec<Comment>> {
        // Re-uses the visibility rule: a hidden parent hides its thread
        self.get_comment(actor, comment_id).await?;

        let (limit, offset) = self.page_bounds(page, limit);
        self.comments
            .list_replies(comment_id, auth::is_active_admin(actor), limit, offset)
            .await
    }

    /// Visible comments written by one user, newest first
    pub async fn list_user_comments(
        &self,
        user_id: i64,
        page: u32,
        limit: Option<u32>,
    ) -> Result<Vec<Comment>> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(VolunHubError::UserNotFound { user_id });
        }

        let (limit, offset) = self.page_bounds(page, limit);
        self.comments.list_by_user(user_id, limit, offset).await
    }
}
