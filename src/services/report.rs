//! Report service implementation
//!
//! Abuse reports against events, comments or users. The target rides
//! through the API as a tagged variant so an unknown collection cannot be
//! expressed. Resolution is terminal: once an admin reviews or dismisses
//! a report, nothing moves it again.

use tracing::{debug, info};

use crate::auth;
use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::database::repositories::{
    CommentRepository, EventRepository, ReportRepository, UserRepository,
};
use crate::models::report::{
    NewReportRequest, Report, ReportTarget, ResolutionStatus, ResolveReportRequest,
};
use crate::models::user::User;
use crate::models::validation;
use crate::utils::errors::{Result, VolunHubError};
use crate::utils::helpers::{calculate_offset, clamp_page_limit};
use crate::utils::logging::log_admin_action;

#[derive(Clone)]
pub struct ReportService {
    reports: ReportRepository,
    events: EventRepository,
    comments: CommentRepository,
    users: UserRepository,
    settings: Settings,
}

impl ReportService {
    pub fn new(db: &DatabaseService, settings: Settings) -> Self {
        Self {
            reports: db.reports.clone(),
            events: db.events.clone(),
            comments: db.comments.clone(),
            users: db.users.clone(),
            settings,
        }
    }

    /// File a report. The target must exist, users cannot report
    /// themselves, and each reporter gets one report per target.
    pub async fn create_report(
        &self,
        actor: Option<&User>,
        request: NewReportRequest,
    ) -> Result<Report> {
        let actor = auth::require_authenticated(actor)?;

        validation::validate_report_fields(&request.reason, &request.description)?;
        self.ensure_target_exists(actor, request.target).await?;

        let report = self
            .reports
            .create(
                actor.id,
                request.target.kind(),
                request.target.target_id(),
                &request.reason,
                &request.description,
                request.severity,
            )
            .await?;

        info!(
            report_id = report.id,
            reporter_id = actor.id,
            target_type = %report.target_type,
            target_id = report.target_id,
            "Report filed"
        );

        Ok(report)
    }

    /// Fetch one report (reporter or admin)
    pub async fn get_report(&self, actor: Option<&User>, report_id: i64) -> Result<Report> {
        let actor = auth::require_authenticated(actor)?;
        let report = self
            .reports
            .find_by_id(report_id)
            .await?
            .ok_or(VolunHubError::ReportNotFound { report_id })?;

        auth::require_owner_or_admin(actor, &report)?;

        Ok(report)
    }

    /// Reports newest first, optionally narrowed to one resolution
    /// status (admin)
    pub async fn list_reports(
        &self,
        actor: Option<&User>,
        status: Option<ResolutionStatus>,
        page: u32,
        limit: Option<u32>,
    ) -> Result<Vec<Report>> {
        let actor = auth::require_authenticated(actor)?;
        auth::require_admin(actor)?;

        let limit = clamp_page_limit(
            limit,
            self.settings.pagination.default_limit,
            self.settings.pagination.max_limit,
        );
        let offset = calculate_offset(page, limit);

        self.reports.list(status, limit as i64, offset).await
    }

    /// Resolve a pending report (admin). Terminal: a report resolves at
    /// most once, and racing admins lose with a Conflict.
    pub async fn resolve_report(
        &self,
        actor: Option<&User>,
        report_id: i64,
        request: ResolveReportRequest,
    ) -> Result<Report> {
        let actor = auth::require_authenticated(actor)?;
        auth::require_admin(actor)?;

        if request.resolution_status == ResolutionStatus::Pending {
            return Err(VolunHubError::InvalidInput(
                "resolution must move the report out of pending".to_string(),
            ));
        }

        let resolved = self
            .reports
            .resolve_if_pending(
                report_id,
                actor.id,
                request.resolution_status,
                request.resolution_decision,
                request.responding_admin_notes.as_deref(),
            )
            .await?;

        match resolved {
            Some(report) => {
                log_admin_action(
                    actor.id,
                    "report_resolved",
                    Some(&report_id.to_string()),
                    Some(&report.resolution_status.to_string()),
                );
                Ok(report)
            }
            None => match self.reports.find_by_id(report_id).await? {
                Some(existing) => Err(VolunHubError::InvalidStateTransition {
                    from: existing.resolution_status.to_string(),
                    to: request.resolution_status.to_string(),
                }),
                None => Err(VolunHubError::ReportNotFound { report_id }),
            },
        }
    }

    /// Drop a report entirely (admin)
    pub async fn delete_report(&self, actor: Option<&User>, report_id: i64) -> Result<()> {
        let actor = auth::require_authenticated(actor)?;
        auth::require_admin(actor)?;

        if !self.reports.delete(report_id).await? {
            return Err(VolunHubError::ReportNotFound { report_id });
        }
        log_admin_action(actor.id, "report_deleted", Some(&report_id.to_string()), None);

        Ok(())
    }

    /// NotFound for missing targets, Conflict for self-reports
    async fn ensure_target_exists(&self, actor: &User, target: ReportTarget) -> Result<()> {
        match target {
            ReportTarget::Event(event_id) => {
                if self.events.find_by_id(event_id).await?.is_none() {
                    return Err(VolunHubError::EventNotFound { event_id });
                }
            }
            ReportTarget::Comment(comment_id) => {
                if self.comments.find_by_id(comment_id).await?.is_none() {
                    return Err(VolunHubError::CommentNotFound { comment_id });
                }
            }
            ReportTarget::User(user_id) => {
                if user_id == actor.id {
                    debug!(user_id = actor.id, "Self-report refused");
                    return Err(VolunHubError::SelfReport);
                }
                if self.users.find_by_id(user_id).await?.is_none() {
                    return Err(VolunHubError::UserNotFound { user_id });
                }
            }
        }

        Ok(())
    }
}
