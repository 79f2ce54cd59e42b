//! Report repository implementation
//!
//! Resolution is terminal: the resolving UPDATE is conditioned on
//! `resolution_status = 'pending'`, so two admins racing on the same
//! report can never both win.

use sqlx::PgPool;
use crate::models::report::{
    Report, ReportSeverity, ReportTargetKind, ResolutionDecision, ResolutionStatus,
};
use crate::utils::errors::VolunHubError;

use super::unique_constraint;

const REPORT_COLUMNS: &str = "id, reporter_id, target_type, target_id, reason, description, \
     severity, resolution_status, responding_admin_id, responding_admin_notes, \
     resolution_decision, resolved_at, created_at, updated_at";

fn map_report_unique(err: sqlx::Error) -> VolunHubError {
    match unique_constraint(&err) {
        Some("reports_reporter_target_key") => VolunHubError::DuplicateReport,
        _ => VolunHubError::from(err),
    }
}

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// File a report; one per (reporter, target) is enforced by the store
    pub async fn create(
        &self,
        reporter_id: i64,
        target_type: ReportTargetKind,
        target_id: i64,
        reason: &str,
        description: &str,
        severity: ReportSeverity,
    ) -> Result<Report, VolunHubError> {
        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            INSERT INTO reports (reporter_id, target_type, target_id, reason, description, severity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(reporter_id)
        .bind(target_type)
        .bind(target_id)
        .bind(reason)
        .bind(description)
        .bind(severity)
        .fetch_one(&self.pool)
        .await
        .map_err(map_report_unique)?;

        Ok(report)
    }

    /// Find report by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Report>, VolunHubError> {
        let report = sqlx::query_as::<_, Report>(&format!(
            "SELECT {} FROM reports WHERE id = $1",
            REPORT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }

    /// Resolve a pending report. None when it does not exist or was
    /// already resolved.
    pub async fn resolve_if_pending(
        &self,
        id: i64,
        admin_id: i64,
        status: ResolutionStatus,
        decision: ResolutionDecision,
        notes: Option<&str>,
    ) -> Result<Option<Report>, VolunHubError> {
        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            UPDATE reports
            SET resolution_status = $2,
                resolution_decision = $3,
                responding_admin_id = $4,
                responding_admin_notes = $5,
                resolved_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND resolution_status = 'pending'
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .bind(decision)
        .bind(admin_id)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }

    /// Delete report; false when no row matched
    pub async fn delete(&self, id: i64) -> Result<bool, VolunHubError> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reports newest first, optionally narrowed to one resolution status
    pub async fn list(
        &self,
        status: Option<ResolutionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Report>, VolunHubError> {
        let reports = sqlx::query_as::<_, Report>(&format!(
            r#"
            SELECT {} FROM reports
            WHERE ($1::resolution_status IS NULL OR resolution_status = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            REPORT_COLUMNS
        ))
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_report_repository_creation() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/volunhub_test")
            .expect("lazy pool");
        let repo = ReportRepository::new(pool);
        assert!(!repo.pool.is_closed());
    }
}
