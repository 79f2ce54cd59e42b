//! Report model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Collection a report points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "report_target_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportTargetKind {
    Event,
    Comment,
    User,
}

impl std::fmt::Display for ReportTargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportTargetKind::Event => write!(f, "event"),
            ReportTargetKind::Comment => write!(f, "comment"),
            ReportTargetKind::User => write!(f, "user"),
        }
    }
}

/// Polymorphic report target as a closed tagged variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target_type", content = "target_id", rename_all = "lowercase")]
pub enum ReportTarget {
    Event(i64),
    Comment(i64),
    User(i64),
}

impl ReportTarget {
    pub fn kind(&self) -> ReportTargetKind {
        match self {
            ReportTarget::Event(_) => ReportTargetKind::Event,
            ReportTarget::Comment(_) => ReportTargetKind::Comment,
            ReportTarget::User(_) => ReportTargetKind::User,
        }
    }

    pub fn target_id(&self) -> i64 {
        match self {
            ReportTarget::Event(id) | ReportTarget::Comment(id) | ReportTarget::User(id) => *id,
        }
    }

    pub fn from_parts(kind: ReportTargetKind, id: i64) -> Self {
        match kind {
            ReportTargetKind::Event => ReportTarget::Event(id),
            ReportTargetKind::Comment => ReportTarget::Comment(id),
            ReportTargetKind::User => ReportTarget::User(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "report_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportSeverity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resolution_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStatus {
    Pending,
    Reviewed,
    Dismissed,
}

impl std::fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionStatus::Pending => write!(f, "pending"),
            ResolutionStatus::Reviewed => write!(f, "reviewed"),
            ResolutionStatus::Dismissed => write!(f, "dismissed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resolution_decision", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResolutionDecision {
    Warned,
    Resolved,
    TargetRedacted,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    pub id: i64,
    pub reporter_id: i64,
    pub target_type: ReportTargetKind,
    pub target_id: i64,
    pub reason: String,
    pub description: String,
    pub severity: ReportSeverity,
    pub resolution_status: ResolutionStatus,
    pub responding_admin_id: Option<i64>,
    pub responding_admin_notes: Option<String>,
    pub resolution_decision: Option<ResolutionDecision>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    pub fn target(&self) -> ReportTarget {
        ReportTarget::from_parts(self.target_type, self.target_id)
    }

    /// Reviewed and dismissed are terminal
    pub fn is_resolved(&self) -> bool {
        self.resolution_status != ResolutionStatus::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReportRequest {
    pub target: ReportTarget,
    pub reason: String,
    pub description: String,
    pub severity: ReportSeverity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveReportRequest {
    pub resolution_status: ResolutionStatus,
    pub resolution_decision: ResolutionDecision,
    pub responding_admin_notes: Option<String>,
}
