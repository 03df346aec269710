//! Activity-log writes for operator actions.
//!
//! Every committed state change is reported to the platform's activity-log
//! sink for compliance review. The write is strictly fire-and-forget: a
//! sink failure is logged locally and never rolls back or blocks the
//! action that already succeeded.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use pitboss_api::ActivityLogRequest;

use crate::action::{ActionKind, ActionRequest};
use crate::error::Result;

/// Severity attached to an activity-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

enum_display_fromstr!(
    Severity,
    crate::error::ConsoleError::invalid_severity,
    {
        Info => "info",
        Warning => "warning",
        Critical => "critical",
    }
);

/// A single activity-log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Client-generated id so retried writes can be de-duplicated server-side
    pub id: String,

    /// ISO 8601 timestamp with milliseconds
    pub timestamp: String,

    /// The operation, e.g. `approve`
    pub action: String,

    /// Functional area, e.g. `withdrawal`
    pub category: String,

    pub severity: Severity,

    pub resource_type: String,
    pub resource_id: String,

    /// Human-readable summary shown in the activity screen
    pub description: String,

    /// Entry-specific payload data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Create a new entry with the current timestamp.
    pub fn new(
        action: impl Into<String>,
        category: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: iso_timestamp_millis(),
            action: action.into(),
            category: category.into(),
            severity: Severity::Info,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            description: description.into(),
            details: None,
        }
    }

    /// Build the entry for a dispatched action against a resource.
    pub fn for_action(request: &ActionRequest, category: impl Into<String>) -> Self {
        let severity = match request.kind {
            ActionKind::Reject | ActionKind::Delete | ActionKind::Suspend => Severity::Warning,
            _ => Severity::Info,
        };
        let singular = request.resource.trim_end_matches('s');
        Self::new(
            request.kind.to_string(),
            category,
            singular,
            request.target_id.clone(),
            format!("{} {} {}", request.kind, singular, request.target_id),
        )
        .with_severity(severity)
        .with_details(request.payload.clone())
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_details(mut self, details: Option<serde_json::Value>) -> Self {
        self.details = details;
        self
    }

    /// Render into the backend's request payload.
    pub fn to_wire(&self) -> ActivityLogRequest {
        ActivityLogRequest {
            action: self.action.clone(),
            category: self.category.clone(),
            severity: self.severity.to_string(),
            resource_type: self.resource_type.clone(),
            resource_id: self.resource_id.clone(),
            description: self.description.clone(),
            details: self.details.clone(),
        }
    }
}

/// Get the current timestamp in ISO 8601 format with milliseconds
fn iso_timestamp_millis() -> String {
    use jiff::Timestamp;
    let now = Timestamp::now();
    now.strftime("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Destination for activity-log entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> Result<()>;
}

/// Sink that discards entries, for setups without an activity-log backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAuditSink;

#[async_trait]
impl AuditSink for NullAuditSink {
    async fn record(&self, _entry: AuditEntry) -> Result<()> {
        Ok(())
    }
}

/// Record an entry without waiting for the sink.
///
/// Failures are logged as warnings; the caller's operation has already
/// committed and must not observe them.
pub fn record_detached(sink: Arc<dyn AuditSink>, entry: AuditEntry) {
    tokio::spawn(async move {
        let action = entry.action.clone();
        let resource_id = entry.resource_id.clone();
        if let Err(e) = sink.record(entry).await {
            tracing::warn!(%action, %resource_id, error = %e, "activity-log write failed");
        }
    });
}
