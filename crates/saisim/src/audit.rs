//! Structured audit trail of object lifecycle events.
//!
//! Every object create and remove, switch bootstrap and warm-restart
//! transition is emitted as one JSON record on the `audit` tracing target,
//! next to the regular `log` output. Records carry a UTC timestamp, the
//! emitting component, the action, its outcome and the affected object.

use chrono::{DateTime, Utc};
use saisim_types::{ObjectType, Oid};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditCategory {
    ResourceCreate,
    ResourceModify,
    ResourceDelete,
    SystemLifecycle,
    WarmRestart,
}

impl fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuditCategory::ResourceCreate => "RESOURCE_CREATE",
            AuditCategory::ResourceModify => "RESOURCE_MODIFY",
            AuditCategory::ResourceDelete => "RESOURCE_DELETE",
            AuditCategory::SystemLifecycle => "SYSTEM_LIFECYCLE",
            AuditCategory::WarmRestart => "WARM_RESTART",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    Failure,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Success => f.write_str("success"),
            AuditOutcome::Failure => f.write_str("failure"),
        }
    }
}

/// One audit event. Built with the `with_*` methods, then passed to
/// [`audit_log!`](crate::audit_log).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub category: AuditCategory,
    pub source: String,
    pub action: String,
    pub outcome: AuditOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditRecord {
    /// New record with the current timestamp and a successful outcome.
    pub fn new(
        category: AuditCategory,
        source: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            category,
            source: source.into(),
            action: action.into(),
            outcome: AuditOutcome::Success,
            object_id: None,
            object_type: None,
            details: None,
            error: None,
        }
    }

    pub fn with_object(mut self, oid: Oid, object_type: ObjectType) -> Self {
        self.object_id = Some(format!("{:#x}", oid));
        self.object_type = Some(object_type.to_string());
        self
    }

    pub fn with_object_type(mut self, object_type: ObjectType) -> Self {
        self.object_type = Some(object_type.to_string());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Records a failure reason and marks the outcome as failed.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.outcome = AuditOutcome::Failure;
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization_failed","message":"{}"}}"#, e))
    }
}

/// Emits an [`AuditRecord`] on the `audit` target: successes at info,
/// failures at warn.
#[macro_export]
macro_rules! audit_log {
    ($record:expr) => {
        let record = $record;
        match record.outcome {
            $crate::audit::AuditOutcome::Success => {
                tracing::info!(
                    target: "audit",
                    category = %record.category,
                    source = %record.source,
                    action = %record.action,
                    audit_json = %record.to_json(),
                    "AUDIT: {} - {} - {}",
                    record.category,
                    record.action,
                    record.outcome
                );
            }
            $crate::audit::AuditOutcome::Failure => {
                tracing::warn!(
                    target: "audit",
                    category = %record.category,
                    source = %record.source,
                    action = %record.action,
                    error = record.error.as_deref().unwrap_or(""),
                    audit_json = %record.to_json(),
                    "AUDIT: {} - {} - {}",
                    record.category,
                    record.action,
                    record.outcome
                );
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_json() {
        let record = AuditRecord::new(AuditCategory::ResourceCreate, "AclOrch", "create_acl_entry")
            .with_object(0x1f, ObjectType::AclEntry);
        let json: serde_json::Value = serde_json::from_str(&record.to_json()).unwrap();
        assert_eq!(json["category"], "RESOURCE_CREATE");
        assert_eq!(json["outcome"], "success");
        assert_eq!(json["object_id"], "0x1f");
        assert_eq!(json["object_type"], "SAI_OBJECT_TYPE_ACL_ENTRY");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_marks_failure() {
        let record = AuditRecord::new(AuditCategory::ResourceDelete, "NextHopOrch", "remove")
            .with_error("group not found");
        assert_eq!(record.outcome, AuditOutcome::Failure);
        assert_eq!(record.error.as_deref(), Some("group not found"));
    }

    #[test]
    fn test_macro_accepts_record() {
        audit_log!(AuditRecord::new(
            AuditCategory::SystemLifecycle,
            "SwitchOrch",
            "bootstrap"
        ));
    }
}
