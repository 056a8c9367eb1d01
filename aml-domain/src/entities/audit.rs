// Audit entry and anchoring receipt

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorType {
    User,
    Admin,
    Merchant,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    TransactionMonitored,
    AlertStatusChanged,
    AlertResolved,
    StrCreated,
    StrSubmitted,
    StrAcknowledged,
    TravelRuleRecorded,
    PolicyCreated,
    PolicyUpdated,
    PolicyStatusChanged,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::TransactionMonitored => "TRANSACTION_MONITORED",
            AuditAction::AlertStatusChanged => "ALERT_STATUS_CHANGED",
            AuditAction::AlertResolved => "ALERT_RESOLVED",
            AuditAction::StrCreated => "STR_CREATED",
            AuditAction::StrSubmitted => "STR_SUBMITTED",
            AuditAction::StrAcknowledged => "STR_ACKNOWLEDGED",
            AuditAction::TravelRuleRecorded => "TRAVEL_RULE_RECORDED",
            AuditAction::PolicyCreated => "POLICY_CREATED",
            AuditAction::PolicyUpdated => "POLICY_UPDATED",
            AuditAction::PolicyStatusChanged => "POLICY_STATUS_CHANGED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub actor_id: String,
    pub actor_type: ActorType,
    pub target_type: String,
    pub target_id: String,
    pub metadata: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        action: AuditAction,
        actor_id: impl Into<String>,
        actor_type: ActorType,
        target_type: impl Into<String>,
        target_id: impl Into<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            action,
            actor_id: actor_id.into(),
            actor_type,
            target_type: target_type.into(),
            target_id: target_id.into(),
            metadata,
            recorded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorReceipt {
    pub hash: String,
}
