// AML alert (case) entity
// Append-only: transitions produce a new version that replaces the old one
// through a compare-and-swap on `version`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::value_objects::{AlertSeverity, AlertType, Party, SubjectType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    Open,
    UnderReview,
    Escalated,
    Cleared,
    Reported,
    Closed,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Open => "OPEN",
            AlertStatus::UnderReview => "UNDER_REVIEW",
            AlertStatus::Escalated => "ESCALATED",
            AlertStatus::Cleared => "CLEARED",
            AlertStatus::Reported => "REPORTED",
            AlertStatus::Closed => "CLOSED",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, AlertStatus::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionDecision {
    FalsePositive,
    Suspicious,
    Cleared,
    ReportedToFiu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub decision: ResolutionDecision,
    pub notes: String,
    pub resolved_at: DateTime<Utc>,
    pub resolved_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmlAlert {
    pub id: String,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub subject_id: String,
    pub subject_type: SubjectType,
    pub description: String,
    pub risk_score: u32,
    pub related_transactions: Vec<String>,
    pub evidence: Vec<String>,
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

/// Everything the detector knows about a finding before it becomes an alert.
#[derive(Debug, Clone)]
pub struct AlertDraft {
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub subject: Party,
    pub description: String,
    pub risk_score: u32,
    pub related_transactions: Vec<String>,
    pub evidence: Vec<String>,
}

impl AmlAlert {
    pub fn open(draft: AlertDraft, now: DateTime<Utc>) -> Result<Self, DomainError> {
        if draft.related_transactions.is_empty() {
            return Err(DomainError::invalid(
                "related_transactions",
                "an alert must reference at least one transaction",
            ));
        }
        Ok(Self {
            id: format!("ALT-{}", Uuid::new_v4().simple()),
            alert_type: draft.alert_type,
            severity: draft.severity,
            subject_id: draft.subject.id,
            subject_type: draft.subject.party_type,
            description: draft.description,
            risk_score: draft.risk_score,
            related_transactions: draft.related_transactions,
            evidence: draft.evidence,
            status: AlertStatus::Open,
            resolution: None,
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    fn with_status(&self, status: AlertStatus, now: DateTime<Utc>) -> Self {
        Self {
            status,
            updated_at: now,
            version: self.version + 1,
            ..self.clone()
        }
    }

    pub fn start_review(&self, now: DateTime<Utc>) -> Option<Self> {
        match self.status {
            AlertStatus::Open => Some(self.with_status(AlertStatus::UnderReview, now)),
            _ => None,
        }
    }

    pub fn escalate(&self, now: DateTime<Utc>) -> Option<Self> {
        match self.status {
            AlertStatus::Open | AlertStatus::UnderReview => {
                Some(self.with_status(AlertStatus::Escalated, now))
            }
            _ => None,
        }
    }

    pub fn clear(&self, now: DateTime<Utc>) -> Option<Self> {
        match self.status {
            AlertStatus::Escalated => Some(self.with_status(AlertStatus::Cleared, now)),
            _ => None,
        }
    }

    /// Only reachable through STR submission.
    pub fn mark_reported(&self, now: DateTime<Utc>) -> Option<Self> {
        match self.status {
            AlertStatus::Open | AlertStatus::UnderReview | AlertStatus::Escalated => {
                Some(self.with_status(AlertStatus::Reported, now))
            }
            _ => None,
        }
    }

    pub fn resolve(&self, resolution: Resolution) -> Option<Self> {
        if self.status.is_closed() {
            return None;
        }
        let mut next = self.with_status(AlertStatus::Closed, resolution.resolved_at);
        next.resolution = Some(resolution);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> AlertDraft {
        AlertDraft {
            alert_type: AlertType::VelocityAnomaly,
            severity: AlertSeverity::Medium,
            subject: Party::new("S1", SubjectType::Individual),
            description: "burst".to_string(),
            risk_score: 25,
            related_transactions: vec!["tx-1".to_string()],
            evidence: Vec::new(),
        }
    }

    fn resolution(decision: ResolutionDecision) -> Resolution {
        Resolution {
            decision,
            notes: "checked".to_string(),
            resolved_at: Utc::now(),
            resolved_by: "officer-1".to_string(),
        }
    }

    #[test]
    fn alert_requires_a_transaction() {
        let mut empty = draft();
        empty.related_transactions.clear();
        assert!(AmlAlert::open(empty, Utc::now()).is_err());
    }

    #[test]
    fn triage_path_bumps_version() {
        let now = Utc::now();
        let alert = AmlAlert::open(draft(), now).expect("alert");
        let review = alert.start_review(now).expect("review");
        assert_eq!(review.status, AlertStatus::UnderReview);
        assert_eq!(review.version, 2);
        assert!(review.start_review(now).is_none());
        let escalated = review.escalate(now).expect("escalate");
        let cleared = escalated.clear(now).expect("clear");
        assert_eq!(cleared.status, AlertStatus::Cleared);
        assert_eq!(cleared.version, 4);
        assert!(alert.clear(now).is_none());
    }

    #[test]
    fn closed_alert_cannot_be_resolved_or_reported() {
        let alert = AmlAlert::open(draft(), Utc::now()).expect("alert");
        let closed = alert
            .resolve(resolution(ResolutionDecision::FalsePositive))
            .expect("resolve");
        assert_eq!(closed.status, AlertStatus::Closed);
        assert!(closed.resolve(resolution(ResolutionDecision::Suspicious)).is_none());
        assert!(closed.mark_reported(Utc::now()).is_none());
        assert_eq!(
            closed.resolution.as_ref().map(|r| r.decision),
            Some(ResolutionDecision::FalsePositive)
        );
    }

    #[test]
    fn cleared_alert_is_not_reported() {
        let now = Utc::now();
        let alert = AmlAlert::open(draft(), now).expect("alert");
        let cleared = alert
            .escalate(now)
            .and_then(|escalated| escalated.clear(now))
            .expect("cleared");
        assert!(cleared.mark_reported(now).is_none());
        let escalated = alert.escalate(now).expect("escalate");
        assert_eq!(
            escalated.mark_reported(now).map(|reported| reported.status),
            Some(AlertStatus::Reported)
        );
    }

    #[test]
    fn reported_alert_can_still_be_closed() {
        let alert = AmlAlert::open(draft(), Utc::now()).expect("alert");
        let reported = alert.mark_reported(Utc::now()).expect("reported");
        assert!(reported
            .resolve(resolution(ResolutionDecision::ReportedToFiu))
            .is_some());
    }
}
