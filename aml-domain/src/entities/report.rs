// Suspicious transaction report entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::SubjectType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Draft,
    Submitted,
    Acknowledged,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "DRAFT",
            ReportStatus::Submitted => "SUBMITTED",
            ReportStatus::Acknowledged => "ACKNOWLEDGED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousTransactionReport {
    pub id: String,
    pub report_number: String,
    pub subject_id: String,
    pub subject_type: SubjectType,
    pub alert_ids: Vec<String>,
    pub transaction_ids: Vec<String>,
    pub total_amount: i64,
    pub suspicion_type: String,
    pub description: String,
    pub evidence: Vec<String>,
    pub status: ReportStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledged_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiu_reference: Option<String>,
}

impl SuspiciousTransactionReport {
    pub fn report_number(created_at: DateTime<Utc>, sequence: u64) -> String {
        format!("STR-{}-{:06}", created_at.format("%Y%m%d"), sequence)
    }

    /// Content that gets anchored; fixed once the report leaves DRAFT.
    pub fn anchor_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "report_number": self.report_number,
            "subject_id": self.subject_id,
            "subject_type": self.subject_type,
            "alert_ids": self.alert_ids,
            "transaction_ids": self.transaction_ids,
            "total_amount": self.total_amount,
            "suspicion_type": self.suspicion_type,
            "description": self.description,
            "evidence": self.evidence,
            "created_by": self.created_by,
            "created_at": self.created_at,
        })
    }

    pub fn submitted(&self, anchor_hash: String, submitted_by: &str, now: DateTime<Utc>) -> Option<Self> {
        if self.status != ReportStatus::Draft {
            return None;
        }
        Some(Self {
            status: ReportStatus::Submitted,
            submitted_at: Some(now),
            submitted_by: Some(submitted_by.to_string()),
            anchor_hash: Some(anchor_hash),
            ..self.clone()
        })
    }

    pub fn acknowledged(&self, fiu_reference: Option<String>, now: DateTime<Utc>) -> Option<Self> {
        if self.status != ReportStatus::Submitted {
            return None;
        }
        Some(Self {
            status: ReportStatus::Acknowledged,
            acknowledged_at: Some(now),
            fiu_reference,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> SuspiciousTransactionReport {
        let created_at = Utc.with_ymd_and_hms(2026, 6, 2, 9, 0, 0).unwrap();
        SuspiciousTransactionReport {
            id: "r1".to_string(),
            report_number: SuspiciousTransactionReport::report_number(created_at, 7),
            subject_id: "S1".to_string(),
            subject_type: SubjectType::Individual,
            alert_ids: vec!["a1".to_string()],
            transaction_ids: vec!["t1".to_string()],
            total_amount: 9_500_000,
            suspicion_type: "STRUCTURING".to_string(),
            description: "split deposits".to_string(),
            evidence: Vec::new(),
            status: ReportStatus::Draft,
            created_by: "officer".to_string(),
            created_at,
            submitted_at: None,
            submitted_by: None,
            anchor_hash: None,
            acknowledged_at: None,
            fiu_reference: None,
        }
    }

    #[test]
    fn report_number_is_dated_and_padded() {
        assert_eq!(draft().report_number, "STR-20260602-000007");
    }

    #[test]
    fn lifecycle_only_moves_forward() {
        let report = draft();
        assert!(report.acknowledged(None, Utc::now()).is_none());
        let submitted = report
            .submitted("0xabc".to_string(), "officer", Utc::now())
            .expect("submit");
        assert_eq!(submitted.anchor_hash.as_deref(), Some("0xabc"));
        assert!(submitted.submitted("0xdef".to_string(), "officer", Utc::now()).is_none());
        let acked = submitted
            .acknowledged(Some("KOFIU-1".to_string()), Utc::now())
            .expect("ack");
        assert_eq!(acked.status, ReportStatus::Acknowledged);
        assert_eq!(acked.anchor_hash.as_deref(), Some("0xabc"));
    }
}
