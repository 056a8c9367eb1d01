// Customer risk profile entity

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AlertType, RiskBands, RiskLevel, SubjectType};

const MAX_TYPICAL_COUNTERPARTIES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatus {
    #[default]
    Pending,
    Verified,
    EnhancedDueDiligence,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub weight: f64,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BehaviorBaseline {
    pub transaction_count: u64,
    pub total_volume: i64,
    pub average_transaction_size: f64,
    pub average_monthly_volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen_at: Option<DateTime<Utc>>,
    pub typical_counterparties: Vec<String>,
    /// Local hours of day in which the subject has transacted.
    pub normal_hours: BTreeSet<u32>,
}

impl BehaviorBaseline {
    pub fn has_history(&self) -> bool {
        self.transaction_count > 0 && self.average_transaction_size > 0.0
    }

    fn record(&self, sample: &ActivitySample) -> Self {
        let mut next = self.clone();
        next.transaction_count += 1;
        next.total_volume = next.total_volume.saturating_add(sample.amount);
        next.average_transaction_size +=
            (sample.amount as f64 - next.average_transaction_size) / next.transaction_count as f64;
        let first_seen = *next.first_seen_at.get_or_insert(sample.at);
        let months = (sample.at - first_seen).num_days().max(0) / 30 + 1;
        next.average_monthly_volume = next.total_volume as f64 / months as f64;
        if !next
            .typical_counterparties
            .iter()
            .any(|id| id == &sample.counterparty_id)
        {
            if next.typical_counterparties.len() >= MAX_TYPICAL_COUNTERPARTIES {
                next.typical_counterparties.remove(0);
            }
            next.typical_counterparties.push(sample.counterparty_id.clone());
        }
        next.normal_hours.insert(sample.local_hour);
        next
    }
}

/// One observed transaction folded into the sender's baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySample {
    pub amount: i64,
    pub counterparty_id: String,
    pub local_hour: u32,
    pub at: DateTime<Utc>,
}

/// Atomic read-modify-write operations a profile store applies per subject.
#[derive(Debug, Clone)]
pub enum ProfileUpdate {
    Alert {
        alert_id: String,
        alert_type: AlertType,
        risk_score: u32,
        dampening: f64,
        bands: RiskBands,
    },
    Activity(ActivitySample),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRiskProfile {
    pub subject_id: String,
    pub subject_type: SubjectType,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<RiskFactor>,
    pub kyc_status: KycStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_at: Option<DateTime<Utc>>,
    pub baseline: BehaviorBaseline,
    pub alert_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerRiskProfile {
    pub fn new(subject_id: impl Into<String>, subject_type: SubjectType, now: DateTime<Utc>) -> Self {
        Self {
            subject_id: subject_id.into(),
            subject_type,
            risk_score: 0.0,
            risk_level: RiskLevel::Low,
            risk_factors: Vec::new(),
            kyc_status: KycStatus::Pending,
            last_reviewed_at: None,
            next_review_at: Some(now + Duration::days(RiskLevel::Low.review_interval_days())),
            baseline: BehaviorBaseline::default(),
            alert_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&self, update: &ProfileUpdate, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.updated_at = now;
        match update {
            ProfileUpdate::Alert {
                alert_id,
                alert_type,
                risk_score,
                dampening,
                bands,
            } => {
                if next.alert_ids.iter().any(|id| id == alert_id) {
                    return self.clone();
                }
                let contribution = f64::from(*risk_score) * dampening;
                next.risk_score += contribution.max(0.0);
                let level = bands.level_for(next.risk_score);
                if level != next.risk_level {
                    next.next_review_at = Some(now + Duration::days(level.review_interval_days()));
                }
                next.risk_level = level;
                next.risk_factors.push(RiskFactor {
                    name: alert_type.as_str().to_string(),
                    weight: contribution,
                    source: alert_id.clone(),
                });
                next.alert_ids.push(alert_id.clone());
            }
            ProfileUpdate::Activity(sample) => {
                next.baseline = next.baseline.record(sample);
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert_update(id: &str, score: u32) -> ProfileUpdate {
        ProfileUpdate::Alert {
            alert_id: id.to_string(),
            alert_type: AlertType::Structuring,
            risk_score: score,
            dampening: 0.1,
            bands: RiskBands::default(),
        }
    }

    #[test]
    fn alert_updates_are_dampened_and_monotonic() {
        let now = Utc::now();
        let profile = CustomerRiskProfile::new("S1", SubjectType::Individual, now);
        let once = profile.apply(&alert_update("a1", 100), now);
        assert!((once.risk_score - 10.0).abs() < f64::EPSILON);
        assert_eq!(once.risk_level, RiskLevel::Low);
        let mut current = once;
        for idx in 0..5 {
            let next = current.apply(&alert_update(&format!("b{idx}"), 100), now);
            assert!(next.risk_score >= current.risk_score);
            current = next;
        }
        assert_eq!(current.risk_level, RiskLevel::High);
        assert_eq!(current.alert_ids.len(), 6);
    }

    #[test]
    fn same_alert_is_counted_once() {
        let now = Utc::now();
        let profile = CustomerRiskProfile::new("S1", SubjectType::Individual, now);
        let once = profile.apply(&alert_update("a1", 40), now);
        let twice = once.apply(&alert_update("a1", 40), now);
        assert_eq!(twice.alert_ids.len(), 1);
        assert!((twice.risk_score - 4.0).abs() < 1e-9);
    }

    #[test]
    fn activity_builds_running_baseline() {
        let now = Utc::now();
        let mut profile = CustomerRiskProfile::new("S1", SubjectType::Individual, now);
        assert!(!profile.baseline.has_history());
        for (amount, counterparty) in [(1_000, "M1"), (3_000, "M2"), (2_000, "M1")] {
            profile = profile.apply(
                &ProfileUpdate::Activity(ActivitySample {
                    amount,
                    counterparty_id: counterparty.to_string(),
                    local_hour: 14,
                    at: now,
                }),
                now,
            );
        }
        let baseline = &profile.baseline;
        assert_eq!(baseline.transaction_count, 3);
        assert!((baseline.average_transaction_size - 2_000.0).abs() < 1e-9);
        assert_eq!(baseline.typical_counterparties, vec!["M1", "M2"]);
        assert!(baseline.normal_hours.contains(&14));
        assert!((baseline.average_monthly_volume - 6_000.0).abs() < 1e-9);
    }
}
