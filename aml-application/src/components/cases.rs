use std::sync::Arc;

use aml_domain::ports::{AlertRepository, RiskProfileRepository};
use aml_domain::{
    ActorType, AlertStatus, AmlAlert, AuditAction, AuditEntry, CustomerRiskProfile, KycStatus, Resolution,
    ResolutionDecision, SubjectType,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, warn};

use crate::dtos::open_statuses;
use crate::ops::AuditRecorder;
use crate::AppError;

const MAX_CAS_ATTEMPTS: usize = 8;

/// Owns alert lifecycle transitions. Every change is a version CAS on the alert store.
pub struct CaseManager {
    alerts: Arc<dyn AlertRepository>,
    profiles: Arc<dyn RiskProfileRepository>,
    audit: AuditRecorder,
}

impl CaseManager {
    pub fn new(
        alerts: Arc<dyn AlertRepository>,
        profiles: Arc<dyn RiskProfileRepository>,
        audit: AuditRecorder,
    ) -> Self {
        Self { alerts, profiles, audit }
    }

    /// Closes the alert. `false` when it is missing or already CLOSED.
    pub async fn resolve(
        &self,
        alert_id: &str,
        decision: ResolutionDecision,
        notes: &str,
        resolved_by: &str,
    ) -> Result<bool, AppError> {
        let resolution = Resolution {
            decision,
            notes: notes.to_string(),
            resolved_at: Utc::now(),
            resolved_by: resolved_by.to_string(),
        };
        let Some((before, after)) = self
            .transition(alert_id, |alert| alert.resolve(resolution.clone()))
            .await?
        else {
            return Ok(false);
        };
        info!(alert_id = %after.id, decision = ?decision, "alert resolved");
        self.audit
            .record(AuditEntry::new(
                AuditAction::AlertResolved,
                resolved_by,
                ActorType::Admin,
                "AML_ALERT",
                after.id.clone(),
                json!({
                    "from": before.status,
                    "decision": decision,
                    "notes": notes,
                }),
            ))
            .await;
        Ok(true)
    }

    pub async fn start_review(&self, alert_id: &str, actor_id: &str) -> Result<bool, AppError> {
        self.triage(alert_id, actor_id, ActorType::Admin, AmlAlert::start_review).await
    }

    pub async fn escalate(&self, alert_id: &str, actor_id: &str) -> Result<bool, AppError> {
        self.triage(alert_id, actor_id, ActorType::Admin, AmlAlert::escalate).await
    }

    pub async fn clear(&self, alert_id: &str, actor_id: &str) -> Result<bool, AppError> {
        self.triage(alert_id, actor_id, ActorType::Admin, AmlAlert::clear).await
    }

    /// REPORTED is only set by report submission.
    pub(crate) async fn mark_reported(&self, alert_id: &str, actor_id: &str) -> Result<bool, AppError> {
        self.triage(alert_id, actor_id, ActorType::System, AmlAlert::mark_reported).await
    }

    pub async fn get_alert(&self, alert_id: &str) -> Result<Option<AmlAlert>, AppError> {
        Ok(self.alerts.get(alert_id).await?)
    }

    /// OPEN and UNDER_REVIEW alerts, newest first.
    pub async fn open_alerts(&self) -> Result<Vec<AmlAlert>, AppError> {
        let mut alerts = self.alerts.list_by_status(&open_statuses()).await?;
        sort_newest_first(&mut alerts);
        Ok(alerts)
    }

    pub async fn alerts_with_status(&self, statuses: &[AlertStatus]) -> Result<Vec<AmlAlert>, AppError> {
        let mut alerts = self.alerts.list_by_status(statuses).await?;
        sort_newest_first(&mut alerts);
        Ok(alerts)
    }

    pub async fn subject_alerts(&self, subject_id: &str) -> Result<Vec<AmlAlert>, AppError> {
        let mut alerts = self.alerts.list_by_subject(subject_id).await?;
        sort_newest_first(&mut alerts);
        Ok(alerts)
    }

    pub async fn profile(&self, subject_id: &str) -> Result<Option<CustomerRiskProfile>, AppError> {
        Ok(self.profiles.get(subject_id).await?)
    }

    /// Creates the profile unless one exists; an existing profile is returned unchanged.
    pub async fn onboard_profile(
        &self,
        subject_id: &str,
        subject_type: SubjectType,
        kyc_status: KycStatus,
    ) -> Result<CustomerRiskProfile, AppError> {
        let subject_id = subject_id.trim();
        if subject_id.is_empty() {
            return Err(AppError::BadRequest("subject_id is required".to_string()));
        }
        let mut profile = CustomerRiskProfile::new(subject_id, subject_type, Utc::now());
        profile.kyc_status = kyc_status;
        Ok(self.profiles.insert_if_absent(profile).await?)
    }

    async fn triage<F>(
        &self,
        alert_id: &str,
        actor_id: &str,
        actor_type: ActorType,
        step: F,
    ) -> Result<bool, AppError>
    where
        F: Fn(&AmlAlert, DateTime<Utc>) -> Option<AmlAlert>,
    {
        let Some((before, after)) = self
            .transition(alert_id, |alert| step(alert, Utc::now()))
            .await?
        else {
            return Ok(false);
        };
        info!(
            alert_id = %after.id,
            from = before.status.as_str(),
            to = after.status.as_str(),
            "alert status changed"
        );
        self.audit
            .record(AuditEntry::new(
                AuditAction::AlertStatusChanged,
                actor_id,
                actor_type,
                "AML_ALERT",
                after.id.clone(),
                json!({
                    "from": before.status,
                    "to": after.status,
                    "version": after.version,
                }),
            ))
            .await;
        Ok(true)
    }

    /// Re-reads and retries while another writer wins the CAS.
    async fn transition<F>(&self, alert_id: &str, step: F) -> Result<Option<(AmlAlert, AmlAlert)>, AppError>
    where
        F: Fn(&AmlAlert) -> Option<AmlAlert>,
    {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let Some(current) = self.alerts.get(alert_id).await? else {
                return Ok(None);
            };
            let Some(next) = step(&current) else {
                return Ok(None);
            };
            if self.alerts.replace(&next, current.version).await? {
                return Ok(Some((current, next)));
            }
        }
        warn!(alert_id, "alert transition abandoned after repeated conflicts");
        Ok(None)
    }
}

fn sort_newest_first(alerts: &mut [AmlAlert]) {
    alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
}
