use std::sync::Arc;

use aml_domain::ports::{AlertRepository, RiskProfileRepository, SanctionsList, TransactionRepository};
use aml_domain::services::{assess_transaction, history_window, RiskInput};
use aml_domain::{
    local_hour, ActivitySample, ActorType, AmlAlert, AuditAction, AuditEntry, MonitorThresholds,
    MonitoredTransaction, ProfileUpdate, RiskBands, RiskFlag,
};
use chrono::{FixedOffset, Utc};
use serde_json::json;
use tracing::{info, warn};

use crate::components::TravelRuleRecorder;
use crate::dtos::MonitorOutcome;
use crate::ops::{AuditRecorder, KeyedLocks};
use crate::{AppError, Metrics};

#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    pub thresholds: MonitorThresholds,
    pub risk_bands: RiskBands,
    pub profile_score_dampening: f64,
    pub utc_offset: FixedOffset,
}

pub struct TransactionMonitor {
    settings: MonitorSettings,
    transactions: Arc<dyn TransactionRepository>,
    alerts: Arc<dyn AlertRepository>,
    profiles: Arc<dyn RiskProfileRepository>,
    sanctions: Arc<dyn SanctionsList>,
    travel_rule: Arc<TravelRuleRecorder>,
    audit: AuditRecorder,
    metrics: Arc<Metrics>,
    sender_locks: KeyedLocks,
}

impl TransactionMonitor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: MonitorSettings,
        transactions: Arc<dyn TransactionRepository>,
        alerts: Arc<dyn AlertRepository>,
        profiles: Arc<dyn RiskProfileRepository>,
        sanctions: Arc<dyn SanctionsList>,
        travel_rule: Arc<TravelRuleRecorder>,
        audit: AuditRecorder,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            settings,
            transactions,
            alerts,
            profiles,
            sanctions,
            travel_rule,
            audit,
            metrics,
            sender_locks: KeyedLocks::default(),
        }
    }

    pub fn thresholds(&self) -> &MonitorThresholds {
        &self.settings.thresholds
    }

    /// Scores one transaction, stores it with its flags and raises any alerts.
    ///
    /// Reading the sender history, evaluating and appending happen under one
    /// per-sender lock, so concurrent calls for a sender see each other.
    /// The transaction is appended only after its alerts are stored, so a
    /// failed call can be retried with the same id.
    pub async fn monitor(&self, transaction: MonitoredTransaction) -> Result<MonitorOutcome, AppError> {
        transaction.validate()?;
        let settings = self.settings;
        let now = Utc::now();

        let (assessed, assessment, alerts) = {
            let _guard = self.sender_locks.lock(&transaction.sender.id).await;
            if self.transactions.exists(&transaction.id).await? {
                return Err(AppError::BadRequest(format!(
                    "transaction '{}' was already monitored",
                    transaction.id
                )));
            }

            let since = transaction.timestamp - history_window(&settings.thresholds);
            let history = self
                .transactions
                .fetch_sender_since(&transaction.sender.id, since)
                .await?;
            let profile = self.profiles.get(&transaction.sender.id).await?;
            let assessment = assess_transaction(
                &RiskInput {
                    transaction: &transaction,
                    sender_history: &history,
                    sender_profile: profile.as_ref(),
                },
                &settings.thresholds,
                self.sanctions.as_ref(),
            );

            let assessed = transaction.assessed(assessment.risk_score, assessment.flags.clone());

            let mut alerts = Vec::with_capacity(assessment.alerts.len());
            for draft in assessment.alerts.iter().cloned() {
                let alert = AmlAlert::open(draft, now)?;
                self.alerts.insert(&alert).await?;
                self.profiles
                    .apply(
                        &alert.subject_id,
                        alert.subject_type,
                        &ProfileUpdate::Alert {
                            alert_id: alert.id.clone(),
                            alert_type: alert.alert_type,
                            risk_score: alert.risk_score,
                            dampening: settings.profile_score_dampening,
                            bands: settings.risk_bands,
                        },
                        now,
                    )
                    .await?;
                alerts.push(alert);
            }

            self.transactions.append(&assessed).await?;

            // The decision is already stored; a baseline miss only degrades later scoring.
            if let Err(err) = self
                .profiles
                .apply(
                    &assessed.sender.id,
                    assessed.sender.party_type,
                    &ProfileUpdate::Activity(ActivitySample {
                        amount: assessed.amount,
                        counterparty_id: assessed.recipient.id.clone(),
                        local_hour: local_hour(assessed.timestamp, settings.utc_offset),
                        at: assessed.timestamp,
                    }),
                    now,
                )
                .await
            {
                warn!(
                    transaction_id = %assessed.id,
                    sender_id = %assessed.sender.id,
                    "failed to update activity baseline: {}",
                    err
                );
            }
            (assessed, assessment, alerts)
        };

        let allowed = assessment.allowed(&settings.thresholds);
        let travel_rule = if assessment.flags.contains(&RiskFlag::TravelRuleRequired) {
            Some(self.travel_rule.record_for_transaction(&assessed).await?)
        } else {
            None
        };

        self.metrics.record_monitor(allowed, alerts.len());
        info!(
            transaction_id = %assessed.id,
            sender_id = %assessed.sender.id,
            risk_score = assessment.risk_score,
            allowed,
            alerts = alerts.len(),
            "transaction monitored"
        );
        self.audit
            .record(AuditEntry::new(
                AuditAction::TransactionMonitored,
                assessed.sender.id.clone(),
                ActorType::System,
                "TRANSACTION",
                assessed.id.clone(),
                json!({
                    "risk_score": assessment.risk_score,
                    "flags": assessment.flags,
                    "alert_count": alerts.len(),
                    "allowed": allowed,
                }),
            ))
            .await;

        Ok(MonitorOutcome {
            transaction_id: assessed.id,
            allowed,
            risk_score: assessment.risk_score,
            flags: assessment.flags,
            alerts,
            travel_rule,
        })
    }
}
