use std::collections::HashSet;
use std::sync::Arc;

use aml_domain::ports::{AlertRepository, AnchorService, ReportRepository, TransactionRepository};
use aml_domain::{ActorType, AuditAction, AuditEntry, ReportStatus, SuspiciousTransactionReport};
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::components::CaseManager;
use crate::dtos::GenerateStrRequest;
use crate::ops::{AuditRecorder, KeyedLocks};
use crate::{AppError, Metrics};

const STR_RECORD_TYPE: &str = "STR";

pub struct ReportGenerator {
    alerts: Arc<dyn AlertRepository>,
    transactions: Arc<dyn TransactionRepository>,
    reports: Arc<dyn ReportRepository>,
    anchor: Arc<dyn AnchorService>,
    cases: Arc<CaseManager>,
    audit: AuditRecorder,
    metrics: Arc<Metrics>,
    report_locks: KeyedLocks,
}

impl ReportGenerator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        alerts: Arc<dyn AlertRepository>,
        transactions: Arc<dyn TransactionRepository>,
        reports: Arc<dyn ReportRepository>,
        anchor: Arc<dyn AnchorService>,
        cases: Arc<CaseManager>,
        audit: AuditRecorder,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            alerts,
            transactions,
            reports,
            anchor,
            cases,
            audit,
            metrics,
            report_locks: KeyedLocks::default(),
        }
    }

    /// Drafts an STR from the given alerts. Unknown alert ids are dropped.
    pub async fn generate_str(&self, request: GenerateStrRequest) -> Result<SuspiciousTransactionReport, AppError> {
        let subject_id = request.subject_id.trim();
        if subject_id.is_empty() {
            return Err(AppError::BadRequest("subject_id is required".to_string()));
        }
        if request.created_by.trim().is_empty() {
            return Err(AppError::BadRequest("created_by is required".to_string()));
        }

        let mut alert_ids = Vec::new();
        let mut transaction_ids = Vec::new();
        let mut evidence = Vec::new();
        let mut seen_alerts = HashSet::new();
        let mut seen_transactions = HashSet::new();
        for alert_id in &request.alert_ids {
            if !seen_alerts.insert(alert_id.as_str()) {
                continue;
            }
            let Some(alert) = self.alerts.get(alert_id).await? else {
                continue;
            };
            for tx_id in &alert.related_transactions {
                if seen_transactions.insert(tx_id.clone()) {
                    transaction_ids.push(tx_id.clone());
                }
            }
            for item in alert.evidence {
                if !evidence.contains(&item) {
                    evidence.push(item);
                }
            }
            alert_ids.push(alert.id);
        }

        let total_amount = self
            .transactions
            .fetch_by_ids(&transaction_ids)
            .await?
            .iter()
            .fold(0i64, |acc, tx| acc.saturating_add(tx.amount));

        let created_at = Utc::now();
        let sequence = self.reports.next_sequence().await?;
        let report = SuspiciousTransactionReport {
            id: format!("STR-{}", Uuid::new_v4().simple()),
            report_number: SuspiciousTransactionReport::report_number(created_at, sequence),
            subject_id: subject_id.to_string(),
            subject_type: request.subject_type,
            alert_ids,
            transaction_ids,
            total_amount,
            suspicion_type: request.suspicion_type,
            description: request.description,
            evidence,
            status: ReportStatus::Draft,
            created_by: request.created_by,
            created_at,
            submitted_at: None,
            submitted_by: None,
            anchor_hash: None,
            acknowledged_at: None,
            fiu_reference: None,
        };
        self.reports.insert(&report).await?;
        info!(
            report_id = %report.id,
            report_number = %report.report_number,
            alerts = report.alert_ids.len(),
            total_amount = report.total_amount,
            "STR drafted"
        );
        self.audit
            .record(AuditEntry::new(
                AuditAction::StrCreated,
                report.created_by.clone(),
                ActorType::Admin,
                "STR",
                report.id.clone(),
                json!({
                    "report_number": report.report_number,
                    "subject_id": report.subject_id,
                    "alert_ids": report.alert_ids,
                    "total_amount": report.total_amount,
                }),
            ))
            .await;
        Ok(report)
    }

    /// Anchors and submits a DRAFT report. `false` when missing or not DRAFT.
    ///
    /// An anchoring failure is returned as an error and the report stays DRAFT.
    pub async fn submit_str(&self, report_id: &str, submitted_by: &str) -> Result<bool, AppError> {
        let _guard = self.report_locks.lock(report_id).await;
        let Some(report) = self.reports.get(report_id).await? else {
            return Ok(false);
        };
        if report.status != ReportStatus::Draft {
            return Ok(false);
        }

        let receipt = self
            .anchor
            .anchor(&report.id, STR_RECORD_TYPE, &report.anchor_payload())
            .await
            .map_err(|err| {
                warn!(report_id = %report.id, "anchoring failed, report stays DRAFT: {}", err);
                AppError::Internal(err)
            })?;

        let Some(submitted) = report.submitted(receipt.hash, submitted_by, Utc::now()) else {
            return Ok(false);
        };
        if !self.reports.replace(&submitted, ReportStatus::Draft).await? {
            return Ok(false);
        }

        for alert_id in &submitted.alert_ids {
            if !self.cases.mark_reported(alert_id, submitted_by).await? {
                warn!(report_id = %submitted.id, alert_id = %alert_id, "alert not marked REPORTED");
            }
        }

        self.metrics.record_report_submitted();
        info!(
            report_id = %submitted.id,
            report_number = %submitted.report_number,
            "STR submitted"
        );
        self.audit
            .record(AuditEntry::new(
                AuditAction::StrSubmitted,
                submitted_by,
                ActorType::Admin,
                "STR",
                submitted.id.clone(),
                json!({
                    "report_number": submitted.report_number,
                    "anchor_hash": submitted.anchor_hash,
                    "alert_ids": submitted.alert_ids,
                }),
            ))
            .await;
        Ok(true)
    }

    /// SUBMITTED to ACKNOWLEDGED. `false` when missing or in any other status.
    pub async fn acknowledge_str(
        &self,
        report_id: &str,
        fiu_reference: Option<String>,
        actor_id: &str,
    ) -> Result<bool, AppError> {
        let _guard = self.report_locks.lock(report_id).await;
        let Some(report) = self.reports.get(report_id).await? else {
            return Ok(false);
        };
        let Some(acknowledged) = report.acknowledged(fiu_reference, Utc::now()) else {
            return Ok(false);
        };
        if !self.reports.replace(&acknowledged, ReportStatus::Submitted).await? {
            return Ok(false);
        }
        info!(report_id = %acknowledged.id, "STR acknowledged");
        self.audit
            .record(AuditEntry::new(
                AuditAction::StrAcknowledged,
                actor_id,
                ActorType::Admin,
                "STR",
                acknowledged.id.clone(),
                json!({
                    "report_number": acknowledged.report_number,
                    "fiu_reference": acknowledged.fiu_reference,
                }),
            ))
            .await;
        Ok(true)
    }

    pub async fn get_report(&self, report_id: &str) -> Result<Option<SuspiciousTransactionReport>, AppError> {
        Ok(self.reports.get(report_id).await?)
    }

    pub async fn list_reports(&self) -> Result<Vec<SuspiciousTransactionReport>, AppError> {
        let mut reports = self.reports.list().await?;
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.report_number.cmp(&a.report_number)));
        Ok(reports)
    }
}
