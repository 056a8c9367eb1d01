use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::bail;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use aml_application::commands::{case_commands, payment_commands, policy_commands, report_commands};
use aml_application::dtos::{
    AuthorizePaymentRequest, ChangePolicyStatusRequest, CreatePolicyRequest, GenerateStrRequest,
    ResolveAlertRequest, SubmitStrRequest,
};
use aml_application::queries::{case_queries, report_queries};
use aml_application::{AppError, AppState, Collaborators, Repositories};
use aml_bootstrap::in_memory_repositories;
use aml_domain::ports::{AlertRepository, AnchorService, AuditLog};
use aml_domain::{
    AlertStatus, AlertType, AmlAlert, AnchorReceipt, AuditEntry, MerchantProfile, MonitoredTransaction, Party,
    PolicyRule, PolicyStatus, ReportStatus, ResolutionDecision, RuleCondition, RuntimeConfig, SubjectType,
    TransactionKind,
};
use aml_infrastructure::{
    ConfigFileRepository, DigestAnchorService, InMemoryAlertRepository, StaticSanctionsList, TracingAuditLog,
};

/// Audit sink that takes a while, widening any check-then-write window.
struct SlowAuditLog;

#[async_trait]
impl AuditLog for SlowAuditLog {
    async fn log(&self, _entry: &AuditEntry) -> anyhow::Result<()> {
        tokio::time::sleep(StdDuration::from_millis(5)).await;
        Ok(())
    }
}

struct FailingAuditLog;

#[async_trait]
impl AuditLog for FailingAuditLog {
    async fn log(&self, _entry: &AuditEntry) -> anyhow::Result<()> {
        bail!("audit sink unavailable")
    }
}

struct FailingAnchor;

#[async_trait]
impl AnchorService for FailingAnchor {
    async fn anchor(
        &self,
        _record_id: &str,
        _record_type: &str,
        _payload: &serde_json::Value,
    ) -> anyhow::Result<AnchorReceipt> {
        bail!("anchor endpoint unreachable")
    }
}

/// Alert store whose next insert fails once.
struct FlakyAlertRepository {
    inner: InMemoryAlertRepository,
    fail_next_insert: AtomicBool,
}

#[async_trait]
impl AlertRepository for FlakyAlertRepository {
    async fn insert(&self, alert: &AmlAlert) -> anyhow::Result<()> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            bail!("alert store write timed out");
        }
        self.inner.insert(alert).await
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<AmlAlert>> {
        self.inner.get(id).await
    }

    async fn replace(&self, alert: &AmlAlert, expected_version: u64) -> anyhow::Result<bool> {
        self.inner.replace(alert, expected_version).await
    }

    async fn list_by_status(&self, statuses: &[AlertStatus]) -> anyhow::Result<Vec<AmlAlert>> {
        self.inner.list_by_status(statuses).await
    }

    async fn list_by_subject(&self, subject_id: &str) -> anyhow::Result<Vec<AmlAlert>> {
        self.inner.list_by_subject(subject_id).await
    }
}

fn repositories() -> Repositories {
    in_memory_repositories(Arc::new(ConfigFileRepository::new()))
}

fn collaborators(sanctioned: &[&str]) -> Collaborators {
    Collaborators {
        audit_log: Arc::new(TracingAuditLog::new()),
        anchor: Arc::new(DigestAnchorService::new()),
        sanctions: Arc::new(StaticSanctionsList::new(sanctioned.iter().copied())),
    }
}

fn assemble(repos: Repositories, collaborators: Collaborators) -> AppState {
    AppState::assemble(RuntimeConfig::default(), repos, collaborators)
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 1, 3, 0, 0).unwrap()
}

fn transaction(id: &str, sender: &str, amount: i64, at: DateTime<Utc>) -> MonitoredTransaction {
    MonitoredTransaction {
        id: id.to_string(),
        timestamp: at,
        sender: Party::new(sender, SubjectType::Individual),
        recipient: Party::new("M1", SubjectType::Merchant),
        amount,
        kind: TransactionKind::Payment,
        channel: "APP".to_string(),
        location: None,
        device: None,
        beneficiary_vasp: None,
        risk_score: None,
        flags: BTreeSet::new(),
    }
}

async fn structuring_alert(state: &AppState, sender: &str) -> String {
    let mut alert_id = None;
    for n in 0..5 {
        let tx = transaction(&format!("{}-tx-{}", sender, n), sender, 7_500_000, base_time() + Duration::hours(n));
        let outcome = payment_commands::monitor_transaction(state, tx).await.unwrap();
        alert_id = outcome
            .alerts
            .iter()
            .find(|alert| alert.alert_type == AlertType::Structuring)
            .map(|alert| alert.id.clone())
            .or(alert_id);
    }
    alert_id.expect("structuring alert")
}

async fn draft_report(state: &AppState, alert_id: &str) -> String {
    report_commands::generate_str(
        state,
        GenerateStrRequest {
            subject_id: "S1".to_string(),
            subject_type: SubjectType::Individual,
            alert_ids: vec![alert_id.to_string()],
            suspicion_type: "STRUCTURING".to_string(),
            description: "repeated transfers under the CTR line".to_string(),
            created_by: "officer-1".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_payments_cannot_exceed_daily_cap() {
    let state = assemble(
        repositories(),
        Collaborators {
            audit_log: Arc::new(SlowAuditLog),
            ..collaborators(&[])
        },
    );
    state
        .policy_engine
        .upsert_merchant(MerchantProfile {
            id: "M1".to_string(),
            name: "Corner Market".to_string(),
            municipality_id: "MUNI-1".to_string(),
            region: "Seongbuk".to_string(),
            categories: vec!["GROCERY".to_string()],
        })
        .await
        .unwrap();
    let policy = policy_commands::create_policy(
        &state,
        CreatePolicyRequest {
            name: "Daily cap".to_string(),
            municipality_id: "MUNI-1".to_string(),
            rules: vec![PolicyRule {
                id: "daily-cap".to_string(),
                condition: RuleCondition::UsageLimitDaily { max_amount: 500_000 },
                enabled: true,
                priority: 1,
            }],
            expires_at: None,
            actor_id: "officer-1".to_string(),
        },
    )
    .await
    .unwrap();
    policy_commands::change_policy_status(
        &state,
        &policy.id,
        ChangePolicyStatusRequest {
            status: PolicyStatus::Active,
            actor_id: "officer-1".to_string(),
        },
    )
    .await
    .unwrap();

    let handles = (0..2)
        .map(|n| {
            let state = state.clone();
            tokio::spawn(async move {
                payment_commands::authorize_payment(
                    &state,
                    AuthorizePaymentRequest {
                        transaction: transaction(&format!("pay-{}", n), "U1", 300_000, base_time()),
                        user_credentials: Vec::new(),
                    },
                )
                .await
                .unwrap()
            })
        })
        .collect::<Vec<_>>();

    let mut charged = 0;
    let mut allowed = 0;
    for handle in handles {
        let outcome = handle.await.unwrap();
        if outcome.allowed {
            allowed += 1;
            charged += outcome.charged_amount;
        }
    }
    assert_eq!(allowed, 1);
    assert!(charged <= 500_000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_monitor_calls_for_one_sender_see_each_other() {
    let state = assemble(repositories(), collaborators(&[]));
    let at = base_time();

    let handles = (0..10)
        .map(|n| {
            let state = state.clone();
            tokio::spawn(async move {
                payment_commands::monitor_transaction(&state, transaction(&format!("burst-{}", n), "S1", 1_000, at))
                    .await
                    .unwrap()
            })
        })
        .collect::<Vec<_>>();

    let mut velocity_alerts = Vec::new();
    for handle in handles {
        let outcome = handle.await.unwrap();
        velocity_alerts.extend(
            outcome
                .alerts
                .into_iter()
                .filter(|alert| alert.alert_type == AlertType::VelocityAnomaly),
        );
    }
    assert_eq!(velocity_alerts.len(), 1);
    assert_eq!(velocity_alerts[0].related_transactions.len(), 10);
    assert_eq!(state.metrics.monitored_transactions(), 10);
}

#[tokio::test]
async fn audit_sink_failure_does_not_change_decisions() {
    let state = assemble(
        repositories(),
        Collaborators {
            audit_log: Arc::new(FailingAuditLog),
            ..collaborators(&["BAD-1"])
        },
    );

    let ctr = payment_commands::monitor_transaction(&state, transaction("tx-ctr", "S1", 10_000_000, base_time()))
        .await
        .unwrap();
    assert!(ctr.allowed);
    assert_eq!(ctr.risk_score, 30);

    let blocked = payment_commands::monitor_transaction(&state, transaction("tx-bad", "BAD-1", 1_000, base_time()))
        .await
        .unwrap();
    assert!(!blocked.allowed);
    assert_eq!(blocked.alerts.len(), 1);
    assert_eq!(blocked.alerts[0].alert_type, AlertType::SanctionsHit);

    assert_eq!(state.metrics.monitored_transactions(), 2);
    assert!(state.metrics.audit_failures() >= 2);
}

#[tokio::test]
async fn anchor_failure_keeps_report_draft() {
    let state = assemble(
        repositories(),
        Collaborators {
            anchor: Arc::new(FailingAnchor),
            ..collaborators(&[])
        },
    );
    let alert_id = structuring_alert(&state, "S1").await;
    let report_id = draft_report(&state, &alert_id).await;

    let err = report_commands::submit_str(
        &state,
        &report_id,
        SubmitStrRequest {
            submitted_by: "officer-1".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));

    let report = report_queries::get_report(&state, &report_id).await.unwrap();
    assert_eq!(report.status, ReportStatus::Draft);
    assert!(report.anchor_hash.is_none());
    assert!(report.submitted_at.is_none());
    let alert = case_queries::get_alert(&state, &alert_id).await.unwrap();
    assert_eq!(alert.status, AlertStatus::Open);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn resolution_racing_report_submission_is_never_lost() {
    let state = assemble(repositories(), collaborators(&[]));
    let alert_id = structuring_alert(&state, "S1").await;
    let report_id = draft_report(&state, &alert_id).await;

    let resolver = {
        let state = state.clone();
        let alert_id = alert_id.clone();
        tokio::spawn(async move {
            case_commands::resolve_alert(
                &state,
                &alert_id,
                ResolveAlertRequest {
                    decision: ResolutionDecision::Suspicious,
                    notes: "confirmed with branch".to_string(),
                    resolved_by: "officer-2".to_string(),
                },
            )
            .await
            .unwrap()
        })
    };
    let submitter = {
        let state = state.clone();
        let report_id = report_id.clone();
        tokio::spawn(async move {
            report_commands::submit_str(
                &state,
                &report_id,
                SubmitStrRequest {
                    submitted_by: "officer-1".to_string(),
                },
            )
            .await
            .unwrap()
        })
    };

    assert!(resolver.await.unwrap().applied);
    assert!(submitter.await.unwrap().applied);

    let alert = case_queries::get_alert(&state, &alert_id).await.unwrap();
    assert_eq!(alert.status, AlertStatus::Closed);
    assert_eq!(
        alert.resolution.as_ref().map(|resolution| resolution.decision),
        Some(ResolutionDecision::Suspicious)
    );
    // Closed directly (2) or via REPORTED first (3); never a lost update.
    assert!(alert.version == 2 || alert.version == 3);
    let report = report_queries::get_report(&state, &report_id).await.unwrap();
    assert_eq!(report.status, ReportStatus::Submitted);
}

#[tokio::test]
async fn failed_alert_write_can_be_retried_with_same_transaction_id() {
    let alerts = Arc::new(FlakyAlertRepository {
        inner: InMemoryAlertRepository::new(),
        fail_next_insert: AtomicBool::new(true),
    });
    let state = assemble(
        Repositories {
            alerts: alerts.clone(),
            ..repositories()
        },
        collaborators(&["BAD-1"]),
    );
    let tx = transaction("tx-retry", "BAD-1", 1_000, base_time());

    let err = payment_commands::monitor_transaction(&state, tx.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));

    let outcome = payment_commands::monitor_transaction(&state, tx).await.unwrap();
    assert!(!outcome.allowed);
    assert_eq!(outcome.alerts.len(), 1);
    assert_eq!(
        alerts.list_by_subject("BAD-1").await.unwrap().len(),
        1,
        "only the retried alert is stored"
    );
}
