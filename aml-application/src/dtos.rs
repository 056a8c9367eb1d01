// Request and response shapes shared by commands, queries and the HTTP layer

use std::collections::{BTreeMap, BTreeSet};

use aml_domain::{
    AlertSeverity, AlertStatus, AlertType, AmlAlert, KycStatus, MonitoredTransaction, PolicyDecision,
    PolicyRule, PolicyStatus, ResolutionDecision, RiskFlag, SubjectType, TravelRuleParty,
    TravelRuleRecord,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one monitoring call, including full alerts for operators.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorOutcome {
    pub transaction_id: String,
    pub allowed: bool,
    pub risk_score: u32,
    pub flags: BTreeSet<RiskFlag>,
    pub alerts: Vec<AmlAlert>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_rule: Option<TravelRuleRecord>,
}

/// Alert reference safe to return to the initiating user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertNotice {
    pub id: String,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorView {
    pub transaction_id: String,
    pub allowed: bool,
    pub risk_score: u32,
    pub flags: BTreeSet<RiskFlag>,
    pub alerts: Vec<AlertNotice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_rule_id: Option<String>,
}

impl From<&MonitorOutcome> for MonitorView {
    fn from(outcome: &MonitorOutcome) -> Self {
        Self {
            transaction_id: outcome.transaction_id.clone(),
            allowed: outcome.allowed,
            risk_score: outcome.risk_score,
            flags: outcome.flags.clone(),
            alerts: outcome
                .alerts
                .iter()
                .map(|alert| AlertNotice {
                    id: alert.id.clone(),
                    alert_type: alert.alert_type,
                    severity: alert.severity,
                })
                .collect(),
            travel_rule_id: outcome.travel_rule.as_ref().map(|record| record.id.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizePaymentRequest {
    pub transaction: MonitoredTransaction,
    #[serde(default)]
    pub user_credentials: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationOutcome {
    pub allowed: bool,
    pub monitor: MonitorOutcome,
    pub policy: PolicyDecision,
    /// Amount the user is charged after policy discounts.
    pub charged_amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationView {
    pub allowed: bool,
    pub monitor: MonitorView,
    pub policy: PolicyDecision,
    pub charged_amount: i64,
}

impl From<&AuthorizationOutcome> for AuthorizationView {
    fn from(outcome: &AuthorizationOutcome) -> Self {
        Self {
            allowed: outcome.allowed,
            monitor: MonitorView::from(&outcome.monitor),
            policy: outcome.policy.clone(),
            charged_amount: outcome.charged_amount,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateTransactionRequest {
    pub user_id: String,
    pub merchant_id: String,
    pub amount: i64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_credentials: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveAlertRequest {
    pub decision: ResolutionDecision,
    #[serde(default)]
    pub notes: String,
    pub resolved_by: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertTransitionRequest {
    pub actor_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionResult {
    pub applied: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnboardProfileRequest {
    pub subject_id: String,
    pub subject_type: SubjectType,
    #[serde(default)]
    pub kyc_status: KycStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateStrRequest {
    pub subject_id: String,
    pub subject_type: SubjectType,
    pub alert_ids: Vec<String>,
    pub suspicion_type: String,
    pub description: String,
    pub created_by: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitStrRequest {
    pub submitted_by: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AcknowledgeStrRequest {
    #[serde(default)]
    pub fiu_reference: Option<String>,
    pub actor_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordTravelRuleRequest {
    pub transaction_id: String,
    pub amount: i64,
    pub originator: TravelRuleParty,
    pub beneficiary: TravelRuleParty,
    pub originator_vasp: String,
    #[serde(default)]
    pub beneficiary_vasp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePolicyRequest {
    pub name: String,
    pub municipality_id: String,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub actor_id: String,
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePolicyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rules: Option<Vec<PolicyRule>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clear_expiry: bool,
    pub actor_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePolicyStatusRequest {
    pub status: PolicyStatus,
    pub actor_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceSnapshot {
    pub generated_at: DateTime<Utc>,
    pub open_alerts: usize,
    pub open_by_severity: BTreeMap<String, usize>,
    pub open_by_status: BTreeMap<String, usize>,
    pub reports_by_status: BTreeMap<String, usize>,
    pub oldest_open_alert_at: Option<DateTime<Utc>>,
    pub monitored_transactions: u64,
    pub blocked_transactions: u64,
}

pub fn open_statuses() -> [AlertStatus; 2] {
    [AlertStatus::Open, AlertStatus::UnderReview]
}
