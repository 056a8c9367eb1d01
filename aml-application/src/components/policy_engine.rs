use std::sync::Arc;

use aml_domain::ports::{ConfigRepository, MerchantRepository, PolicyRepository, UsageRepository};
use aml_domain::services::{evaluate_policies, PolicyRequest};
use aml_domain::{
    local_day_start, local_month_start, ActorType, AuditAction, AuditEntry, MerchantProfile, Policy,
    PolicyDecision, PolicyStatus, MAX_TRANSACTION_AMOUNT,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::json;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::dtos::{ChangePolicyStatusRequest, CreatePolicyRequest, UpdatePolicyRequest, ValidateTransactionRequest};
use crate::ops::{AuditRecorder, KeyedLocks};
use crate::{AppError, Metrics};

#[derive(Debug, Clone)]
pub struct PolicyStoreConfig {
    /// YAML file mirroring the policy set after every admin change.
    pub policies_path: Option<String>,
    pub utc_offset: FixedOffset,
}

pub struct PolicyEngine {
    settings: PolicyStoreConfig,
    policies: Arc<dyn PolicyRepository>,
    merchants: Arc<dyn MerchantRepository>,
    usage: Arc<dyn UsageRepository>,
    config_repo: Arc<dyn ConfigRepository>,
    audit: AuditRecorder,
    metrics: Arc<Metrics>,
    write_lock: Mutex<()>,
    usage_locks: KeyedLocks,
}

impl PolicyEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: PolicyStoreConfig,
        policies: Arc<dyn PolicyRepository>,
        merchants: Arc<dyn MerchantRepository>,
        usage: Arc<dyn UsageRepository>,
        config_repo: Arc<dyn ConfigRepository>,
        audit: AuditRecorder,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            settings,
            policies,
            merchants,
            usage,
            config_repo,
            audit,
            metrics,
            write_lock: Mutex::new(()),
            usage_locks: KeyedLocks::default(),
        }
    }

    pub async fn validate_transaction(
        &self,
        request: &ValidateTransactionRequest,
    ) -> Result<PolicyDecision, AppError> {
        let user_id = request.user_id.trim();
        if user_id.is_empty() {
            return Err(AppError::BadRequest("user_id is required".to_string()));
        }
        if request.amount <= 0 || request.amount > MAX_TRANSACTION_AMOUNT {
            return Err(AppError::BadRequest(format!(
                "amount must be between 1 and {}",
                MAX_TRANSACTION_AMOUNT
            )));
        }
        let merchant = self
            .merchants
            .get(request.merchant_id.trim())
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("unknown merchant '{}'", request.merchant_id)))?;

        let timestamp = request.timestamp.unwrap_or_else(Utc::now);
        let offset = self.settings.utc_offset;
        let daily_usage = self
            .usage
            .total_since(user_id, local_day_start(timestamp, offset))
            .await?;
        let monthly_usage = self
            .usage
            .total_since(user_id, local_month_start(timestamp, offset))
            .await?;
        let policies = self.policies.list().await?;

        let decision = evaluate_policies(
            &policies,
            &PolicyRequest {
                user_id,
                merchant: &merchant,
                amount: request.amount,
                timestamp,
                utc_offset: offset,
                user_credentials: &request.user_credentials,
                daily_usage,
                monthly_usage,
            },
        );
        self.metrics.record_policy_evaluation(decision.violations.len());
        info!(
            user_id,
            merchant_id = %merchant.id,
            allowed = decision.allowed,
            violations = decision.violations.len(),
            "policy evaluation finished"
        );
        Ok(decision)
    }

    /// Serializes usage checks and writes for one user. Hold it from the cap
    /// check until the charge is recorded.
    pub async fn lock_usage(&self, user_id: &str) -> OwnedMutexGuard<()> {
        self.usage_locks.lock(user_id.trim()).await
    }

    pub async fn record_usage(&self, user_id: &str, amount: i64, at: DateTime<Utc>) -> Result<(), AppError> {
        Ok(self.usage.record(user_id, amount, at).await?)
    }

    pub async fn upsert_merchant(&self, merchant: MerchantProfile) -> Result<(), AppError> {
        if merchant.id.trim().is_empty() || merchant.municipality_id.trim().is_empty() {
            return Err(AppError::BadRequest(
                "merchant id and municipality_id are required".to_string(),
            ));
        }
        Ok(self.merchants.upsert(merchant).await?)
    }

    /// Loads policies from a seed file at startup. Invalid entries are skipped.
    pub async fn seed_policies(&self, policies: Vec<Policy>) -> Result<usize, AppError> {
        let mut loaded = 0;
        for policy in policies {
            if let Err(err) = policy.validate() {
                warn!(policy_id = %policy.id, "skipping invalid seed policy: {}", err);
                continue;
            }
            self.policies.insert(&policy).await?;
            loaded += 1;
        }
        Ok(loaded)
    }

    pub async fn create_policy(&self, request: CreatePolicyRequest) -> Result<Policy, AppError> {
        let now = Utc::now();
        let policy = Policy {
            id: format!("POL-{}", Uuid::new_v4().simple()),
            name: request.name.trim().to_string(),
            municipality_id: request.municipality_id.trim().to_string(),
            status: PolicyStatus::Draft,
            rules: request.rules,
            expires_at: request.expires_at,
            created_by: request.actor_id.clone(),
            created_at: now,
            updated_at: now,
            version: 1,
        };
        policy.validate()?;

        let _guard = self.write_lock.lock().await;
        self.policies.insert(&policy).await?;
        self.persist().await;
        info!(policy_id = %policy.id, municipality_id = %policy.municipality_id, "policy created");
        self.audit_change(AuditAction::PolicyCreated, &request.actor_id, None, &policy)
            .await;
        Ok(policy)
    }

    pub async fn update_policy(&self, policy_id: &str, request: UpdatePolicyRequest) -> Result<Policy, AppError> {
        let _guard = self.write_lock.lock().await;
        let before = self
            .policies
            .get(policy_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("policy '{}'", policy_id)))?;
        if before.status == PolicyStatus::Expired {
            return Err(AppError::BadRequest(format!("policy '{}' has expired", policy_id)));
        }

        let mut after = before.clone();
        if let Some(name) = request.name {
            after.name = name.trim().to_string();
        }
        if let Some(rules) = request.rules {
            after.rules = rules;
        }
        if request.clear_expiry {
            after.expires_at = None;
        } else if request.expires_at.is_some() {
            after.expires_at = request.expires_at;
        }
        after.updated_at = Utc::now();
        after.version = before.version + 1;
        after.validate()?;

        self.replace(&after, before.version).await?;
        info!(policy_id = %after.id, version = after.version, "policy updated");
        self.audit_change(AuditAction::PolicyUpdated, &request.actor_id, Some(&before), &after)
            .await;
        Ok(after)
    }

    pub async fn change_status(
        &self,
        policy_id: &str,
        request: ChangePolicyStatusRequest,
    ) -> Result<Policy, AppError> {
        let _guard = self.write_lock.lock().await;
        let before = self
            .policies
            .get(policy_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("policy '{}'", policy_id)))?;
        let after = before.with_status(request.status, Utc::now()).ok_or_else(|| {
            AppError::BadRequest(format!(
                "policy '{}' cannot move from {} to {}",
                policy_id,
                before.status.as_str(),
                request.status.as_str()
            ))
        })?;

        self.replace(&after, before.version).await?;
        info!(
            policy_id = %after.id,
            from = before.status.as_str(),
            to = after.status.as_str(),
            "policy status changed"
        );
        self.audit_change(AuditAction::PolicyStatusChanged, &request.actor_id, Some(&before), &after)
            .await;
        Ok(after)
    }

    pub async fn get_policy(&self, policy_id: &str) -> Result<Option<Policy>, AppError> {
        Ok(self.policies.get(policy_id).await?)
    }

    pub async fn list_policies(&self) -> Result<Vec<Policy>, AppError> {
        let mut policies = self.policies.list().await?;
        policies.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(policies)
    }

    async fn replace(&self, after: &Policy, expected_version: u64) -> Result<(), AppError> {
        if !self.policies.replace(after, expected_version).await? {
            return Err(AppError::BadRequest(format!(
                "policy '{}' was modified concurrently",
                after.id
            )));
        }
        self.persist().await;
        Ok(())
    }

    async fn persist(&self) {
        let Some(path) = self.settings.policies_path.as_deref() else {
            return;
        };
        let policies = match self.list_policies().await {
            Ok(policies) => policies,
            Err(err) => {
                warn!("failed to list policies for persistence: {}", err);
                return;
            }
        };
        if let Err(err) = self.config_repo.save_policies(path, &policies).await {
            warn!(path, "failed to persist policies: {}", err);
        }
    }

    async fn audit_change(&self, action: AuditAction, actor_id: &str, before: Option<&Policy>, after: &Policy) {
        self.audit
            .record(AuditEntry::new(
                action,
                actor_id,
                ActorType::Admin,
                "POLICY",
                after.id.clone(),
                json!({
                    "before": before,
                    "after": after,
                }),
            ))
            .await;
    }
}
