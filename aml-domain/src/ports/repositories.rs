use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    AlertStatus,
    AmlAlert,
    CustomerRiskProfile,
    MerchantProfile,
    MonitoredTransaction,
    Policy,
    ProfileUpdate,
    ReportStatus,
    SuspiciousTransactionReport,
    TravelRuleRecord,
};
use crate::value_objects::SubjectType;

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn append(&self, transaction: &MonitoredTransaction) -> anyhow::Result<()>;
    async fn exists(&self, id: &str) -> anyhow::Result<bool>;
    async fn fetch_by_ids(&self, ids: &[String]) -> anyhow::Result<Vec<MonitoredTransaction>>;
    /// Sender history with `timestamp >= since`, ordered by timestamp.
    async fn fetch_sender_since(
        &self,
        sender_id: &str,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<MonitoredTransaction>>;
}

#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn insert(&self, alert: &AmlAlert) -> anyhow::Result<()>;
    async fn get(&self, id: &str) -> anyhow::Result<Option<AmlAlert>>;
    /// Replaces the stored alert only if its version still equals `expected_version`.
    async fn replace(&self, alert: &AmlAlert, expected_version: u64) -> anyhow::Result<bool>;
    async fn list_by_status(&self, statuses: &[AlertStatus]) -> anyhow::Result<Vec<AmlAlert>>;
    async fn list_by_subject(&self, subject_id: &str) -> anyhow::Result<Vec<AmlAlert>>;
}

#[async_trait]
pub trait RiskProfileRepository: Send + Sync {
    async fn get(&self, subject_id: &str) -> anyhow::Result<Option<CustomerRiskProfile>>;
    /// Stores the profile unless one exists; returns whichever is stored.
    async fn insert_if_absent(&self, profile: CustomerRiskProfile) -> anyhow::Result<CustomerRiskProfile>;
    /// Atomic per subject; creates the profile lazily.
    async fn apply(
        &self,
        subject_id: &str,
        subject_type: SubjectType,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> anyhow::Result<CustomerRiskProfile>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn next_sequence(&self) -> anyhow::Result<u64>;
    async fn insert(&self, report: &SuspiciousTransactionReport) -> anyhow::Result<()>;
    async fn get(&self, id: &str) -> anyhow::Result<Option<SuspiciousTransactionReport>>;
    /// Replaces the stored report only if its status still equals `expected`.
    async fn replace(
        &self,
        report: &SuspiciousTransactionReport,
        expected: ReportStatus,
    ) -> anyhow::Result<bool>;
    async fn list(&self) -> anyhow::Result<Vec<SuspiciousTransactionReport>>;
}

#[async_trait]
pub trait TravelRuleRepository: Send + Sync {
    async fn insert(&self, record: &TravelRuleRecord) -> anyhow::Result<()>;
    async fn find_by_transaction(&self, transaction_id: &str) -> anyhow::Result<Option<TravelRuleRecord>>;
}

#[async_trait]
pub trait PolicyRepository: Send + Sync {
    async fn insert(&self, policy: &Policy) -> anyhow::Result<()>;
    async fn get(&self, id: &str) -> anyhow::Result<Option<Policy>>;
    async fn replace(&self, policy: &Policy, expected_version: u64) -> anyhow::Result<bool>;
    async fn list(&self) -> anyhow::Result<Vec<Policy>>;
}

#[async_trait]
pub trait MerchantRepository: Send + Sync {
    async fn get(&self, id: &str) -> anyhow::Result<Option<MerchantProfile>>;
    async fn upsert(&self, merchant: MerchantProfile) -> anyhow::Result<()>;
}

#[async_trait]
pub trait UsageRepository: Send + Sync {
    async fn record(&self, user_id: &str, amount: i64, at: DateTime<Utc>) -> anyhow::Result<()>;
    async fn total_since(&self, user_id: &str, since: DateTime<Utc>) -> anyhow::Result<i64>;
}

#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn load_sanctions_list(&self, path: &str) -> anyhow::Result<Vec<String>>;
    async fn load_merchants(&self, path: &str) -> anyhow::Result<Vec<MerchantProfile>>;
    async fn load_policies(&self, path: &str) -> anyhow::Result<Vec<Policy>>;
    async fn save_policies(&self, path: &str, policies: &[Policy]) -> anyhow::Result<()>;
}
