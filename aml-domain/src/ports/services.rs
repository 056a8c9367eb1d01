use async_trait::async_trait;

use crate::entities::{AnchorReceipt, AuditEntry};

/// Structured audit sink. Failures never roll back the decision being logged.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn log(&self, entry: &AuditEntry) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AnchorService: Send + Sync {
    async fn anchor(
        &self,
        record_id: &str,
        record_type: &str,
        payload: &serde_json::Value,
    ) -> anyhow::Result<AnchorReceipt>;
}

pub trait SanctionsList: Send + Sync {
    fn is_sanctioned(&self, identity_id: &str) -> bool;
}
