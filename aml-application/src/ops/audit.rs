use std::sync::Arc;

use aml_domain::ports::AuditLog;
use aml_domain::AuditEntry;
use tracing::warn;

use crate::Metrics;

/// Writes audit entries without letting a sink failure reach the caller.
#[derive(Clone)]
pub struct AuditRecorder {
    sink: Arc<dyn AuditLog>,
    metrics: Arc<Metrics>,
}

impl AuditRecorder {
    pub fn new(sink: Arc<dyn AuditLog>, metrics: Arc<Metrics>) -> Self {
        Self { sink, metrics }
    }

    pub async fn record(&self, entry: AuditEntry) {
        if let Err(err) = self.sink.log(&entry).await {
            self.metrics.record_audit_failure();
            warn!(
                action = entry.action.as_str(),
                target_id = %entry.target_id,
                "failed to write audit entry: {}",
                err
            );
        }
    }
}
