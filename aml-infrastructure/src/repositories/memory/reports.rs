use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use aml_domain::ports::ReportRepository;
use aml_domain::{ReportStatus, SuspiciousTransactionReport};

#[derive(Default)]
pub struct InMemoryReportRepository {
    reports: RwLock<HashMap<String, SuspiciousTransactionReport>>,
    sequence: AtomicU64,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn next_sequence(&self) -> anyhow::Result<u64> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn insert(&self, report: &SuspiciousTransactionReport) -> anyhow::Result<()> {
        let mut reports = self.reports.write().await;
        if reports.contains_key(&report.id) {
            anyhow::bail!("report '{}' already stored", report.id);
        }
        reports.insert(report.id.clone(), report.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<SuspiciousTransactionReport>> {
        Ok(self.reports.read().await.get(id).cloned())
    }

    async fn replace(
        &self,
        report: &SuspiciousTransactionReport,
        expected: ReportStatus,
    ) -> anyhow::Result<bool> {
        let mut reports = self.reports.write().await;
        match reports.get_mut(&report.id) {
            Some(current) if current.status == expected => {
                *current = report.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list(&self) -> anyhow::Result<Vec<SuspiciousTransactionReport>> {
        Ok(self.reports.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequence_is_monotonic() {
        let repo = InMemoryReportRepository::new();
        assert_eq!(repo.next_sequence().await.expect("seq"), 1);
        assert_eq!(repo.next_sequence().await.expect("seq"), 2);
    }
}
