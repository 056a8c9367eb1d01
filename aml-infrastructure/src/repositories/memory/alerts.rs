use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use aml_domain::ports::AlertRepository;
use aml_domain::{AlertStatus, AmlAlert};

#[derive(Default)]
pub struct InMemoryAlertRepository {
    alerts: RwLock<HashMap<String, AmlAlert>>,
}

impl InMemoryAlertRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertRepository for InMemoryAlertRepository {
    async fn insert(&self, alert: &AmlAlert) -> anyhow::Result<()> {
        let mut alerts = self.alerts.write().await;
        if alerts.contains_key(&alert.id) {
            anyhow::bail!("alert '{}' already stored", alert.id);
        }
        alerts.insert(alert.id.clone(), alert.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<AmlAlert>> {
        Ok(self.alerts.read().await.get(id).cloned())
    }

    async fn replace(&self, alert: &AmlAlert, expected_version: u64) -> anyhow::Result<bool> {
        let mut alerts = self.alerts.write().await;
        match alerts.get_mut(&alert.id) {
            Some(current) if current.version == expected_version => {
                *current = alert.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_by_status(&self, statuses: &[AlertStatus]) -> anyhow::Result<Vec<AmlAlert>> {
        Ok(self
            .alerts
            .read()
            .await
            .values()
            .filter(|alert| statuses.contains(&alert.status))
            .cloned()
            .collect())
    }

    async fn list_by_subject(&self, subject_id: &str) -> anyhow::Result<Vec<AmlAlert>> {
        Ok(self
            .alerts
            .read()
            .await
            .values()
            .filter(|alert| alert.subject_id == subject_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aml_domain::{AlertDraft, AlertSeverity, AlertType, Party, SubjectType};
    use chrono::Utc;

    fn alert() -> AmlAlert {
        AmlAlert::open(
            AlertDraft {
                alert_type: AlertType::Structuring,
                severity: AlertSeverity::High,
                subject: Party::new("S1", SubjectType::Individual),
                description: "pattern".to_string(),
                risk_score: 40,
                related_transactions: vec!["t1".to_string()],
                evidence: Vec::new(),
            },
            Utc::now(),
        )
        .expect("alert")
    }

    #[tokio::test]
    async fn replace_is_a_version_cas() {
        let repo = InMemoryAlertRepository::new();
        let original = alert();
        repo.insert(&original).await.expect("insert");

        let review = original.start_review(Utc::now()).expect("review");
        let escalated = original.escalate(Utc::now()).expect("escalate");
        assert!(repo.replace(&review, original.version).await.expect("cas"));
        assert!(!repo.replace(&escalated, original.version).await.expect("cas"));

        let stored = repo.get(&original.id).await.expect("get").expect("stored");
        assert_eq!(stored.status, AlertStatus::UnderReview);
        assert_eq!(
            repo.list_by_status(&[AlertStatus::UnderReview]).await.expect("list").len(),
            1
        );
        assert!(repo.list_by_status(&[AlertStatus::Open]).await.expect("list").is_empty());
    }
}
