use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use aml_domain::ports::TransactionRepository;
use aml_domain::MonitoredTransaction;

#[derive(Default)]
struct History {
    by_id: HashMap<String, MonitoredTransaction>,
    /// Per sender, ordered by timestamp.
    by_sender: HashMap<String, Vec<MonitoredTransaction>>,
}

#[derive(Default)]
pub struct InMemoryTransactionRepository {
    history: RwLock<History>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn append(&self, transaction: &MonitoredTransaction) -> anyhow::Result<()> {
        let mut history = self.history.write().await;
        if history.by_id.contains_key(&transaction.id) {
            anyhow::bail!("transaction '{}' already stored", transaction.id);
        }
        history
            .by_id
            .insert(transaction.id.clone(), transaction.clone());
        let sender = history
            .by_sender
            .entry(transaction.sender.id.clone())
            .or_default();
        let index = sender.partition_point(|prev| prev.timestamp <= transaction.timestamp);
        sender.insert(index, transaction.clone());
        Ok(())
    }

    async fn exists(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.history.read().await.by_id.contains_key(id))
    }

    async fn fetch_by_ids(&self, ids: &[String]) -> anyhow::Result<Vec<MonitoredTransaction>> {
        let history = self.history.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| history.by_id.get(id).cloned())
            .collect())
    }

    async fn fetch_sender_since(
        &self,
        sender_id: &str,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<MonitoredTransaction>> {
        let history = self.history.read().await;
        let Some(sender) = history.by_sender.get(sender_id) else {
            return Ok(Vec::new());
        };
        let start = sender.partition_point(|prev| prev.timestamp < since);
        Ok(sender[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aml_domain::{Party, SubjectType, TransactionKind};
    use chrono::{Duration, TimeZone};
    use std::collections::BTreeSet;

    fn tx(id: &str, sender: &str, at: DateTime<Utc>) -> MonitoredTransaction {
        MonitoredTransaction {
            id: id.to_string(),
            timestamp: at,
            sender: Party::new(sender, SubjectType::Individual),
            recipient: Party::new("M1", SubjectType::Merchant),
            amount: 1_000,
            kind: TransactionKind::Payment,
            channel: "APP".to_string(),
            location: None,
            device: None,
            beneficiary_vasp: None,
            risk_score: None,
            flags: BTreeSet::new(),
        }
    }

    #[tokio::test]
    async fn sender_history_is_time_ordered_and_windowed() {
        let repo = InMemoryTransactionRepository::new();
        let base = Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap();
        repo.append(&tx("t2", "S1", base + Duration::minutes(20))).await.expect("append");
        repo.append(&tx("t1", "S1", base)).await.expect("append");
        repo.append(&tx("t3", "S1", base + Duration::minutes(40))).await.expect("append");
        repo.append(&tx("x1", "S2", base)).await.expect("append");

        let since = repo
            .fetch_sender_since("S1", base + Duration::minutes(20))
            .await
            .expect("fetch");
        let ids = since.iter().map(|tx| tx.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["t2", "t3"]);
        assert!(repo.fetch_sender_since("S9", base).await.expect("fetch").is_empty());
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let repo = InMemoryTransactionRepository::new();
        let at = Utc::now();
        repo.append(&tx("t1", "S1", at)).await.expect("append");
        assert!(repo.append(&tx("t1", "S1", at)).await.is_err());
        assert!(repo.exists("t1").await.expect("exists"));
        let found = repo
            .fetch_by_ids(&["missing".to_string(), "t1".to_string()])
            .await
            .expect("fetch");
        assert_eq!(found.len(), 1);
    }
}
