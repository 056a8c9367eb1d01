use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use aml_domain::ports::TravelRuleRepository;
use aml_domain::TravelRuleRecord;

/// Keyed by transaction id.
#[derive(Default)]
pub struct InMemoryTravelRuleRepository {
    records: RwLock<HashMap<String, TravelRuleRecord>>,
}

impl InMemoryTravelRuleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TravelRuleRepository for InMemoryTravelRuleRepository {
    async fn insert(&self, record: &TravelRuleRecord) -> anyhow::Result<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.transaction_id) {
            anyhow::bail!(
                "travel rule record for '{}' already stored",
                record.transaction_id
            );
        }
        records.insert(record.transaction_id.clone(), record.clone());
        Ok(())
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> anyhow::Result<Option<TravelRuleRecord>> {
        Ok(self.records.read().await.get(transaction_id).cloned())
    }
}
