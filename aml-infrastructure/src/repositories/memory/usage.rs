use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use aml_domain::ports::UsageRepository;

/// Spend ledger consumed by the daily and monthly usage caps.
#[derive(Default)]
pub struct InMemoryUsageRepository {
    entries: RwLock<HashMap<String, Vec<(DateTime<Utc>, i64)>>>,
}

impl InMemoryUsageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageRepository for InMemoryUsageRepository {
    async fn record(&self, user_id: &str, amount: i64, at: DateTime<Utc>) -> anyhow::Result<()> {
        self.entries
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push((at, amount));
        Ok(())
    }

    async fn total_since(&self, user_id: &str, since: DateTime<Utc>) -> anyhow::Result<i64> {
        Ok(self
            .entries
            .read()
            .await
            .get(user_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(at, _)| *at >= since)
                    .fold(0i64, |acc, (_, amount)| acc.saturating_add(*amount))
            })
            .unwrap_or(0))
    }
}
