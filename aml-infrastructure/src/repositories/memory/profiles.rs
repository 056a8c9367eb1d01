use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use aml_domain::ports::RiskProfileRepository;
use aml_domain::{CustomerRiskProfile, ProfileUpdate, SubjectType};

#[derive(Default)]
pub struct InMemoryRiskProfileRepository {
    profiles: RwLock<HashMap<String, CustomerRiskProfile>>,
}

impl InMemoryRiskProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RiskProfileRepository for InMemoryRiskProfileRepository {
    async fn get(&self, subject_id: &str) -> anyhow::Result<Option<CustomerRiskProfile>> {
        Ok(self.profiles.read().await.get(subject_id).cloned())
    }

    async fn insert_if_absent(&self, profile: CustomerRiskProfile) -> anyhow::Result<CustomerRiskProfile> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles
            .entry(profile.subject_id.clone())
            .or_insert(profile)
            .clone())
    }

    async fn apply(
        &self,
        subject_id: &str,
        subject_type: SubjectType,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> anyhow::Result<CustomerRiskProfile> {
        // The read-modify-write runs under the map's write lock.
        let mut profiles = self.profiles.write().await;
        let current = profiles
            .remove(subject_id)
            .unwrap_or_else(|| CustomerRiskProfile::new(subject_id, subject_type, now));
        let next = current.apply(update, now);
        profiles.insert(subject_id.to_string(), next.clone());
        Ok(next)
    }
}
