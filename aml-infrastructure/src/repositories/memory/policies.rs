use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use aml_domain::ports::{MerchantRepository, PolicyRepository};
use aml_domain::{MerchantProfile, Policy};

#[derive(Default)]
pub struct InMemoryPolicyRepository {
    policies: RwLock<HashMap<String, Policy>>,
}

impl InMemoryPolicyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PolicyRepository for InMemoryPolicyRepository {
    async fn insert(&self, policy: &Policy) -> anyhow::Result<()> {
        let mut policies = self.policies.write().await;
        if policies.contains_key(&policy.id) {
            anyhow::bail!("policy '{}' already stored", policy.id);
        }
        policies.insert(policy.id.clone(), policy.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Policy>> {
        Ok(self.policies.read().await.get(id).cloned())
    }

    async fn replace(&self, policy: &Policy, expected_version: u64) -> anyhow::Result<bool> {
        let mut policies = self.policies.write().await;
        match policies.get_mut(&policy.id) {
            Some(current) if current.version == expected_version => {
                *current = policy.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list(&self) -> anyhow::Result<Vec<Policy>> {
        Ok(self.policies.read().await.values().cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryMerchantRepository {
    merchants: RwLock<HashMap<String, MerchantProfile>>,
}

impl InMemoryMerchantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MerchantRepository for InMemoryMerchantRepository {
    async fn get(&self, id: &str) -> anyhow::Result<Option<MerchantProfile>> {
        Ok(self.merchants.read().await.get(id).cloned())
    }

    async fn upsert(&self, merchant: MerchantProfile) -> anyhow::Result<()> {
        self.merchants
            .write()
            .await
            .insert(merchant.id.clone(), merchant);
        Ok(())
    }
}
