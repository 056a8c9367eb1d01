use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;

use aml_domain::ports::ConfigRepository;
use aml_domain::{MerchantProfile, Policy};

/// Seed and persistence files: sanctions list, merchants and policies (YAML).
pub struct ConfigFileRepository;

impl ConfigFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConfigFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SanctionsEntry {
    Id(String),
    Detailed { id: String },
}

impl SanctionsEntry {
    fn into_id(self) -> String {
        match self {
            SanctionsEntry::Id(id) | SanctionsEntry::Detailed { id } => id,
        }
    }
}

async fn ensure_parent(path: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

#[async_trait]
impl ConfigRepository for ConfigFileRepository {
    async fn load_sanctions_list(&self, path: &str) -> anyhow::Result<Vec<String>> {
        let content = fs::read_to_string(path).await?;
        let entries: Vec<SanctionsEntry> = serde_yaml::from_str(&content)?;
        Ok(entries
            .into_iter()
            .map(SanctionsEntry::into_id)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect())
    }

    async fn load_merchants(&self, path: &str) -> anyhow::Result<Vec<MerchantProfile>> {
        if !Path::new(path).exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).await?;
        let merchants: Vec<MerchantProfile> = serde_yaml::from_str(&content)?;
        Ok(merchants)
    }

    async fn load_policies(&self, path: &str) -> anyhow::Result<Vec<Policy>> {
        if !Path::new(path).exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).await?;
        let policies: Vec<Policy> = serde_yaml::from_str(&content)?;
        Ok(policies)
    }

    async fn save_policies(&self, path: &str, policies: &[Policy]) -> anyhow::Result<()> {
        ensure_parent(path).await?;
        let content = serde_yaml::to_string(policies)?;
        fs::write(path, content).await?;
        Ok(())
    }
}
