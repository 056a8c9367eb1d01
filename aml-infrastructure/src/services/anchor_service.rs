use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use aml_domain::ports::AnchorService;
use aml_domain::AnchorReceipt;

use crate::utils::to_hex;

#[derive(Serialize)]
struct AnchorRequest<'a> {
    record_id: &'a str,
    record_type: &'a str,
    payload: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct AnchorResponse {
    hash: String,
}

/// Posts the record to an external anchoring endpoint and returns its hash verbatim.
pub struct HttpAnchorService {
    client: Client,
    url: String,
}

impl HttpAnchorService {
    pub fn new(url: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.max(1)))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AnchorService for HttpAnchorService {
    async fn anchor(
        &self,
        record_id: &str,
        record_type: &str,
        payload: &serde_json::Value,
    ) -> Result<AnchorReceipt> {
        let response: AnchorResponse = self
            .client
            .post(&self.url)
            .json(&AnchorRequest {
                record_id,
                record_type,
                payload,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if response.hash.trim().is_empty() {
            return Err(anyhow!("anchoring service returned an empty hash"));
        }
        info!(record_id, record_type, hash = %response.hash, "record anchored");
        Ok(AnchorReceipt { hash: response.hash })
    }
}

/// Local content hash used when no anchoring endpoint is configured.
#[derive(Default)]
pub struct DigestAnchorService;

impl DigestAnchorService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnchorService for DigestAnchorService {
    async fn anchor(
        &self,
        record_id: &str,
        record_type: &str,
        payload: &serde_json::Value,
    ) -> Result<AnchorReceipt> {
        // serde_json maps keep keys sorted, so the encoding is canonical.
        let body = serde_json::to_vec(payload)?;
        let mut hasher = Sha256::new();
        hasher.update(record_type.as_bytes());
        hasher.update(b":");
        hasher.update(record_id.as_bytes());
        hasher.update(b":");
        hasher.update(&body);
        let hash = format!("0x{}", to_hex(&hasher.finalize()));
        Ok(AnchorReceipt { hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn digest_is_stable_and_content_sensitive() {
        let service = DigestAnchorService::new();
        let first = service
            .anchor("r1", "STR", &json!({ "b": 2, "a": 1 }))
            .await
            .expect("anchor");
        let reordered = service
            .anchor("r1", "STR", &json!({ "a": 1, "b": 2 }))
            .await
            .expect("anchor");
        let changed = service
            .anchor("r1", "STR", &json!({ "a": 1, "b": 3 }))
            .await
            .expect("anchor");
        assert_eq!(first, reordered);
        assert_ne!(first, changed);
        assert!(first.hash.starts_with("0x"));
        assert_eq!(first.hash.len(), 66);
    }
}
