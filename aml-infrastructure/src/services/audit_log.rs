use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

use aml_domain::ports::AuditLog;
use aml_domain::AuditEntry;

/// Emits every audit entry as a structured event on the `audit` target.
#[derive(Default)]
pub struct TracingAuditLog;

impl TracingAuditLog {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditLog for TracingAuditLog {
    async fn log(&self, entry: &AuditEntry) -> Result<()> {
        info!(
            target: "audit",
            action = entry.action.as_str(),
            actor_id = %entry.actor_id,
            actor_type = ?entry.actor_type,
            target_type = %entry.target_type,
            target_id = %entry.target_id,
            recorded_at = %entry.recorded_at.to_rfc3339(),
            metadata = %entry.metadata,
            "audit"
        );
        Ok(())
    }
}

/// Appends one JSON document per line.
pub struct JsonLinesAuditLog {
    path: String,
    write_lock: Mutex<()>,
}

impl JsonLinesAuditLog {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl AuditLog for JsonLinesAuditLog {
    async fn log(&self, entry: &AuditEntry) -> Result<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = Path::new(&self.path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aml_domain::{ActorType, AuditAction};
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn json_lines_appends_entries() {
        let dir = std::env::temp_dir().join(format!("aml-audit-{}", Uuid::new_v4().simple()));
        let path = dir.join("audit.jsonl").to_string_lossy().to_string();
        let log = JsonLinesAuditLog::new(path.clone());
        for idx in 0..2 {
            log.log(&AuditEntry::new(
                AuditAction::PolicyCreated,
                "admin",
                ActorType::Admin,
                "POLICY",
                format!("P{idx}"),
                json!({ "after": { "id": format!("P{idx}") } }),
            ))
            .await
            .expect("log");
        }
        let content = fs::read_to_string(&path).await.expect("read");
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).expect("json");
        assert_eq!(second["target_id"], "P1");
        assert_eq!(second["action"], "POLICY_CREATED");
        let _ = fs::remove_dir_all(&dir).await;
    }
}
