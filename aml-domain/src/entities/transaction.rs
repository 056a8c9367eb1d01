// Monitored transaction entity
// Immutable once assessed; retained for velocity/structuring lookups

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{Party, RiskFlag};

/// Largest accepted amount in minor units. Sums over a sender's history stay far from `i64::MAX`.
pub const MAX_TRANSACTION_AMOUNT: i64 = 1_000_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Payment,
    Transfer,
    Topup,
    Withdrawal,
    Exchange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeviceInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoredTransaction {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub sender: Party,
    pub recipient: Party,
    /// Amount in KRW.
    pub amount: i64,
    pub kind: TransactionKind,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiary_vasp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u32>,
    #[serde(default)]
    pub flags: BTreeSet<RiskFlag>,
}

impl MonitoredTransaction {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::invalid("id", "must not be empty"));
        }
        if self.sender.id.trim().is_empty() {
            return Err(DomainError::invalid("sender.id", "must not be empty"));
        }
        if self.recipient.id.trim().is_empty() {
            return Err(DomainError::invalid("recipient.id", "must not be empty"));
        }
        if self.amount <= 0 {
            return Err(DomainError::invalid(
                "amount",
                format!("must be positive, got {}", self.amount),
            ));
        }
        if self.amount > MAX_TRANSACTION_AMOUNT {
            return Err(DomainError::invalid(
                "amount",
                format!("must not exceed {}, got {}", MAX_TRANSACTION_AMOUNT, self.amount),
            ));
        }
        Ok(())
    }

    pub fn is_assessed(&self) -> bool {
        self.risk_score.is_some()
    }

    /// Returns the evaluated copy that goes into the history.
    pub fn assessed(&self, risk_score: u32, flags: BTreeSet<RiskFlag>) -> Self {
        Self {
            risk_score: Some(risk_score),
            flags,
            ..self.clone()
        }
    }
}
