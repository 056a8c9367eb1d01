// Travel-rule disclosure record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelRuleStatus {
    Pending,
    Compliant,
    NonCompliant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelRuleParty {
    pub name: String,
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelRuleRecord {
    pub id: String,
    pub transaction_id: String,
    pub amount: i64,
    pub originator: TravelRuleParty,
    pub beneficiary: TravelRuleParty,
    pub originator_vasp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiary_vasp: Option<String>,
    pub status: TravelRuleStatus,
    pub created_at: DateTime<Utc>,
}

impl TravelRuleRecord {
    pub fn new(
        transaction_id: &str,
        amount: i64,
        originator: TravelRuleParty,
        beneficiary: TravelRuleParty,
        originator_vasp: &str,
        beneficiary_vasp: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let beneficiary_vasp = beneficiary_vasp.filter(|vasp| !vasp.trim().is_empty());
        let status = if beneficiary_vasp.is_some() {
            TravelRuleStatus::Compliant
        } else {
            TravelRuleStatus::Pending
        };
        Self {
            id: format!("TRR-{}", Uuid::new_v4().simple()),
            transaction_id: transaction_id.to_string(),
            amount,
            originator,
            beneficiary,
            originator_vasp: originator_vasp.to_string(),
            beneficiary_vasp,
            status,
            created_at: now,
        }
    }
}
