// Identifier value objects

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubjectType {
    Individual,
    Merchant,
    Corporate,
}

impl SubjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::Individual => "INDIVIDUAL",
            SubjectType::Merchant => "MERCHANT",
            SubjectType::Corporate => "CORPORATE",
        }
    }
}

/// One side of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: String,
    pub party_type: SubjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl Party {
    pub fn new(id: impl Into<String>, party_type: SubjectType) -> Self {
        Self {
            id: id.into(),
            party_type,
            name: None,
            account: None,
        }
    }
}
