// Municipality policy entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    Draft,
    Active,
    Paused,
    Expired,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Draft => "DRAFT",
            PolicyStatus::Active => "ACTIVE",
            PolicyStatus::Paused => "PAUSED",
            PolicyStatus::Expired => "EXPIRED",
        }
    }

    pub fn can_transition_to(&self, next: PolicyStatus) -> bool {
        matches!(
            (self, next),
            (PolicyStatus::Draft, PolicyStatus::Active)
                | (PolicyStatus::Active, PolicyStatus::Paused)
                | (PolicyStatus::Paused, PolicyStatus::Active)
                | (PolicyStatus::Active, PolicyStatus::Expired)
                | (PolicyStatus::Paused, PolicyStatus::Expired)
        )
    }
}

/// Typed rule parameters. Rule types this build does not know deserialize
/// to `Unsupported` and pass at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCondition {
    RegionRestriction { allowed_regions: Vec<String> },
    MerchantCategory { allowed_categories: Vec<String> },
    UsageLimitTransaction { max_amount: i64 },
    UsageLimitDaily { max_amount: i64 },
    UsageLimitMonthly { max_amount: i64 },
    UserEligibility { required_credentials: Vec<String> },
    DiscountRate { rate: f64, max_discount: i64 },
    TimeRestriction { start_hour: u32, end_hour: u32 },
    Expiration { expires_at: DateTime<Utc> },
    #[serde(other)]
    Unsupported,
}

impl RuleCondition {
    pub fn kind_name(&self) -> &'static str {
        match self {
            RuleCondition::RegionRestriction { .. } => "REGION_RESTRICTION",
            RuleCondition::MerchantCategory { .. } => "MERCHANT_CATEGORY",
            RuleCondition::UsageLimitTransaction { .. } => "USAGE_LIMIT_TRANSACTION",
            RuleCondition::UsageLimitDaily { .. } => "USAGE_LIMIT_DAILY",
            RuleCondition::UsageLimitMonthly { .. } => "USAGE_LIMIT_MONTHLY",
            RuleCondition::UserEligibility { .. } => "USER_ELIGIBILITY",
            RuleCondition::DiscountRate { .. } => "DISCOUNT_RATE",
            RuleCondition::TimeRestriction { .. } => "TIME_RESTRICTION",
            RuleCondition::Expiration { .. } => "EXPIRATION",
            RuleCondition::Unsupported => "UNSUPPORTED",
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            RuleCondition::RegionRestriction { allowed_regions } if allowed_regions.is_empty() => {
                Err(DomainError::invalid("allowed_regions", "must not be empty"))
            }
            RuleCondition::MerchantCategory { allowed_categories } if allowed_categories.is_empty() => {
                Err(DomainError::invalid("allowed_categories", "must not be empty"))
            }
            RuleCondition::UserEligibility { required_credentials } if required_credentials.is_empty() => {
                Err(DomainError::invalid("required_credentials", "must not be empty"))
            }
            RuleCondition::UsageLimitTransaction { max_amount }
            | RuleCondition::UsageLimitDaily { max_amount }
            | RuleCondition::UsageLimitMonthly { max_amount }
                if *max_amount <= 0 =>
            {
                Err(DomainError::invalid("max_amount", "must be positive"))
            }
            RuleCondition::DiscountRate { rate, max_discount } => {
                if !(0.0..=1.0).contains(rate) {
                    return Err(DomainError::invalid("rate", format!("{rate} is outside [0, 1]")));
                }
                if *max_discount < 0 {
                    return Err(DomainError::invalid("max_discount", "must not be negative"));
                }
                Ok(())
            }
            RuleCondition::TimeRestriction { start_hour, end_hour } => {
                if *end_hour > 24 || start_hour >= end_hour {
                    return Err(DomainError::invalid(
                        "time_restriction",
                        format!("window [{start_hour}, {end_hour}) is not a valid hour range"),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub id: String,
    pub condition: RuleCondition,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Lower number is evaluated first.
    pub priority: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub municipality_id: String,
    pub status: PolicyStatus,
    pub rules: Vec<PolicyRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl Policy {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid("name", "must not be empty"));
        }
        if self.municipality_id.trim().is_empty() {
            return Err(DomainError::invalid("municipality_id", "must not be empty"));
        }
        let mut seen = std::collections::HashSet::new();
        for rule in &self.rules {
            if rule.id.trim().is_empty() {
                return Err(DomainError::invalid("rule.id", "must not be empty"));
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(DomainError::invalid("rule.id", format!("duplicate rule id '{}'", rule.id)));
            }
            rule.condition.validate()?;
        }
        Ok(())
    }

    /// Sort key across policies: the smallest priority among its rules.
    pub fn min_priority(&self) -> i32 {
        self.rules.iter().map(|rule| rule.priority).min().unwrap_or(i32::MAX)
    }

    pub fn is_effective(&self, at: DateTime<Utc>) -> bool {
        self.status == PolicyStatus::Active && self.expires_at.map_or(true, |expiry| at < expiry)
    }

    pub fn with_status(&self, status: PolicyStatus, now: DateTime<Utc>) -> Option<Self> {
        if !self.status.can_transition_to(status) {
            return None;
        }
        Some(Self {
            status,
            updated_at: now,
            version: self.version + 1,
            ..self.clone()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub municipality_id: String,
    pub region: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_rule_type_deserializes_as_unsupported() {
        let rule: PolicyRule = serde_json::from_str(
            r#"{"id":"r1","priority":3,"condition":{"type":"CARBON_BONUS","points":5}}"#,
        )
        .expect("rule");
        assert_eq!(rule.condition, RuleCondition::Unsupported);
        assert!(rule.enabled);
    }

    #[test]
    fn discount_rule_round_trips_tag() {
        let rule: PolicyRule = serde_json::from_str(
            r#"{"id":"d1","priority":1,"enabled":false,"condition":{"type":"DISCOUNT_RATE","rate":0.05,"max_discount":10000}}"#,
        )
        .expect("rule");
        assert_eq!(rule.condition.kind_name(), "DISCOUNT_RATE");
        assert!(!rule.enabled);
    }

    #[test]
    fn rule_parameters_are_checked() {
        assert!(RuleCondition::DiscountRate { rate: 1.5, max_discount: 10 }.validate().is_err());
        assert!(RuleCondition::TimeRestriction { start_hour: 22, end_hour: 6 }.validate().is_err());
        assert!(RuleCondition::UsageLimitDaily { max_amount: 0 }.validate().is_err());
        assert!(RuleCondition::RegionRestriction { allowed_regions: vec![] }.validate().is_err());
        assert!(RuleCondition::TimeRestriction { start_hour: 9, end_hour: 18 }.validate().is_ok());
    }

    #[test]
    fn status_transitions_follow_lifecycle() {
        assert!(PolicyStatus::Draft.can_transition_to(PolicyStatus::Active));
        assert!(PolicyStatus::Paused.can_transition_to(PolicyStatus::Active));
        assert!(!PolicyStatus::Draft.can_transition_to(PolicyStatus::Paused));
        assert!(!PolicyStatus::Expired.can_transition_to(PolicyStatus::Active));
    }
}
