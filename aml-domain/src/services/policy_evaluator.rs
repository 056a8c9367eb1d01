use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{MerchantProfile, Policy, PolicyRule, RuleCondition};
use crate::utils::local_hour;

/// Everything a rule may look at when judging one payment.
#[derive(Debug, Clone)]
pub struct PolicyRequest<'a> {
    pub user_id: &'a str,
    pub merchant: &'a MerchantProfile,
    pub amount: i64,
    pub timestamp: DateTime<Utc>,
    pub utc_offset: FixedOffset,
    pub user_credentials: &'a [String],
    pub daily_usage: i64,
    pub monthly_usage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyViolation {
    pub policy_id: String,
    pub rule_id: String,
    pub rule_type: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub allowed: bool,
    pub applied_policies: Vec<String>,
    pub violations: Vec<PolicyViolation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_applied: Option<i64>,
}

enum RuleOutcome {
    Pass,
    Discount(i64),
    Fail(String),
}

/// Evaluates the active policies of the merchant's municipality.
///
/// Policies run by ascending minimum rule priority (ties by id) and rules by
/// ascending priority; every violation is collected.
pub fn evaluate_policies(policies: &[Policy], request: &PolicyRequest<'_>) -> PolicyDecision {
    let mut scoped = policies
        .iter()
        .filter(|policy| {
            policy.municipality_id == request.merchant.municipality_id && policy.is_effective(request.timestamp)
        })
        .collect::<Vec<_>>();
    scoped.sort_by(|a, b| a.min_priority().cmp(&b.min_priority()).then_with(|| a.id.cmp(&b.id)));

    let mut applied_policies = Vec::with_capacity(scoped.len());
    let mut violations = Vec::new();
    let mut discount_total: i64 = 0;

    for policy in scoped {
        applied_policies.push(policy.id.clone());
        let mut rules = policy.rules.iter().filter(|rule| rule.enabled).collect::<Vec<_>>();
        rules.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));
        for rule in rules {
            match evaluate_rule(rule, request) {
                RuleOutcome::Pass => {}
                RuleOutcome::Discount(value) => discount_total = discount_total.saturating_add(value),
                RuleOutcome::Fail(message) => violations.push(PolicyViolation {
                    policy_id: policy.id.clone(),
                    rule_id: rule.id.clone(),
                    rule_type: rule.condition.kind_name().to_string(),
                    message,
                }),
            }
        }
    }

    let discount_total = discount_total.clamp(0, request.amount.max(0));
    let (modified_amount, discount_applied) = if discount_total > 0 {
        (Some(request.amount - discount_total), Some(discount_total))
    } else {
        (None, None)
    };

    PolicyDecision {
        allowed: violations.is_empty(),
        applied_policies,
        violations,
        modified_amount,
        discount_applied,
    }
}

fn evaluate_rule(rule: &PolicyRule, request: &PolicyRequest<'_>) -> RuleOutcome {
    match &rule.condition {
        RuleCondition::RegionRestriction { allowed_regions } => {
            let region = request.merchant.region.trim();
            if allowed_regions.iter().any(|allowed| allowed.trim().eq_ignore_ascii_case(region)) {
                RuleOutcome::Pass
            } else {
                RuleOutcome::Fail(format!("merchant region '{}' is not permitted", region))
            }
        }
        RuleCondition::MerchantCategory { allowed_categories } => {
            let permitted = request.merchant.categories.iter().any(|category| {
                allowed_categories
                    .iter()
                    .any(|allowed| allowed.trim().eq_ignore_ascii_case(category.trim()))
            });
            if permitted {
                RuleOutcome::Pass
            } else {
                RuleOutcome::Fail(format!(
                    "merchant categories [{}] are not permitted",
                    request.merchant.categories.join(", ")
                ))
            }
        }
        RuleCondition::UsageLimitTransaction { max_amount } => {
            if request.amount > *max_amount {
                RuleOutcome::Fail(format!("amount {} exceeds per-transaction limit {}", request.amount, max_amount))
            } else {
                RuleOutcome::Pass
            }
        }
        RuleCondition::UsageLimitDaily { max_amount } => {
            let projected = request.daily_usage.saturating_add(request.amount);
            if projected > *max_amount {
                RuleOutcome::Fail(format!("daily usage {} would exceed limit {}", projected, max_amount))
            } else {
                RuleOutcome::Pass
            }
        }
        RuleCondition::UsageLimitMonthly { max_amount } => {
            let projected = request.monthly_usage.saturating_add(request.amount);
            if projected > *max_amount {
                RuleOutcome::Fail(format!("monthly usage {} would exceed limit {}", projected, max_amount))
            } else {
                RuleOutcome::Pass
            }
        }
        RuleCondition::UserEligibility { required_credentials } => {
            let eligible = request
                .user_credentials
                .iter()
                .any(|held| required_credentials.iter().any(|required| required == held));
            if eligible {
                RuleOutcome::Pass
            } else {
                RuleOutcome::Fail(format!(
                    "user {} holds none of the required credentials [{}]",
                    request.user_id,
                    required_credentials.join(", ")
                ))
            }
        }
        RuleCondition::DiscountRate { rate, max_discount } => {
            let raw = (request.amount as f64 * rate).floor() as i64;
            RuleOutcome::Discount(raw.min(*max_discount).max(0))
        }
        RuleCondition::TimeRestriction { start_hour, end_hour } => {
            let hour = local_hour(request.timestamp, request.utc_offset);
            if hour >= *start_hour && hour < *end_hour {
                RuleOutcome::Pass
            } else {
                RuleOutcome::Fail(format!(
                    "local hour {} is outside the permitted window {}-{}",
                    hour, start_hour, end_hour
                ))
            }
        }
        RuleCondition::Expiration { expires_at } => {
            if request.timestamp >= *expires_at {
                RuleOutcome::Fail(format!("rule expired at {}", expires_at.to_rfc3339()))
            } else {
                RuleOutcome::Pass
            }
        }
        RuleCondition::Unsupported => RuleOutcome::Pass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PolicyStatus;
    use crate::utils::utc_offset;
    use chrono::{Duration, TimeZone};

    fn merchant() -> MerchantProfile {
        MerchantProfile {
            id: "M1".to_string(),
            name: "Corner Grocery".to_string(),
            municipality_id: "MUNI-1".to_string(),
            region: "SEOUL".to_string(),
            categories: vec!["GROCERY".to_string()],
        }
    }

    fn rule(id: &str, priority: i32, condition: RuleCondition) -> PolicyRule {
        PolicyRule {
            id: id.to_string(),
            condition,
            enabled: true,
            priority,
        }
    }

    fn policy(id: &str, rules: Vec<PolicyRule>) -> Policy {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Policy {
            id: id.to_string(),
            name: format!("policy {id}"),
            municipality_id: "MUNI-1".to_string(),
            status: PolicyStatus::Active,
            rules,
            expires_at: None,
            created_by: "admin".to_string(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    fn request<'a>(merchant: &'a MerchantProfile, amount: i64, credentials: &'a [String]) -> PolicyRequest<'a> {
        PolicyRequest {
            user_id: "U1",
            merchant,
            amount,
            // 14:00 KST
            timestamp: Utc.with_ymd_and_hms(2026, 7, 1, 5, 0, 0).unwrap(),
            utc_offset: utc_offset(9),
            user_credentials: credentials,
            daily_usage: 0,
            monthly_usage: 0,
        }
    }

    #[test]
    fn region_limit_and_discount_combine() {
        let merchant = merchant();
        let policies = vec![policy(
            "P1",
            vec![
                rule(
                    "region",
                    1,
                    RuleCondition::RegionRestriction {
                        allowed_regions: vec!["SEOUL".to_string()],
                    },
                ),
                rule("cap", 2, RuleCondition::UsageLimitTransaction { max_amount: 500_000 }),
                rule(
                    "discount",
                    3,
                    RuleCondition::DiscountRate {
                        rate: 0.05,
                        max_discount: 10_000,
                    },
                ),
            ],
        )];
        let decision = evaluate_policies(&policies, &request(&merchant, 300_000, &[]));
        assert!(decision.allowed);
        assert_eq!(decision.applied_policies, vec!["P1"]);
        assert_eq!(decision.discount_applied, Some(10_000));
        assert_eq!(decision.modified_amount, Some(290_000));

        let over = evaluate_policies(&policies, &request(&merchant, 600_000, &[]));
        assert!(!over.allowed);
        assert_eq!(over.violations.len(), 1);
        assert_eq!(over.violations[0].rule_type, "USAGE_LIMIT_TRANSACTION");
    }

    #[test]
    fn violations_are_collected_without_short_circuit() {
        let merchant = merchant();
        let policies = vec![policy(
            "P1",
            vec![
                rule(
                    "region",
                    1,
                    RuleCondition::RegionRestriction {
                        allowed_regions: vec!["BUSAN".to_string()],
                    },
                ),
                rule(
                    "category",
                    2,
                    RuleCondition::MerchantCategory {
                        allowed_categories: vec!["PHARMACY".to_string()],
                    },
                ),
                rule(
                    "citizen",
                    3,
                    RuleCondition::UserEligibility {
                        required_credentials: vec!["RESIDENT".to_string()],
                    },
                ),
            ],
        )];
        let decision = evaluate_policies(&policies, &request(&merchant, 1_000, &[]));
        let kinds = decision
            .violations
            .iter()
            .map(|violation| violation.rule_type.as_str())
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec!["REGION_RESTRICTION", "MERCHANT_CATEGORY", "USER_ELIGIBILITY"]);

        let credentials = vec!["RESIDENT".to_string()];
        let eligible = evaluate_policies(&policies, &request(&merchant, 1_000, &credentials));
        assert_eq!(eligible.violations.len(), 2);
    }

    #[test]
    fn decision_does_not_depend_on_policy_order() {
        let merchant = merchant();
        let first = policy(
            "A",
            vec![rule(
                "d",
                5,
                RuleCondition::DiscountRate {
                    rate: 0.1,
                    max_discount: 50_000,
                },
            )],
        );
        let second = policy("B", vec![rule("cap", 1, RuleCondition::UsageLimitDaily { max_amount: 100_000 })]);
        let mut req = request(&merchant, 80_000, &[]);
        req.daily_usage = 30_000;
        let forward = evaluate_policies(&[first.clone(), second.clone()], &req);
        let reverse = evaluate_policies(&[second, first], &req);
        assert_eq!(forward, reverse);
        assert_eq!(forward.applied_policies, vec!["B", "A"]);
        assert!(!forward.allowed);
        assert_eq!(forward.discount_applied, Some(8_000));
    }

    #[test]
    fn inactive_foreign_and_disabled_are_skipped() {
        let merchant = merchant();
        let mut paused = policy("paused", vec![rule("cap", 1, RuleCondition::UsageLimitTransaction { max_amount: 1 })]);
        paused.status = PolicyStatus::Paused;
        let mut foreign = policy("foreign", vec![rule("cap", 1, RuleCondition::UsageLimitTransaction { max_amount: 1 })]);
        foreign.municipality_id = "MUNI-2".to_string();
        let mut expired = policy("expired", vec![rule("cap", 1, RuleCondition::UsageLimitTransaction { max_amount: 1 })]);
        expired.expires_at = Some(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap());
        let mut disabled_rule = rule("cap", 1, RuleCondition::UsageLimitTransaction { max_amount: 1 });
        disabled_rule.enabled = false;
        let disabled = policy("disabled", vec![disabled_rule, rule("x", 2, RuleCondition::Unsupported)]);

        let decision = evaluate_policies(&[paused, foreign, expired, disabled], &request(&merchant, 5_000, &[]));
        assert!(decision.allowed);
        assert_eq!(decision.applied_policies, vec!["disabled"]);
        assert_eq!(decision.modified_amount, None);
    }

    #[test]
    fn time_window_and_expiration_use_local_clock() {
        let merchant = merchant();
        let req = request(&merchant, 1_000, &[]);
        let business_hours = policy(
            "hours",
            vec![rule(
                "t",
                1,
                RuleCondition::TimeRestriction {
                    start_hour: 9,
                    end_hour: 14,
                },
            )],
        );
        let decision = evaluate_policies(&[business_hours], &req);
        assert_eq!(decision.violations.len(), 1);

        let ending = policy(
            "ending",
            vec![rule(
                "e",
                1,
                RuleCondition::Expiration {
                    expires_at: req.timestamp + Duration::seconds(1),
                },
            )],
        );
        assert!(evaluate_policies(&[ending], &req).allowed);
    }

    #[test]
    fn stacked_discounts_never_exceed_amount() {
        let merchant = merchant();
        let policies = vec![
            policy(
                "A",
                vec![rule(
                    "d1",
                    1,
                    RuleCondition::DiscountRate {
                        rate: 0.8,
                        max_discount: 1_000_000,
                    },
                )],
            ),
            policy(
                "B",
                vec![rule(
                    "d2",
                    1,
                    RuleCondition::DiscountRate {
                        rate: 0.8,
                        max_discount: 1_000_000,
                    },
                )],
            ),
        ];
        let decision = evaluate_policies(&policies, &request(&merchant, 10_000, &[]));
        assert_eq!(decision.discount_applied, Some(10_000));
        assert_eq!(decision.modified_amount, Some(0));
    }
}
