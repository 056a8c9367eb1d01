use serde::{Deserialize, Serialize};

/// Flags attached to a monitored transaction. `TravelRuleRequired` is
/// informational and never contributes to the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskFlag {
    CtrThreshold,
    SanctionsHit,
    VelocityAnomaly,
    StructuringSuspected,
    HighRiskSender,
    UnusualAmount,
    TravelRuleRequired,
}

impl RiskFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFlag::CtrThreshold => "CTR_THRESHOLD",
            RiskFlag::SanctionsHit => "SANCTIONS_HIT",
            RiskFlag::VelocityAnomaly => "VELOCITY_ANOMALY",
            RiskFlag::StructuringSuspected => "STRUCTURING_SUSPECTED",
            RiskFlag::HighRiskSender => "HIGH_RISK_SENDER",
            RiskFlag::UnusualAmount => "UNUSUAL_AMOUNT",
            RiskFlag::TravelRuleRequired => "TRAVEL_RULE_REQUIRED",
        }
    }
}
