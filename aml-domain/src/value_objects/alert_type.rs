use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    ThresholdBreach,
    Structuring,
    VelocityAnomaly,
    PatternMatch,
    SanctionsHit,
    UnusualBehavior,
    HighRiskCounterparty,
    CrossBorder,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::ThresholdBreach => "THRESHOLD_BREACH",
            AlertType::Structuring => "STRUCTURING",
            AlertType::VelocityAnomaly => "VELOCITY_ANOMALY",
            AlertType::PatternMatch => "PATTERN_MATCH",
            AlertType::SanctionsHit => "SANCTIONS_HIT",
            AlertType::UnusualBehavior => "UNUSUAL_BEHAVIOR",
            AlertType::HighRiskCounterparty => "HIGH_RISK_COUNTERPARTY",
            AlertType::CrossBorder => "CROSS_BORDER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "LOW",
            AlertSeverity::Medium => "MEDIUM",
            AlertSeverity::High => "HIGH",
            AlertSeverity::Critical => "CRITICAL",
        }
    }
}
