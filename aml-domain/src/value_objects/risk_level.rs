// Risk level value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }

    /// Days until the next scheduled profile review at this level.
    pub fn review_interval_days(&self) -> i64 {
        match self {
            RiskLevel::Low => 365,
            RiskLevel::Medium => 180,
            RiskLevel::High => 90,
            RiskLevel::Critical => 30,
        }
    }
}

impl From<&str> for RiskLevel {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "MEDIUM" => RiskLevel::Medium,
            "HIGH" => RiskLevel::High,
            "CRITICAL" => RiskLevel::Critical,
            _ => RiskLevel::Low,
        }
    }
}

/// Score cut-offs for profile risk levels. Scores below `medium` are LOW.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBands {
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            medium: 30.0,
            high: 60.0,
            critical: 85.0,
        }
    }
}

impl RiskBands {
    pub fn level_for(&self, score: f64) -> RiskLevel {
        if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_map_scores_to_levels() {
        let bands = RiskBands::default();
        assert_eq!(bands.level_for(0.0), RiskLevel::Low);
        assert_eq!(bands.level_for(29.9), RiskLevel::Low);
        assert_eq!(bands.level_for(30.0), RiskLevel::Medium);
        assert_eq!(bands.level_for(60.0), RiskLevel::High);
        assert_eq!(bands.level_for(120.0), RiskLevel::Critical);
    }

    #[test]
    fn parse_falls_back_to_low() {
        assert_eq!(RiskLevel::from(" high "), RiskLevel::High);
        assert_eq!(RiskLevel::from("unknown"), RiskLevel::Low);
    }
}
