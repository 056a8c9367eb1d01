use serde::{Deserialize, Serialize};

use crate::value_objects::RiskBands;

/// Numeric limits consumed by the transaction monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitorThresholds {
    pub ctr_threshold: i64,
    pub travel_rule_threshold: i64,
    pub max_hourly_transactions: u32,
    pub str_pattern_days: u32,
    pub str_pattern_count: u32,
    /// Lower edge of the structuring band as a fraction of the CTR threshold.
    pub structuring_band_ratio: f64,
    pub unusual_amount_multiplier: f64,
    /// Transactions scoring at or above this are blocked.
    pub block_risk_score: u32,
}

impl Default for MonitorThresholds {
    fn default() -> Self {
        Self {
            ctr_threshold: 10_000_000,
            travel_rule_threshold: 1_000_000,
            max_hourly_transactions: 10,
            str_pattern_days: 3,
            str_pattern_count: 5,
            structuring_band_ratio: 0.7,
            unusual_amount_multiplier: 5.0,
            block_risk_score: 100,
        }
    }
}

impl MonitorThresholds {
    pub fn in_structuring_band(&self, amount: i64) -> bool {
        amount < self.ctr_threshold
            && amount as f64 >= self.ctr_threshold as f64 * self.structuring_band_ratio
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub admin_token: Option<String>,
    pub thresholds: MonitorThresholds,
    pub risk_bands: RiskBands,
    pub profile_score_dampening: f64,
    pub policy_utc_offset_hours: i32,
    pub vasp_id: String,
    pub policies_path: Option<String>,
    pub report_dir: String,
    pub summary_hour: u32,
    pub summary_minute: u32,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3300".to_string(),
            api_token: None,
            admin_token: None,
            thresholds: MonitorThresholds::default(),
            risk_bands: RiskBands::default(),
            profile_score_dampening: 0.1,
            policy_utc_offset_hours: 9,
            vasp_id: "LOCAL-CURRENCY-VASP".to_string(),
            policies_path: None,
            report_dir: "./reports".to_string(),
            summary_hour: 0,
            summary_minute: 10,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structuring_band_is_half_open() {
        let thresholds = MonitorThresholds::default();
        assert!(!thresholds.in_structuring_band(6_999_999));
        assert!(thresholds.in_structuring_band(7_000_000));
        assert!(thresholds.in_structuring_band(9_999_999));
        assert!(!thresholds.in_structuring_band(10_000_000));
    }
}
