use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use aml_domain::{MonitorThresholds, RiskBands, RuntimeConfig};

use super::validation::{
    validate_clock, validate_open_ratio, validate_positive, validate_risk_bands, validate_utc_offset,
};

pub const CONFIG_PATH_ENV: &str = "AML_ENGINE_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub admin_token: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub ctr_threshold: i64,
    pub travel_rule_threshold: i64,
    pub max_hourly_transactions: u32,
    pub str_pattern_days: u32,
    pub str_pattern_count: u32,
    pub structuring_band_ratio: f64,
    pub unusual_amount_multiplier: f64,
    pub medium_risk_score: f64,
    pub high_risk_score: f64,
    pub critical_risk_score: f64,
    pub block_risk_score: u32,
    pub profile_score_dampening: f64,
    pub policy_utc_offset_hours: i32,
    pub anchor_url: Option<String>,
    pub anchor_timeout_seconds: u64,
    pub audit_log_path: Option<String>,
    pub vasp_id: String,
    pub sanctions_list_path: Option<String>,
    pub merchants_path: Option<String>,
    pub policies_path: Option<String>,
    pub report_dir: String,
    pub summary_hour: u32,
    pub summary_minute: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let thresholds = MonitorThresholds::default();
        let bands = RiskBands::default();
        let runtime = RuntimeConfig::default();
        Self {
            bind_addr: runtime.bind_addr,
            api_token: None,
            admin_token: None,
            max_body_bytes: runtime.max_body_bytes,
            request_timeout_seconds: runtime.request_timeout_seconds,
            ctr_threshold: thresholds.ctr_threshold,
            travel_rule_threshold: thresholds.travel_rule_threshold,
            max_hourly_transactions: thresholds.max_hourly_transactions,
            str_pattern_days: thresholds.str_pattern_days,
            str_pattern_count: thresholds.str_pattern_count,
            structuring_band_ratio: thresholds.structuring_band_ratio,
            unusual_amount_multiplier: thresholds.unusual_amount_multiplier,
            medium_risk_score: bands.medium,
            high_risk_score: bands.high,
            critical_risk_score: bands.critical,
            block_risk_score: thresholds.block_risk_score,
            profile_score_dampening: runtime.profile_score_dampening,
            policy_utc_offset_hours: runtime.policy_utc_offset_hours,
            anchor_url: None,
            anchor_timeout_seconds: 10,
            audit_log_path: None,
            vasp_id: runtime.vasp_id,
            sanctions_list_path: None,
            merchants_path: None,
            policies_path: None,
            report_dir: runtime.report_dir,
            summary_hour: runtime.summary_hour,
            summary_minute: runtime.summary_minute,
        }
    }
}

impl AppConfig {
    /// Reads `path`, or `AML_ENGINE_CONFIG`, or `./config.toml`.
    pub async fn load(path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_string(),
            None => env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.toml".to_string()),
        };
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::parse(&content)?
        } else {
            warn!(path = %path, "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config: {}", err))
    }

    pub fn normalize(&mut self) {
        for value in [
            &mut self.api_token,
            &mut self.admin_token,
            &mut self.anchor_url,
            &mut self.audit_log_path,
            &mut self.sanctions_list_path,
            &mut self.merchants_path,
            &mut self.policies_path,
        ] {
            if value.as_deref().map_or(false, |inner| inner.trim().is_empty()) {
                *value = None;
            }
        }
        self.vasp_id = self.vasp_id.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.report_dir = resolve_path(base, &self.report_dir);
        for value in [
            &mut self.audit_log_path,
            &mut self.sanctions_list_path,
            &mut self.merchants_path,
            &mut self.policies_path,
        ] {
            if let Some(path) = value.as_mut() {
                *path = resolve_path(base, path);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        validate_positive("ctr_threshold", self.ctr_threshold)?;
        validate_positive("travel_rule_threshold", self.travel_rule_threshold)?;
        validate_open_ratio("structuring_band_ratio", self.structuring_band_ratio)?;
        if self.str_pattern_count < 1 {
            return Err(anyhow!("str_pattern_count must be at least 1"));
        }
        if self.unusual_amount_multiplier <= 0.0 {
            return Err(anyhow!("unusual_amount_multiplier must be greater than 0"));
        }
        validate_risk_bands(self.medium_risk_score, self.high_risk_score, self.critical_risk_score)?;
        if self.block_risk_score == 0 {
            return Err(anyhow!("block_risk_score must be greater than 0"));
        }
        if self.profile_score_dampening <= 0.0 {
            return Err(anyhow!("profile_score_dampening must be greater than 0"));
        }
        validate_utc_offset(self.policy_utc_offset_hours)?;
        if self.vasp_id.is_empty() {
            return Err(anyhow!("vasp_id must not be empty"));
        }
        validate_clock(self.summary_hour, self.summary_minute)?;
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            admin_token: self.admin_token.clone(),
            thresholds: MonitorThresholds {
                ctr_threshold: self.ctr_threshold,
                travel_rule_threshold: self.travel_rule_threshold,
                max_hourly_transactions: self.max_hourly_transactions,
                str_pattern_days: self.str_pattern_days,
                str_pattern_count: self.str_pattern_count,
                structuring_band_ratio: self.structuring_band_ratio,
                unusual_amount_multiplier: self.unusual_amount_multiplier,
                block_risk_score: self.block_risk_score,
            },
            risk_bands: RiskBands {
                medium: self.medium_risk_score,
                high: self.high_risk_score,
                critical: self.critical_risk_score,
            },
            profile_score_dampening: self.profile_score_dampening,
            policy_utc_offset_hours: self.policy_utc_offset_hours,
            vasp_id: self.vasp_id.clone(),
            policies_path: self.policies_path.clone(),
            report_dir: self.report_dir.clone(),
            summary_hour: self.summary_hour,
            summary_minute: self.summary_minute,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("AML_ENGINE_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("AML_ENGINE_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("AML_ENGINE_ADMIN_TOKEN") {
            self.admin_token = Some(value);
        }
        if let Ok(value) = env::var("AML_ENGINE_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("AML_ENGINE_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("AML_ENGINE_CTR_THRESHOLD") {
            self.ctr_threshold = value.parse().unwrap_or(self.ctr_threshold);
        }
        if let Ok(value) = env::var("AML_ENGINE_TRAVEL_RULE_THRESHOLD") {
            self.travel_rule_threshold = value.parse().unwrap_or(self.travel_rule_threshold);
        }
        if let Ok(value) = env::var("AML_ENGINE_MAX_HOURLY_TRANSACTIONS") {
            self.max_hourly_transactions = value.parse().unwrap_or(self.max_hourly_transactions);
        }
        if let Ok(value) = env::var("AML_ENGINE_STR_PATTERN_DAYS") {
            self.str_pattern_days = value.parse().unwrap_or(self.str_pattern_days);
        }
        if let Ok(value) = env::var("AML_ENGINE_STR_PATTERN_COUNT") {
            self.str_pattern_count = value.parse().unwrap_or(self.str_pattern_count);
        }
        if let Ok(value) = env::var("AML_ENGINE_BLOCK_RISK_SCORE") {
            self.block_risk_score = value.parse().unwrap_or(self.block_risk_score);
        }
        if let Ok(value) = env::var("AML_ENGINE_POLICY_UTC_OFFSET_HOURS") {
            self.policy_utc_offset_hours = value.parse().unwrap_or(self.policy_utc_offset_hours);
        }
        if let Ok(value) = env::var("AML_ENGINE_ANCHOR_URL") {
            self.anchor_url = Some(value);
        }
        if let Ok(value) = env::var("AML_ENGINE_AUDIT_LOG_PATH") {
            self.audit_log_path = Some(value);
        }
        if let Ok(value) = env::var("AML_ENGINE_VASP_ID") {
            self.vasp_id = value;
        }
        if let Ok(value) = env::var("AML_ENGINE_SANCTIONS_LIST_PATH") {
            self.sanctions_list_path = Some(value);
        }
        if let Ok(value) = env::var("AML_ENGINE_MERCHANTS_PATH") {
            self.merchants_path = Some(value);
        }
        if let Ok(value) = env::var("AML_ENGINE_POLICIES_PATH") {
            self.policies_path = Some(value);
        }
        if let Ok(value) = env::var("AML_ENGINE_REPORT_DIR") {
            self.report_dir = value;
        }
        if let Ok(value) = env::var("AML_ENGINE_SUMMARY_HOUR") {
            self.summary_hour = value.parse().unwrap_or(self.summary_hour);
        }
        if let Ok(value) = env::var("AML_ENGINE_SUMMARY_MINUTE") {
            self.summary_minute = value.parse().unwrap_or(self.summary_minute);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().expect("defaults validate");
        let runtime = config.to_runtime_config();
        assert_eq!(runtime.thresholds.ctr_threshold, 10_000_000);
        assert_eq!(runtime.thresholds.str_pattern_count, 5);
        assert_eq!(runtime.policy_utc_offset_hours, 9);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut config = AppConfig::parse(
            r#"
bind_addr = "0.0.0.0:8080"
ctr_threshold = 5000000
admin_token = "  "
policies_path = "policies.yaml"
"#,
        )
        .expect("parse");
        config.resolve_paths(Some(Path::new("/etc/aml")));
        config.normalize();
        config.validate().expect("valid");
        assert_eq!(config.ctr_threshold, 5_000_000);
        assert_eq!(config.travel_rule_threshold, 1_000_000);
        assert!(config.admin_token.is_none());
        assert_eq!(config.policies_path.as_deref(), Some("/etc/aml/policies.yaml"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = AppConfig::default();
        config.high_risk_score = 20.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.str_pattern_count = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.bind_addr = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }
}
