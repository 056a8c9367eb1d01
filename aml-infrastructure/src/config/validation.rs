use anyhow::{anyhow, Result};

pub fn validate_positive(field: &str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(anyhow!("{} must be greater than 0", field));
    }
    Ok(())
}

pub fn validate_open_ratio(field: &str, value: f64) -> Result<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(anyhow!("{} must be within (0, 1), got {}", field, value));
    }
    Ok(())
}

/// Band cut-offs must be strictly increasing.
pub fn validate_risk_bands(medium: f64, high: f64, critical: f64) -> Result<()> {
    if !(medium > 0.0 && medium < high && high < critical) {
        return Err(anyhow!(
            "risk bands must increase: medium {} < high {} < critical {}",
            medium,
            high,
            critical
        ));
    }
    Ok(())
}

pub fn validate_utc_offset(hours: i32) -> Result<()> {
    if !(-12..=14).contains(&hours) {
        return Err(anyhow!("policy_utc_offset_hours {} is out of range", hours));
    }
    Ok(())
}

pub fn validate_clock(hour: u32, minute: u32) -> Result<()> {
    if hour > 23 || minute > 59 {
        return Err(anyhow!("summary_hour or summary_minute out of range"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_must_strictly_increase() {
        assert!(validate_risk_bands(30.0, 60.0, 85.0).is_ok());
        assert!(validate_risk_bands(30.0, 30.0, 85.0).is_err());
        assert!(validate_risk_bands(0.0, 60.0, 85.0).is_err());
    }

    #[test]
    fn ratio_bounds_are_exclusive() {
        assert!(validate_open_ratio("structuring_band_ratio", 0.7).is_ok());
        assert!(validate_open_ratio("structuring_band_ratio", 1.0).is_err());
        assert!(validate_open_ratio("structuring_band_ratio", 0.0).is_err());
    }

    #[test]
    fn offset_and_clock_ranges() {
        assert!(validate_utc_offset(9).is_ok());
        assert!(validate_utc_offset(15).is_err());
        assert!(validate_clock(23, 59).is_ok());
        assert!(validate_clock(24, 0).is_err());
    }
}
