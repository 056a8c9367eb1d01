use std::collections::BTreeMap;

use aml_domain::AlertStatus;
use chrono::Utc;

use crate::dtos::ComplianceSnapshot;
use crate::AppError;
use crate::AppState;

/// Counts behind the daily compliance summary.
pub async fn compliance_snapshot(state: &AppState) -> Result<ComplianceSnapshot, AppError> {
    let open = state
        .cases
        .alerts_with_status(&[AlertStatus::Open, AlertStatus::UnderReview, AlertStatus::Escalated])
        .await?;
    let reports = state.reports.list_reports().await?;

    let mut open_by_severity = BTreeMap::new();
    let mut open_by_status = BTreeMap::new();
    for alert in &open {
        *open_by_severity
            .entry(alert.severity.as_str().to_string())
            .or_insert(0) += 1;
        *open_by_status
            .entry(alert.status.as_str().to_string())
            .or_insert(0) += 1;
    }
    let mut reports_by_status = BTreeMap::new();
    for report in &reports {
        *reports_by_status
            .entry(report.status.as_str().to_string())
            .or_insert(0) += 1;
    }

    Ok(ComplianceSnapshot {
        generated_at: Utc::now(),
        open_alerts: open.len(),
        open_by_severity,
        open_by_status,
        reports_by_status,
        oldest_open_alert_at: open.iter().map(|alert| alert.created_at).min(),
        monitored_transactions: state.metrics.monitored_transactions(),
        blocked_transactions: state.metrics.blocked_transactions(),
    })
}
