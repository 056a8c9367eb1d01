use crate::AppError;
use crate::AppState;
use aml_domain::SuspiciousTransactionReport;

pub async fn get_report(state: &AppState, report_id: &str) -> Result<SuspiciousTransactionReport, AppError> {
    state
        .reports
        .get_report(report_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("report '{}'", report_id)))
}

pub async fn list_reports(state: &AppState) -> Result<Vec<SuspiciousTransactionReport>, AppError> {
    state.reports.list_reports().await
}
