use crate::dtos::{AcknowledgeStrRequest, GenerateStrRequest, SubmitStrRequest, TransitionResult};
use crate::AppError;
use crate::AppState;
use aml_domain::SuspiciousTransactionReport;

pub async fn generate_str(
    state: &AppState,
    request: GenerateStrRequest,
) -> Result<SuspiciousTransactionReport, AppError> {
    state.reports.generate_str(request).await
}

pub async fn submit_str(
    state: &AppState,
    report_id: &str,
    request: SubmitStrRequest,
) -> Result<TransitionResult, AppError> {
    let submitted_by = request.submitted_by.trim();
    if submitted_by.is_empty() {
        return Err(AppError::BadRequest("submitted_by is required".to_string()));
    }
    let applied = state.reports.submit_str(report_id, submitted_by).await?;
    Ok(TransitionResult { applied })
}

pub async fn acknowledge_str(
    state: &AppState,
    report_id: &str,
    request: AcknowledgeStrRequest,
) -> Result<TransitionResult, AppError> {
    let fiu_reference = request
        .fiu_reference
        .map(|reference| reference.trim().to_string())
        .filter(|reference| !reference.is_empty());
    let applied = state
        .reports
        .acknowledge_str(report_id, fiu_reference, request.actor_id.trim())
        .await?;
    Ok(TransitionResult { applied })
}
