use crate::dtos::{AlertTransitionRequest, OnboardProfileRequest, ResolveAlertRequest, TransitionResult};
use crate::AppError;
use crate::AppState;
use aml_domain::CustomerRiskProfile;

pub async fn resolve_alert(
    state: &AppState,
    alert_id: &str,
    request: ResolveAlertRequest,
) -> Result<TransitionResult, AppError> {
    if request.resolved_by.trim().is_empty() {
        return Err(AppError::BadRequest("resolved_by is required".to_string()));
    }
    let applied = state
        .cases
        .resolve(alert_id, request.decision, &request.notes, request.resolved_by.trim())
        .await?;
    Ok(TransitionResult { applied })
}

pub async fn start_review(
    state: &AppState,
    alert_id: &str,
    request: AlertTransitionRequest,
) -> Result<TransitionResult, AppError> {
    let actor_id = required_actor(&request)?;
    let applied = state.cases.start_review(alert_id, actor_id).await?;
    Ok(TransitionResult { applied })
}

pub async fn escalate_alert(
    state: &AppState,
    alert_id: &str,
    request: AlertTransitionRequest,
) -> Result<TransitionResult, AppError> {
    let actor_id = required_actor(&request)?;
    let applied = state.cases.escalate(alert_id, actor_id).await?;
    Ok(TransitionResult { applied })
}

pub async fn clear_alert(
    state: &AppState,
    alert_id: &str,
    request: AlertTransitionRequest,
) -> Result<TransitionResult, AppError> {
    let actor_id = required_actor(&request)?;
    let applied = state.cases.clear(alert_id, actor_id).await?;
    Ok(TransitionResult { applied })
}

pub async fn onboard_profile(
    state: &AppState,
    request: OnboardProfileRequest,
) -> Result<CustomerRiskProfile, AppError> {
    state
        .cases
        .onboard_profile(&request.subject_id, request.subject_type, request.kyc_status)
        .await
}

fn required_actor(request: &AlertTransitionRequest) -> Result<&str, AppError> {
    let actor_id = request.actor_id.trim();
    if actor_id.is_empty() {
        return Err(AppError::BadRequest("actor_id is required".to_string()));
    }
    Ok(actor_id)
}
