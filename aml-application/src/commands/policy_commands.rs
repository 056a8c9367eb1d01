use crate::dtos::{ChangePolicyStatusRequest, CreatePolicyRequest, UpdatePolicyRequest};
use crate::AppError;
use crate::AppState;
use aml_domain::Policy;

pub async fn create_policy(state: &AppState, request: CreatePolicyRequest) -> Result<Policy, AppError> {
    if request.actor_id.trim().is_empty() {
        return Err(AppError::BadRequest("actor_id is required".to_string()));
    }
    state.policy_engine.create_policy(request).await
}

pub async fn update_policy(
    state: &AppState,
    policy_id: &str,
    request: UpdatePolicyRequest,
) -> Result<Policy, AppError> {
    if request.actor_id.trim().is_empty() {
        return Err(AppError::BadRequest("actor_id is required".to_string()));
    }
    state.policy_engine.update_policy(policy_id, request).await
}

pub async fn change_policy_status(
    state: &AppState,
    policy_id: &str,
    request: ChangePolicyStatusRequest,
) -> Result<Policy, AppError> {
    if request.actor_id.trim().is_empty() {
        return Err(AppError::BadRequest("actor_id is required".to_string()));
    }
    state.policy_engine.change_status(policy_id, request).await
}
