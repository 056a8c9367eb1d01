use crate::dtos::ValidateTransactionRequest;
use crate::AppError;
use crate::AppState;
use aml_domain::{Policy, PolicyDecision};

pub async fn validate_transaction(
    state: &AppState,
    request: ValidateTransactionRequest,
) -> Result<PolicyDecision, AppError> {
    state.policy_engine.validate_transaction(&request).await
}

pub async fn list_policies(state: &AppState) -> Result<Vec<Policy>, AppError> {
    state.policy_engine.list_policies().await
}

pub async fn get_policy(state: &AppState, policy_id: &str) -> Result<Policy, AppError> {
    state
        .policy_engine
        .get_policy(policy_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("policy '{}'", policy_id)))
}
