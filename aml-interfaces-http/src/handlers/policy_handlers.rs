use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use aml_application::commands::policy_commands;
use aml_application::dtos::{
    ChangePolicyStatusRequest, CreatePolicyRequest, UpdatePolicyRequest, ValidateTransactionRequest,
};
use aml_application::queries::policy_queries;
use aml_application::AppState;
use aml_domain::{Policy, PolicyDecision};

use crate::error::HttpError;
use crate::middleware::{authorize, authorize_admin};

pub async fn validate_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ValidateTransactionRequest>,
) -> Result<Json<PolicyDecision>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let decision = policy_queries::validate_transaction(&state, payload).await?;
    Ok(Json(decision))
}

pub async fn list_policies(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Policy>>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let policies = policy_queries::list_policies(&state).await?;
    Ok(Json(policies))
}

pub async fn get_policy(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(policy_id): Path<String>,
) -> Result<Json<Policy>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let policy = policy_queries::get_policy(&state, &policy_id).await?;
    Ok(Json(policy))
}

pub async fn create_policy(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePolicyRequest>,
) -> Result<(StatusCode, Json<Policy>), HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let policy = policy_commands::create_policy(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(policy)))
}

pub async fn update_policy(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(policy_id): Path<String>,
    Json(payload): Json<UpdatePolicyRequest>,
) -> Result<Json<Policy>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let policy = policy_commands::update_policy(&state, &policy_id, payload).await?;
    Ok(Json(policy))
}

pub async fn change_policy_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(policy_id): Path<String>,
    Json(payload): Json<ChangePolicyStatusRequest>,
) -> Result<Json<Policy>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let policy = policy_commands::change_policy_status(&state, &policy_id, payload).await?;
    Ok(Json(policy))
}
