use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use aml_application::commands::case_commands;
use aml_application::dtos::{AlertTransitionRequest, OnboardProfileRequest, ResolveAlertRequest, TransitionResult};
use aml_application::queries::case_queries;
use aml_application::AppState;
use aml_domain::{AmlAlert, CustomerRiskProfile};

use crate::error::HttpError;
use crate::middleware::authorize_admin;

pub async fn list_open_alerts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AmlAlert>>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let alerts = case_queries::list_open_alerts(&state).await?;
    Ok(Json(alerts))
}

pub async fn get_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(alert_id): Path<String>,
) -> Result<Json<AmlAlert>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let alert = case_queries::get_alert(&state, &alert_id).await?;
    Ok(Json(alert))
}

pub async fn resolve_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(alert_id): Path<String>,
    Json(payload): Json<ResolveAlertRequest>,
) -> Result<Json<TransitionResult>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let result = case_commands::resolve_alert(&state, &alert_id, payload).await?;
    Ok(Json(result))
}

pub async fn start_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(alert_id): Path<String>,
    Json(payload): Json<AlertTransitionRequest>,
) -> Result<Json<TransitionResult>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let result = case_commands::start_review(&state, &alert_id, payload).await?;
    Ok(Json(result))
}

pub async fn escalate_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(alert_id): Path<String>,
    Json(payload): Json<AlertTransitionRequest>,
) -> Result<Json<TransitionResult>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let result = case_commands::escalate_alert(&state, &alert_id, payload).await?;
    Ok(Json(result))
}

pub async fn clear_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(alert_id): Path<String>,
    Json(payload): Json<AlertTransitionRequest>,
) -> Result<Json<TransitionResult>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let result = case_commands::clear_alert(&state, &alert_id, payload).await?;
    Ok(Json(result))
}

pub async fn list_subject_alerts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(subject_id): Path<String>,
) -> Result<Json<Vec<AmlAlert>>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let alerts = case_queries::list_subject_alerts(&state, &subject_id).await?;
    Ok(Json(alerts))
}

pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(subject_id): Path<String>,
) -> Result<Json<CustomerRiskProfile>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let profile = case_queries::get_profile(&state, &subject_id).await?;
    Ok(Json(profile))
}

pub async fn onboard_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<OnboardProfileRequest>,
) -> Result<(StatusCode, Json<CustomerRiskProfile>), HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let profile = case_commands::onboard_profile(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}
