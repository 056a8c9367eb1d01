use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use aml_application::commands::report_commands;
use aml_application::dtos::{AcknowledgeStrRequest, GenerateStrRequest, SubmitStrRequest, TransitionResult};
use aml_application::queries::report_queries;
use aml_application::AppState;
use aml_domain::SuspiciousTransactionReport;

use crate::error::HttpError;
use crate::middleware::authorize_admin;

pub async fn generate_str(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<GenerateStrRequest>,
) -> Result<(StatusCode, Json<SuspiciousTransactionReport>), HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let report = report_commands::generate_str(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn list_reports(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SuspiciousTransactionReport>>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let reports = report_queries::list_reports(&state).await?;
    Ok(Json(reports))
}

pub async fn get_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(report_id): Path<String>,
) -> Result<Json<SuspiciousTransactionReport>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let report = report_queries::get_report(&state, &report_id).await?;
    Ok(Json(report))
}

pub async fn submit_str(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(report_id): Path<String>,
    Json(payload): Json<SubmitStrRequest>,
) -> Result<Json<TransitionResult>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let result = report_commands::submit_str(&state, &report_id, payload).await?;
    Ok(Json(result))
}

pub async fn acknowledge_str(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(report_id): Path<String>,
    Json(payload): Json<AcknowledgeStrRequest>,
) -> Result<Json<TransitionResult>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let result = report_commands::acknowledge_str(&state, &report_id, payload).await?;
    Ok(Json(result))
}
