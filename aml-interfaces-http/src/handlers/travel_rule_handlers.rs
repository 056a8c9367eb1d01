use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use aml_application::commands::travel_rule_commands;
use aml_application::dtos::RecordTravelRuleRequest;
use aml_application::queries::travel_rule_queries;
use aml_application::AppState;
use aml_domain::TravelRuleRecord;

use crate::error::HttpError;
use crate::middleware::authorize_admin;

pub async fn record_travel_rule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RecordTravelRuleRequest>,
) -> Result<(StatusCode, Json<TravelRuleRecord>), HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let record = travel_rule_commands::record_travel_rule(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_travel_rule_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(transaction_id): Path<String>,
) -> Result<Json<TravelRuleRecord>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let record = travel_rule_queries::get_travel_rule_record(&state, &transaction_id).await?;
    Ok(Json(record))
}
