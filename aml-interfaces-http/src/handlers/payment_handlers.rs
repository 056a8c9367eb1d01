use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use aml_application::commands::payment_commands;
use aml_application::dtos::{AuthorizationView, AuthorizePaymentRequest, MonitorOutcome, MonitorView};
use aml_application::AppState;
use aml_domain::MonitoredTransaction;

use crate::error::HttpError;
use crate::middleware::{authorize, authorize_admin};

/// Payment-facing monitor call. Alert evidence stays internal.
pub async fn monitor_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<MonitoredTransaction>,
) -> Result<Json<MonitorView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let outcome = payment_commands::monitor_transaction(&state, payload).await?;
    Ok(Json(MonitorView::from(&outcome)))
}

/// Operator variant returning full alerts and the travel rule record.
pub async fn monitor_transaction_detailed(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<MonitoredTransaction>,
) -> Result<Json<MonitorOutcome>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let outcome = payment_commands::monitor_transaction(&state, payload).await?;
    Ok(Json(outcome))
}

pub async fn authorize_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AuthorizePaymentRequest>,
) -> Result<Json<AuthorizationView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let outcome = payment_commands::authorize_payment(&state, payload).await?;
    Ok(Json(AuthorizationView::from(&outcome)))
}
