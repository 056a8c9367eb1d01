use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use aml_application::dtos::ComplianceSnapshot;
use aml_application::queries::summary_queries;
use aml_application::AppState;

use crate::error::HttpError;
use crate::middleware::{authorize, authorize_admin};

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn compliance_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ComplianceSnapshot>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let snapshot = summary_queries::compliance_snapshot(&state).await?;
    Ok(Json(snapshot))
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}
