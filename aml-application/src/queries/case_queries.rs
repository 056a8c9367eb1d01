use tracing::error;

use crate::AppError;
use crate::AppState;
use aml_domain::{AmlAlert, CustomerRiskProfile};

pub async fn list_open_alerts(state: &AppState) -> Result<Vec<AmlAlert>, AppError> {
    state.cases.open_alerts().await.map_err(|err| {
        error!("failed to list open alerts: {}", err);
        err
    })
}

pub async fn get_alert(state: &AppState, alert_id: &str) -> Result<AmlAlert, AppError> {
    state
        .cases
        .get_alert(alert_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("alert '{}'", alert_id)))
}

pub async fn list_subject_alerts(state: &AppState, subject_id: &str) -> Result<Vec<AmlAlert>, AppError> {
    state.cases.subject_alerts(subject_id).await
}

pub async fn get_profile(state: &AppState, subject_id: &str) -> Result<CustomerRiskProfile, AppError> {
    state
        .cases
        .profile(subject_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("risk profile '{}'", subject_id)))
}
