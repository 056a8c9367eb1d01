use crate::AppError;
use crate::AppState;
use aml_domain::TravelRuleRecord;

pub async fn get_travel_rule_record(
    state: &AppState,
    transaction_id: &str,
) -> Result<TravelRuleRecord, AppError> {
    state
        .travel_rule
        .find(transaction_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("travel rule record for '{}'", transaction_id)))
}
