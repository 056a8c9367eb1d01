use crate::dtos::RecordTravelRuleRequest;
use crate::AppError;
use crate::AppState;
use aml_domain::TravelRuleRecord;

pub async fn record_travel_rule(
    state: &AppState,
    request: RecordTravelRuleRequest,
) -> Result<TravelRuleRecord, AppError> {
    state.travel_rule.record(request).await
}
