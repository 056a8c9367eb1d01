use crate::dtos::{AuthorizationOutcome, AuthorizePaymentRequest, MonitorOutcome, ValidateTransactionRequest};
use crate::AppError;
use crate::AppState;
use aml_domain::MonitoredTransaction;
use tracing::info;

pub async fn monitor_transaction(
    state: &AppState,
    transaction: MonitoredTransaction,
) -> Result<MonitorOutcome, AppError> {
    state.monitor.monitor(transaction).await
}

/// Runs the monitor and the policy engine for one payment. Both must allow it.
///
/// Payments from one user are serialized so the usage caps see every earlier charge.
pub async fn authorize_payment(
    state: &AppState,
    request: AuthorizePaymentRequest,
) -> Result<AuthorizationOutcome, AppError> {
    let transaction = request.transaction;
    transaction.validate()?;
    let user_id = transaction.sender.id.clone();
    let amount = transaction.amount;
    let at = transaction.timestamp;

    let _usage_guard = state.policy_engine.lock_usage(&user_id).await;
    let policy = state
        .policy_engine
        .validate_transaction(&ValidateTransactionRequest {
            user_id: user_id.clone(),
            merchant_id: transaction.recipient.id.clone(),
            amount,
            timestamp: Some(at),
            user_credentials: request.user_credentials,
        })
        .await?;
    let monitor = state.monitor.monitor(transaction).await?;

    let allowed = monitor.allowed && policy.allowed;
    let charged_amount = policy.modified_amount.unwrap_or(amount);
    if allowed {
        state
            .policy_engine
            .record_usage(&user_id, charged_amount, at)
            .await?;
    }
    info!(
        transaction_id = %monitor.transaction_id,
        allowed,
        charged_amount,
        "payment authorization decided"
    );

    Ok(AuthorizationOutcome {
        allowed,
        monitor,
        policy,
        charged_amount,
    })
}
