use std::sync::Arc;

use aml_domain::ports::TravelRuleRepository;
use aml_domain::{
    ActorType, AuditAction, AuditEntry, MonitoredTransaction, Party, TravelRuleParty, TravelRuleRecord,
};
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::dtos::RecordTravelRuleRequest;
use crate::ops::AuditRecorder;
use crate::AppError;

pub struct TravelRuleRecorder {
    records: Arc<dyn TravelRuleRepository>,
    audit: AuditRecorder,
    vasp_id: String,
}

impl TravelRuleRecorder {
    pub fn new(records: Arc<dyn TravelRuleRepository>, audit: AuditRecorder, vasp_id: impl Into<String>) -> Self {
        Self {
            records,
            audit,
            vasp_id: vasp_id.into(),
        }
    }

    /// One record per transaction; a repeated call returns the stored record.
    pub async fn record(&self, request: RecordTravelRuleRequest) -> Result<TravelRuleRecord, AppError> {
        let transaction_id = request.transaction_id.trim();
        if transaction_id.is_empty() {
            return Err(AppError::BadRequest("transaction_id is required".to_string()));
        }
        if request.amount <= 0 {
            return Err(AppError::BadRequest("amount must be positive".to_string()));
        }
        if request.originator_vasp.trim().is_empty() {
            return Err(AppError::BadRequest("originator_vasp is required".to_string()));
        }
        if let Some(existing) = self.records.find_by_transaction(transaction_id).await? {
            return Ok(existing);
        }

        let record = TravelRuleRecord::new(
            transaction_id,
            request.amount,
            request.originator,
            request.beneficiary,
            request.originator_vasp.trim(),
            request.beneficiary_vasp,
            Utc::now(),
        );
        self.records.insert(&record).await?;
        info!(
            transaction_id = %record.transaction_id,
            status = ?record.status,
            "travel rule record created"
        );
        self.audit
            .record(AuditEntry::new(
                AuditAction::TravelRuleRecorded,
                "system",
                ActorType::System,
                "TRAVEL_RULE_RECORD",
                record.id.clone(),
                json!({
                    "transaction_id": record.transaction_id,
                    "amount": record.amount,
                    "status": record.status,
                    "beneficiary_vasp": record.beneficiary_vasp,
                }),
            ))
            .await;
        Ok(record)
    }

    /// Builds the disclosure bundle from the monitored parties, with this VASP as originator.
    pub async fn record_for_transaction(
        &self,
        transaction: &MonitoredTransaction,
    ) -> Result<TravelRuleRecord, AppError> {
        self.record(RecordTravelRuleRequest {
            transaction_id: transaction.id.clone(),
            amount: transaction.amount,
            originator: disclosure_party(&transaction.sender),
            beneficiary: disclosure_party(&transaction.recipient),
            originator_vasp: self.vasp_id.clone(),
            beneficiary_vasp: transaction.beneficiary_vasp.clone(),
        })
        .await
    }

    pub async fn find(&self, transaction_id: &str) -> Result<Option<TravelRuleRecord>, AppError> {
        Ok(self.records.find_by_transaction(transaction_id).await?)
    }
}

fn disclosure_party(party: &Party) -> TravelRuleParty {
    TravelRuleParty {
        name: party.name.clone().unwrap_or_else(|| party.id.clone()),
        account_id: party.account.clone().unwrap_or_else(|| party.id.clone()),
        national_id: None,
        address: None,
        date_of_birth: None,
    }
}
