use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use aml_application::{AppState, Collaborators, Repositories};
use aml_domain::ports::{AnchorService, AuditLog, ConfigRepository};
use aml_domain::RuntimeConfig;
use aml_infrastructure::{
    AppConfig, ConfigFileRepository, DigestAnchorService, HttpAnchorService, InMemoryAlertRepository,
    InMemoryMerchantRepository, InMemoryPolicyRepository, InMemoryReportRepository,
    InMemoryRiskProfileRepository, InMemoryTransactionRepository, InMemoryTravelRuleRepository,
    InMemoryUsageRepository, JsonLinesAuditLog, StaticSanctionsList, TracingAuditLog,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let config_repo = Arc::new(ConfigFileRepository::new());

        let sanctions = match &config.sanctions_list_path {
            Some(path) => config_repo.load_sanctions_list(path).await?,
            None => Vec::new(),
        };
        let sanctions = StaticSanctionsList::new(sanctions);
        info!(entries = sanctions.len(), "sanctions list loaded");

        let audit_log: Arc<dyn AuditLog> = match &config.audit_log_path {
            Some(path) => Arc::new(JsonLinesAuditLog::new(path.clone())),
            None => Arc::new(TracingAuditLog::new()),
        };
        let anchor: Arc<dyn AnchorService> = match &config.anchor_url {
            Some(url) => Arc::new(HttpAnchorService::new(url.clone(), config.anchor_timeout_seconds)?),
            None => {
                warn!("anchor_url not set, report hashes are computed locally");
                Arc::new(DigestAnchorService::new())
            }
        };

        let state = AppState::assemble(
            runtime_config,
            in_memory_repositories(config_repo.clone()),
            Collaborators {
                audit_log,
                anchor,
                sanctions: Arc::new(sanctions),
            },
        );

        if let Some(path) = &config.merchants_path {
            let merchants = config_repo.load_merchants(path).await?;
            let count = merchants.len();
            for merchant in merchants {
                state.policy_engine.upsert_merchant(merchant).await?;
            }
            info!(count, "merchants loaded");
        }
        if let Some(path) = &config.policies_path {
            let policies = config_repo.load_policies(path).await?;
            let loaded = state.policy_engine.seed_policies(policies).await?;
            info!(loaded, "policies loaded");
        }

        Ok(Self { state })
    }

    /// Context with in-memory stores, a local digest anchor and a fixed sanctions list.
    pub fn in_memory<I, S>(config: RuntimeConfig, sanctioned_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let state = AppState::assemble(
            config,
            in_memory_repositories(Arc::new(ConfigFileRepository::new())),
            Collaborators {
                audit_log: Arc::new(TracingAuditLog::new()),
                anchor: Arc::new(DigestAnchorService::new()),
                sanctions: Arc::new(StaticSanctionsList::new(sanctioned_ids)),
            },
        );
        Self { state }
    }
}

/// Fresh in-memory stores. Tests swap single fields for failing doubles.
pub fn in_memory_repositories(config: Arc<ConfigFileRepository>) -> Repositories {
    Repositories {
        transactions: Arc::new(InMemoryTransactionRepository::new()),
        alerts: Arc::new(InMemoryAlertRepository::new()),
        profiles: Arc::new(InMemoryRiskProfileRepository::new()),
        reports: Arc::new(InMemoryReportRepository::new()),
        travel_rules: Arc::new(InMemoryTravelRuleRepository::new()),
        policies: Arc::new(InMemoryPolicyRepository::new()),
        merchants: Arc::new(InMemoryMerchantRepository::new()),
        usage: Arc::new(InMemoryUsageRepository::new()),
        config,
    }
}
