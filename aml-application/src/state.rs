use std::sync::Arc;

use aml_domain::ports::{
    AlertRepository, AnchorService, AuditLog, ConfigRepository, MerchantRepository, PolicyRepository,
    ReportRepository, RiskProfileRepository, SanctionsList, TransactionRepository, TravelRuleRepository,
    UsageRepository,
};
use aml_domain::{utc_offset, RuntimeConfig};

use crate::components::{
    CaseManager, MonitorSettings, PolicyEngine, PolicyStoreConfig, ReportGenerator, TransactionMonitor,
    TravelRuleRecorder,
};
use crate::ops::AuditRecorder;
use crate::Metrics;

#[derive(Clone)]
pub struct Repositories {
    pub transactions: Arc<dyn TransactionRepository>,
    pub alerts: Arc<dyn AlertRepository>,
    pub profiles: Arc<dyn RiskProfileRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub travel_rules: Arc<dyn TravelRuleRepository>,
    pub policies: Arc<dyn PolicyRepository>,
    pub merchants: Arc<dyn MerchantRepository>,
    pub usage: Arc<dyn UsageRepository>,
    pub config: Arc<dyn ConfigRepository>,
}

#[derive(Clone)]
pub struct Collaborators {
    pub audit_log: Arc<dyn AuditLog>,
    pub anchor: Arc<dyn AnchorService>,
    pub sanctions: Arc<dyn SanctionsList>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub monitor: Arc<TransactionMonitor>,
    pub cases: Arc<CaseManager>,
    pub reports: Arc<ReportGenerator>,
    pub travel_rule: Arc<TravelRuleRecorder>,
    pub policy_engine: Arc<PolicyEngine>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn assemble(config: RuntimeConfig, repos: Repositories, collaborators: Collaborators) -> Self {
        let metrics = Arc::new(Metrics::default());
        let audit = AuditRecorder::new(collaborators.audit_log, metrics.clone());
        let offset = utc_offset(config.policy_utc_offset_hours);

        let travel_rule = Arc::new(TravelRuleRecorder::new(
            repos.travel_rules.clone(),
            audit.clone(),
            config.vasp_id.clone(),
        ));
        let cases = Arc::new(CaseManager::new(
            repos.alerts.clone(),
            repos.profiles.clone(),
            audit.clone(),
        ));
        let monitor = Arc::new(TransactionMonitor::new(
            MonitorSettings {
                thresholds: config.thresholds,
                risk_bands: config.risk_bands,
                profile_score_dampening: config.profile_score_dampening,
                utc_offset: offset,
            },
            repos.transactions.clone(),
            repos.alerts.clone(),
            repos.profiles.clone(),
            collaborators.sanctions,
            travel_rule.clone(),
            audit.clone(),
            metrics.clone(),
        ));
        let reports = Arc::new(ReportGenerator::new(
            repos.alerts.clone(),
            repos.transactions.clone(),
            repos.reports.clone(),
            collaborators.anchor,
            cases.clone(),
            audit.clone(),
            metrics.clone(),
        ));
        let policy_engine = Arc::new(PolicyEngine::new(
            PolicyStoreConfig {
                policies_path: config.policies_path.clone(),
                utc_offset: offset,
            },
            repos.policies,
            repos.merchants,
            repos.usage,
            repos.config,
            audit,
            metrics.clone(),
        ));

        Self {
            config,
            monitor,
            cases,
            reports,
            travel_rule,
            policy_engine,
            metrics,
        }
    }
}
