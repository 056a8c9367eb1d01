// In-memory stores behind the domain repository ports

pub mod alerts;
pub mod policies;
pub mod profiles;
pub mod reports;
pub mod transactions;
pub mod travel_rules;
pub mod usage;

pub use alerts::InMemoryAlertRepository;
pub use policies::{InMemoryMerchantRepository, InMemoryPolicyRepository};
pub use profiles::InMemoryRiskProfileRepository;
pub use reports::InMemoryReportRepository;
pub use transactions::InMemoryTransactionRepository;
pub use travel_rules::InMemoryTravelRuleRepository;
pub use usage::InMemoryUsageRepository;
