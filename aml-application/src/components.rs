pub mod cases;
pub mod monitor;
pub mod policy_engine;
pub mod reports;
pub mod travel_rule;

pub use cases::CaseManager;
pub use monitor::{MonitorSettings, TransactionMonitor};
pub use policy_engine::{PolicyEngine, PolicyStoreConfig};
pub use reports::ReportGenerator;
pub use travel_rule::TravelRuleRecorder;
