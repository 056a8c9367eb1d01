// Domain entities

pub mod alert;
pub mod audit;
pub mod policy;
pub mod report;
pub mod risk_profile;
pub mod runtime_config;
pub mod transaction;
pub mod travel_rule;

pub use alert::*;
pub use audit::*;
pub use policy::*;
pub use report::*;
pub use risk_profile::*;
pub use runtime_config::*;
pub use transaction::*;
pub use travel_rule::*;
