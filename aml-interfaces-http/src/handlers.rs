pub mod case_handlers;
pub mod ops_handlers;
pub mod payment_handlers;
pub mod policy_handlers;
pub mod report_handlers;
pub mod travel_rule_handlers;

pub use case_handlers::*;
pub use ops_handlers::*;
pub use payment_handlers::*;
pub use policy_handlers::*;
pub use report_handlers::*;
pub use travel_rule_handlers::*;
