pub mod policy_evaluator;
pub mod risk_rules;

pub use policy_evaluator::*;
pub use risk_rules::*;
