pub mod case_queries;
pub mod policy_queries;
pub mod report_queries;
pub mod summary_queries;
pub mod travel_rule_queries;
