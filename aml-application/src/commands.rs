pub mod case_commands;
pub mod payment_commands;
pub mod policy_commands;
pub mod report_commands;
pub mod travel_rule_commands;
