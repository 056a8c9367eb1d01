pub mod anchor_service;
pub mod audit_log;
pub mod sanctions;
pub mod summary_service;

pub use anchor_service::*;
pub use audit_log::*;
pub use sanctions::*;
pub use summary_service::*;
