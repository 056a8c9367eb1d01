// Domain value objects
pub mod alert_type;
pub mod identifiers;
pub mod risk_flag;
pub mod risk_level;

pub use alert_type::*;
pub use identifiers::*;
pub use risk_flag::*;
pub use risk_level::*;
