pub mod context;
pub mod lifecycle;

pub use context::{in_memory_repositories, AppContext};
pub use lifecycle::{build_router_with_layers, run_standalone};
