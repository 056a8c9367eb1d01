// AML Engine Application Layer

pub mod commands;
pub mod components;
pub mod dtos;
pub mod error;
pub mod metrics;
pub mod ops;
pub mod queries;
pub mod state;

pub use error::AppError;
pub use metrics::Metrics;
pub use state::{AppState, Collaborators, Repositories};
