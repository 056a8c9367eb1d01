pub mod audit;
pub mod keyed_locks;

pub use audit::AuditRecorder;
pub use keyed_locks::KeyedLocks;
