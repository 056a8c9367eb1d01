pub mod config_files;
pub mod memory;

pub use config_files::*;
pub use memory::*;
