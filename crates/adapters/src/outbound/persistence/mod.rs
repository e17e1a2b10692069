//! Durable credential storage adapters.

pub mod file_store;
pub mod memory;

pub use file_store::*;
pub use memory::*;
