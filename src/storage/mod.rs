mod file_storage;
mod memory;
mod models;

pub use file_storage::{DocumentStore, FileVault, Result, StorageError};
pub use memory::MemoryVault;
pub use models::*;
