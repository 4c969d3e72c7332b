//! Task module
//!
//! This module contains task-related types and the storage adapters.

mod file_store;
mod memory_store;
mod model;
mod repository;
mod table;

pub use file_store::FileTaskStore;
pub use memory_store::MemoryTaskStore;
pub use model::*;
pub use repository::TaskRepository;
