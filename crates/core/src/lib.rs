//! Core library for Taskboard
//!
//! This crate contains the business logic behind the task API:
//! - Task model and owner-scoped storage
//! - Cache adapters and the listing key scheme
//! - Read-through listing and write invalidation

pub mod cache;
pub mod error;
pub mod listing;
pub mod service;
pub mod task;

#[cfg(test)]
mod test_support;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
