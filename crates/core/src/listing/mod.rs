//! Listing module
//!
//! Paginated task listings served through the read-through cache, and the
//! invalidation that keeps them fresh after writes.

mod invalidation;
mod query;
mod service;

pub use invalidation::InvalidationService;
pub use query::{ListingQuery, ListingResult, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use service::ListingService;
