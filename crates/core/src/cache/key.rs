//! Cache key scheme for task listings
//!
//! Keys have the shape `tasks:{owner}:{page}:{page_size}:{status}` where the
//! status segment is `all` when no filter is set. The leading
//! `tasks:{owner}:` segment is the owner prefix used by invalidation.

use std::fmt;

use uuid::Uuid;

use crate::listing::ListingQuery;

/// Namespace shared by every task listing key
pub const LISTING_NAMESPACE: &str = "tasks";

/// Status segment used when the query has no filter
pub const ALL_STATUSES: &str = "all";

/// Key under which one listing query is cached
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingKey(String);

impl ListingKey {
    pub fn for_query(query: &ListingQuery) -> Self {
        let status = query.status().map_or(ALL_STATUSES, |s| s.as_str());
        Self(format!(
            "{}{}:{}:{}",
            OwnerPrefix::new(query.owner()).as_str(),
            query.page(),
            query.page_size(),
            status
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prefix shared by all listing keys of one owner
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerPrefix(String);

impl OwnerPrefix {
    pub fn new(owner: Uuid) -> Self {
        // Hyphenated UUIDs contain no ':' or glob metacharacters, so one
        // owner's prefix never matches another owner's keys.
        Self(format!("{}:{}:", LISTING_NAMESPACE, owner.hyphenated()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Glob pattern enumerating every key under this prefix
    pub fn pattern(&self) -> String {
        format!("{}*", self.0)
    }

    pub fn matches(&self, key: &str) -> bool {
        key.starts_with(&self.0)
    }
}

impl fmt::Display for OwnerPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
