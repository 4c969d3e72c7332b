//! Listing query and result types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::{Task, TaskStatus};
use crate::{Error, Result};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// One owner's filtered, paginated view of their tasks.
///
/// Construction validates every field, so a `ListingQuery` that exists is
/// always safe to turn into a cache key and a store query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListingQuery {
    owner: Uuid,
    status: Option<TaskStatus>,
    page: u64,
    page_size: u64,
}

impl ListingQuery {
    /// Build a query from typed values.
    ///
    /// `page` and `page_size` must be at least 1. Page sizes above
    /// [`MAX_PAGE_SIZE`] are clamped.
    pub fn new(owner: Uuid, status: Option<TaskStatus>, page: u64, page_size: u64) -> Result<Self> {
        if page < 1 {
            return Err(Error::InvalidInput("Page must be at least 1".to_string()));
        }
        if page_size < 1 {
            return Err(Error::InvalidInput("Limit must be at least 1".to_string()));
        }
        Ok(Self {
            owner,
            status,
            page,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    /// Build a query from raw request input, applying defaults.
    ///
    /// An empty status string counts as no filter.
    pub fn parse(
        owner: Uuid,
        status: Option<&str>,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<Self> {
        let status = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<TaskStatus>)
            .transpose()?;
        Self::new(
            owner,
            status,
            page.unwrap_or(DEFAULT_PAGE),
            page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of records before this page
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// A page of tasks plus the totals needed to paginate.
///
/// This is the exact payload returned to clients, whether it was read from
/// the cache or computed from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResult {
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
    pub tasks: Vec<Task>,
}

impl ListingResult {
    pub fn assemble(query: &ListingQuery, total: u64, tasks: Vec<Task>) -> Self {
        Self {
            total,
            page: query.page(),
            total_pages: total.div_ceil(query.page_size()),
            tasks,
        }
    }
}
