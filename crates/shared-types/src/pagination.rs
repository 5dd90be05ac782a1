//! Page-based listing shared by the change log and the gateway.

use serde::{Deserialize, Serialize};

use crate::errors::SharedError;

pub const DEFAULT_PER_PAGE: u32 = 25;
pub const MAX_PER_PAGE: u32 = 100;

/// A validated page request. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Result<Self, SharedError> {
        if page == 0 {
            return Err(SharedError::InvalidPage {
                reason: "page must be >= 1".into(),
            });
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(SharedError::InvalidPage {
                reason: format!("per_page must be between 1 and {}", MAX_PER_PAGE),
            });
        }
        Ok(Self { page, per_page })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.per_page as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Slice `all` (already in display order) according to `request`.
    pub fn from_ordered<I>(all: I, total_count: usize, request: PageRequest) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.per_page() as usize)
            .collect();
        Self {
            items,
            page: request.page(),
            per_page: request.per_page(),
            total_count: total_count as u64,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_count: self.total_count,
        }
    }
}
