//! Paginated list results.

use serde::{Deserialize, Serialize};

/// Pagination block of the API envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Items across all pages.
    #[serde(default)]
    pub total: u64,
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page size.
    #[serde(default)]
    pub limit: u32,
    /// Number of pages.
    #[serde(default)]
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

/// Normalized list shape handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Items across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Number of pages; zero for an empty result.
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Empty first page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: 1,
            limit: 0,
            total_pages: 0,
        }
    }

    /// Builds a page from envelope parts.
    ///
    /// Without a pagination block the whole list is treated as one page.
    #[must_use]
    pub fn from_parts(data: Vec<T>, pagination: Option<Pagination>) -> Self {
        match pagination {
            Some(p) => Self {
                data,
                total: p.total,
                page: p.page,
                limit: p.limit,
                total_pages: p.total_pages,
            },
            None => {
                let len = u32::try_from(data.len()).unwrap_or(u32::MAX);
                Self {
                    total: u64::from(len),
                    page: 1,
                    limit: len,
                    total_pages: u32::from(len > 0),
                    data,
                }
            }
        }
    }

    /// True when this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True when a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
