//! Paginated response envelope.

use serde::{Deserialize, Serialize};

use crate::request::PageRequest;

/// Number of pages needed for `total` rows; never less than one.
///
/// # Examples
/// ```
/// use pagination::total_pages;
///
/// assert_eq!(total_pages(0, 24), 1);
/// assert_eq!(total_pages(49, 24), 3);
/// ```
#[must_use]
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size.max(1))).max(1)
}

/// Paginated JSON envelope `{page, pageSize, total, totalPages, items}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// 1-based page number that was served.
    pub page: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Total number of matching rows across all pages.
    pub total: u64,
    /// Total number of pages, at least one.
    pub total_pages: u64,
    /// Rows on this page.
    pub items: Vec<T>,
}

impl<T> Envelope<T> {
    /// Wrap one page of rows.
    #[must_use]
    pub fn new(request: PageRequest, total: u64, items: Vec<T>) -> Self {
        Self {
            page: request.page(),
            page_size: request.page_size(),
            total,
            total_pages: total_pages(total, request.page_size()),
            items,
        }
    }

    /// Transform every row while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Envelope<U>
    where
        F: FnMut(T) -> U,
    {
        Envelope {
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
            items: self.items.into_iter().map(f).collect(),
        }
    }

    /// Whether no further page can contain rows.
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        u64::from(self.page) >= self.total_pages
    }
}
