//! Client-side page walking with de-duplication.
//!
//! Infinite-scroll clients request page after page and append the rows.
//! Rows can shift between pages while the client scrolls (new listings push
//! older ones down), so the same row may arrive twice; a stale response can
//! also land after a newer one when a request was superseded. The
//! accumulator drops both.

use std::collections::HashSet;
use std::hash::Hash;

use crate::envelope::Envelope;

/// Rows that carry a stable identity.
pub trait Keyed {
    /// Identity type used for de-duplication.
    type Key: Eq + Hash + Clone;

    /// Stable identity of this row.
    fn key(&self) -> Self::Key;
}

/// Accumulates pages in order, keeping each row once.
pub struct PageAccumulator<T: Keyed> {
    items: Vec<T>,
    seen: HashSet<T::Key>,
    next_page: u32,
    has_more: bool,
}

impl<T: Keyed> Default for PageAccumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> PageAccumulator<T> {
    /// Start before the first page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            next_page: 1,
            has_more: true,
        }
    }

    /// Append a page, returning how many new rows were added.
    ///
    /// Pages other than [`Self::next_page`] are ignored and add nothing.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Envelope, Keyed, PageAccumulator, PageLimits, PageRequest};
    ///
    /// #[derive(Debug, Clone, PartialEq)]
    /// struct Row(u32);
    ///
    /// impl Keyed for Row {
    ///     type Key = u32;
    ///     fn key(&self) -> u32 {
    ///         self.0
    ///     }
    /// }
    ///
    /// let limits = PageLimits::new(2, 10);
    /// let mut feed = PageAccumulator::new();
    /// feed.push_page(Envelope::new(PageRequest::new(1, 2, limits), 3, vec![Row(1), Row(2)]));
    /// let added = feed.push_page(Envelope::new(PageRequest::new(2, 2, limits), 3, vec![Row(2), Row(3)]));
    /// assert_eq!(added, 1);
    /// assert!(!feed.has_more());
    /// ```
    pub fn push_page(&mut self, envelope: Envelope<T>) -> usize {
        if !self.has_more || envelope.page != self.next_page {
            return 0;
        }

        let page_size = usize::try_from(envelope.page_size).unwrap_or(usize::MAX);
        let short_page = envelope.items.len() < page_size;
        let last_page = envelope.is_last_page();
        let before = self.items.len();
        for item in envelope.items {
            if self.seen.insert(item.key()) {
                self.items.push(item);
            }
        }

        self.next_page = self.next_page.saturating_add(1);
        self.has_more = !(short_page || last_page);
        self.items.len() - before
    }

    /// Page number the client should request next.
    #[must_use]
    pub const fn next_page(&self) -> u32 {
        self.next_page
    }

    /// Whether another page may contain rows.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Rows accumulated so far, in arrival order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the accumulator, returning the rows.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Forget everything, for example after the filters changed.
    pub fn reset(&mut self) {
        self.items.clear();
        self.seen.clear();
        self.next_page = 1;
        self.has_more = true;
    }
}
