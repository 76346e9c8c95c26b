//! Serving one page out of two independently paginated sources.
//!
//! Each page is split between a primary and a secondary source: the primary
//! receives `ceil(page_size / 2)` slots and the secondary the rest. Once a
//! source runs dry the other fills the remaining slots. Offsets are derived
//! from the two totals in closed form, so pages over a stable dataset
//! partition the union of both sources exactly.

use crate::request::PageRequest;

/// Window into one source: skip `offset` rows, then take `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSlice {
    /// Rows of this source consumed by earlier pages.
    pub offset: u64,
    /// Rows of this source on the requested page.
    pub limit: u64,
}

impl SourceSlice {
    /// Whether the slice selects no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.limit == 0
    }
}

/// Per-source windows for one combined page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitPage {
    /// Window into the primary source.
    pub primary: SourceSlice,
    /// Window into the secondary source.
    pub secondary: SourceSlice,
}

/// Rows of the primary source consumed by the first `pages` pages.
fn primary_consumed(pages: u64, page_size: u64, primary_total: u64, secondary_total: u64) -> u64 {
    let primary_share = page_size.div_ceil(2);
    let combined = primary_total
        .saturating_add(secondary_total)
        .min(pages.saturating_mul(page_size));
    let nominal = pages.saturating_mul(primary_share);
    let spill = combined.saturating_sub(secondary_total);
    primary_total.min(nominal.max(spill))
}

/// Rows of both sources consumed by the first `pages` pages.
fn consumed(pages: u64, page_size: u64, primary_total: u64, secondary_total: u64) -> (u64, u64) {
    let combined = primary_total
        .saturating_add(secondary_total)
        .min(pages.saturating_mul(page_size));
    let primary = primary_consumed(pages, page_size, primary_total, secondary_total);
    (primary, combined.saturating_sub(primary))
}

/// Compute the source windows for `request` given each source's total.
///
/// # Examples
/// ```
/// use pagination::{PageLimits, PageRequest, split_page};
///
/// let limits = PageLimits::new(24, 100);
/// // Services ran out after the first page, so products fill page two.
/// let split = split_page(&PageRequest::new(2, 10, limits), 40, 6);
/// assert_eq!((split.primary.offset, split.primary.limit), (5, 9));
/// assert_eq!((split.secondary.offset, split.secondary.limit), (5, 1));
/// ```
#[must_use]
pub fn split_page(request: &PageRequest, primary_total: u64, secondary_total: u64) -> SplitPage {
    let page_size = u64::from(request.page_size());
    let before = u64::from(request.page().saturating_sub(1));
    let through = u64::from(request.page());

    let (primary_start, secondary_start) =
        consumed(before, page_size, primary_total, secondary_total);
    let (primary_end, secondary_end) = consumed(through, page_size, primary_total, secondary_total);

    SplitPage {
        primary: SourceSlice {
            offset: primary_start,
            limit: primary_end.saturating_sub(primary_start),
        },
        secondary: SourceSlice {
            offset: secondary_start,
            limit: secondary_end.saturating_sub(secondary_start),
        },
    }
}
