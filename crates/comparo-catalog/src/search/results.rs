//! Listing pages and pagination.

use crate::search::Facet;
use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeInclusive};

/// Largest page size a listing will serve.
pub const MAX_PER_PAGE: usize = 100;

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: usize,
    /// Items per page.
    pub per_page: usize,
    /// Total number of items.
    pub total: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Pagination for `total` items. `per_page` is held to
    /// `1..=MAX_PER_PAGE`; `page` lands on the last page when it overshoots
    /// and on the first when it is zero. An empty listing still has one page.
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let total_pages = total.div_ceil(per_page).max(1);
        let page = page.clamp(1, total_pages);

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }

    /// Indices of this page's items within the full listing.
    pub fn item_range(&self) -> Range<usize> {
        let start = self.offset().min(self.total);
        start..(start + self.per_page).min(self.total)
    }

    /// First and last item shown, counted from 1, for a "21-25 sur 25"
    /// label. `None` for an empty listing.
    pub fn showing(&self) -> Option<(usize, usize)> {
        let range = self.item_range();
        (!range.is_empty()).then(|| (range.start + 1, range.end))
    }

    /// Up to `width` page links around the current page, shifted inward at
    /// either end of the listing.
    pub fn page_window(&self, width: usize) -> RangeInclusive<usize> {
        let width = width.clamp(1, self.total_pages);
        let latest_start = self.total_pages - width + 1;
        let first = self.page.saturating_sub(width / 2).clamp(1, latest_start);
        first..=first + width - 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 12, 0)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingPage<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Pagination info.
    pub pagination: Pagination,
    /// Facets computed over the whole filtered set.
    pub facets: Vec<Facet>,
}

impl<T> ListingPage<T> {
    /// Create a page.
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self {
            items,
            pagination,
            facets: Vec::new(),
        }
    }

    /// The empty-result page.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Pagination::default())
    }

    /// Set facets.
    pub fn with_facets(mut self, facets: Vec<Facet>) -> Self {
        self.facets = facets;
        self
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for ListingPage<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Cut one page out of an ordered listing.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> ListingPage<T> {
    let pagination = Pagination::new(page, per_page, items.len());
    ListingPage::new(items[pagination.item_range()].to_vec(), pagination)
}
