//! Search module.
//!
//! Contains filter configuration, the filter and sort engines, pagination
//! and facets.

mod facet;
mod filter;
mod results;
mod sort;

pub use facet::{brand_facet, terms_facet, Facet, FacetValue};
pub use filter::{filter_items, Filter, FilterConfig, FilterSet, PriceRange};
pub use results::{paginate, ListingPage, Pagination, MAX_PER_PAGE};
pub use sort::{SortOption, Sorter, DEFAULT_PREFERRED_BRANDS};
