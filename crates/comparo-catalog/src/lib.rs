//! Catalog domain types and listing logic for Comparo.
//!
//! This crate holds everything between the raw backend records and the
//! presentation layer:
//!
//! - **Catalog**: Phones, internet boxes, mobile plans and the loader that
//!   normalizes backend records into them
//! - **Search**: Filter configuration, filter engine, sort engine,
//!   pagination and facets
//! - **Parse**: Numeric extraction from formatted strings ("20 Go", "19,99 €")
//!
//! # Example
//!
//! ```rust
//! use comparo_catalog::prelude::*;
//!
//! let phones = vec![
//!     Phone::new("ip15", "iPhone 15", "Apple", Money::from_decimal(100.0, Currency::EUR)),
//!     Phone::new("s24", "Galaxy S24", "Samsung", Money::from_decimal(50.0, Currency::EUR)),
//! ];
//!
//! let config: FilterConfig = serde_json::from_str(
//!     r#"{"priceRange": {"min": 0, "max": 2000}, "brands": ["Samsung"]}"#,
//! ).unwrap();
//!
//! let filters = FilterSet::from_config(&config);
//! let matching = filter_items(&phones, &filters);
//! assert_eq!(matching.len(), 1);
//! assert_eq!(matching[0].trademark, "Samsung");
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod parse;

pub mod catalog;
pub mod search;

pub use error::CatalogError;
pub use ids::ItemId;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CatalogError;
    pub use crate::ids::ItemId;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        load_boxes, load_phones, load_plans, CatalogItem, Dimension, Flag, InternetBox,
        ItemSource, LoadReport, MobilePlan, Offer, Phone,
    };

    // Search
    pub use crate::search::{
        brand_facet, filter_items, paginate, Facet, FacetValue, Filter, FilterConfig, FilterSet,
        ListingPage, Pagination, PriceRange, SortOption, Sorter,
    };
}
