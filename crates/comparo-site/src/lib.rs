//! Site wiring for Comparo.
//!
//! - **Config**: `SiteConfig`, read from TOML or JSON, builds the feed
//!   cache, consent store and catalog source
//! - **Telemetry**: the `tracing` subscriber
//! - **Service**: `CatalogService`, which turns a listing request into a
//!   page of phones, boxes or plans

pub mod config;
pub mod error;
pub mod service;
pub mod source;
pub mod telemetry;

pub use config::{CatalogConfig, FeedConfig, SiteConfig};
pub use error::{SiteError, SiteResult};
pub use service::{CatalogService, ListingRequest, DEFAULT_PER_PAGE};
pub use source::{
    records_from_value, CatalogSource, HttpCatalogSource, JsonDirSource, ProductLine,
    StaticCatalogSource,
};
pub use telemetry::{LogFormat, TelemetryConfig};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CatalogService, CatalogSource, ListingRequest, ProductLine, SiteConfig, SiteError,
        StaticCatalogSource,
    };
}
