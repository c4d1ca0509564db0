//! Affiliate feed retrieval for Comparo.
//!
//! The affiliate network publishes its product feed as CSV text at a fixed
//! path. This crate fetches it with a timeout, rejects payloads that are
//! obviously not a feed and keeps the last good copy for 30 minutes.
//!
//! Every failure comes back as a [`FeedResult`] with `success == false`;
//! nothing here returns `Err` to the page that asked.
//!
//! ```rust,ignore
//! use comparo_feed::{AffiliateFeedCache, FetchOptions, StaticFileSource};
//!
//! let cache = AffiliateFeedCache::new(StaticFileSource::with_default_path("public"));
//! let result = cache.fetch(FetchOptions::default()).await;
//! if let Some(csv) = result.data_or_stale() {
//!     // hand off to the CSV parser
//! }
//! ```

mod cache;
mod error;
mod source;
mod validate;

pub use cache::{
    AffiliateFeedCache, FeedCacheStats, FeedResult, FetchOptions, DEFAULT_TIMEOUT, DEFAULT_TTL,
};
pub use error::{FeedError, FeedErrorKind};
pub use source::{FeedSource, HttpSource, StaticFileSource, DEFAULT_FEED_PATH};
pub use validate::{FeedValidator, ValidationError, DEFAULT_MARKERS, DEFAULT_MIN_LENGTH};

pub mod prelude {
    pub use crate::{
        AffiliateFeedCache, FeedError, FeedErrorKind, FeedResult, FeedSource, FetchOptions,
        StaticFileSource,
    };
}
