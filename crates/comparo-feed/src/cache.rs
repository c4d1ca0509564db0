//! TTL cache in front of a feed source.

use comparo_cache::{Clock, ExpiringMap, Lookup, SystemClock};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::{FeedError, FeedErrorKind, FeedSource, FeedValidator};

/// How long a fetched feed stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Deadline for a single fetch when the caller gives none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The feed lives under one fixed key.
const FEED_KEY: &str = "affiliate-feed";

/// Per-call knobs for [`AffiliateFeedCache::fetch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip the cache even if a fresh entry exists.
    pub force_refresh: bool,
    /// Overrides the cache's default timeout.
    pub timeout: Option<Duration>,
}

impl FetchOptions {
    pub fn refresh() -> Self {
        Self {
            force_refresh: true,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Outcome of a fetch. Failures are values, never panics or `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResult {
    pub success: bool,
    pub data: Option<Arc<str>>,
    pub error: Option<String>,
    pub error_kind: Option<FeedErrorKind>,
    /// Whether `data` was served from the cache.
    pub from_cache: bool,
    /// On failure, the last text known before this call, if any. Callers
    /// may prefer it over an empty state.
    pub stale: Option<Arc<str>>,
}

impl FeedResult {
    fn fetched(data: Arc<str>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
            from_cache: false,
            stale: None,
        }
    }

    fn cached(data: Arc<str>) -> Self {
        Self {
            from_cache: true,
            ..Self::fetched(data)
        }
    }

    fn failed(err: &FeedError, stale: Option<Arc<str>>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
            from_cache: false,
            stale,
        }
    }

    /// Fresh data, or failing that the stale fallback.
    pub fn data_or_stale(&self) -> Option<&str> {
        self.data.as_deref().or(self.stale.as_deref())
    }
}

/// Observability snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedCacheStats {
    pub entries: usize,
    pub total_bytes: usize,
    /// Age of the cached feed, if one is stored.
    pub age_secs: Option<i64>,
}

/// Caches the affiliate feed for a fixed TTL.
///
/// The map lock is held only to look up and to store. The fetch itself runs
/// unlocked, so concurrent misses each fetch and the last store wins.
pub struct AffiliateFeedCache<S> {
    source: S,
    validator: FeedValidator,
    clock: Arc<dyn Clock>,
    entries: Mutex<ExpiringMap<&'static str, Arc<str>>>,
    default_timeout: Duration,
}

impl<S: FeedSource> AffiliateFeedCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            validator: FeedValidator::default(),
            clock: Arc::new(SystemClock),
            entries: Mutex::new(ExpiringMap::new(to_chrono(DEFAULT_TTL))),
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.entries = Mutex::new(ExpiringMap::new(to_chrono(ttl)));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_validator(mut self, validator: FeedValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the cached feed if fresh, otherwise fetch, validate and store.
    pub async fn fetch(&self, options: FetchOptions) -> FeedResult {
        let previous = {
            let mut entries = self.entries.lock();
            match entries.lookup(&FEED_KEY, self.clock.now()) {
                Lookup::Fresh(text) if !options.force_refresh => {
                    debug!(bytes = text.len(), "affiliate feed served from cache");
                    return FeedResult::cached(text);
                }
                Lookup::Fresh(text) | Lookup::Expired(text) => Some(text),
                Lookup::Missing => None,
            }
        };

        let timeout = options.timeout.unwrap_or(self.default_timeout);
        match self.fetch_validated(timeout).await {
            Ok(text) => {
                let text: Arc<str> = Arc::from(text);
                self.entries
                    .lock()
                    .insert(FEED_KEY, Arc::clone(&text), self.clock.now());
                debug!(
                    bytes = text.len(),
                    location = %self.source.location(),
                    "affiliate feed refreshed"
                );
                FeedResult::fetched(text)
            }
            Err(err) => {
                match err.kind() {
                    FeedErrorKind::Malformed => error!(
                        location = %self.source.location(),
                        error = %err,
                        "affiliate feed is malformed"
                    ),
                    FeedErrorKind::Timeout | FeedErrorKind::Transient => warn!(
                        location = %self.source.location(),
                        error = %err,
                        "affiliate feed fetch failed"
                    ),
                }
                FeedResult::failed(&err, previous)
            }
        }
    }

    async fn fetch_validated(&self, timeout: Duration) -> Result<String, FeedError> {
        let text = tokio::time::timeout(timeout, self.source.fetch_text())
            .await
            .map_err(|_| FeedError::Timeout(timeout))??;
        self.validator.validate(&text)?;
        Ok(text)
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
        debug!("affiliate feed cache cleared");
    }

    pub fn stats(&self) -> FeedCacheStats {
        let entries = self.entries.lock();
        let now = self.clock.now();
        FeedCacheStats {
            entries: entries.len(),
            total_bytes: entries.values().map(|text| text.len()).sum(),
            age_secs: entries
                .entries(now)
                .iter()
                .map(|info| info.age.num_seconds())
                .max(),
        }
    }
}

fn to_chrono(d: Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or_else(|_| chrono::Duration::days(36_500))
}
