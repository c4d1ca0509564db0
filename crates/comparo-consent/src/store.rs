//! The consent gate.

use chrono::{DateTime, Utc};
use comparo_cache::{Clock, DurableStorage, JsonStore, SystemClock, TrackingSessionId};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{ConsentError, ConsentResult};
use crate::events::{EventBuffer, TrackedEvent, CLICKS_KEY, SESSION_KEY};
use crate::record::{ConsentConfig, ConsentRecord, CONSENT_KEY};
use crate::{ConsentCategories, ConsentCategory};

/// Activation hook run whenever the effective consent changes.
///
/// Called after the store's lock is released, so listeners may read the
/// store back.
pub trait ConsentListener: Send + Sync {
    fn on_consent_changed(&self, categories: &ConsentCategories);
}

/// What happened to a tracking call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Appended to the click buffer, which now holds `buffered` events.
    Recorded { buffered: usize },
    /// No marketing consent; nothing was stored.
    Suppressed,
    /// Consent allowed it but storage is missing or refused the write.
    NotPersisted,
}

#[derive(Debug, Default)]
struct ConsentState {
    categories: ConsentCategories,
    recorded_at: Option<DateTime<Utc>>,
    session: Option<TrackingSessionId>,
    initialized: bool,
}

/// Holds the visitor's consent and gates tracking on it.
///
/// Construct one per client context and pass it to whatever needs it.
/// Until [`initialize`](Self::initialize) runs the store reports defaults:
/// necessary only.
///
/// When the storage backend reports itself unavailable (server-side
/// rendering) every storage call is skipped and the store works from
/// memory. Storage errors are logged and never returned.
pub struct ConsentStore<S> {
    store: JsonStore<S>,
    clock: Arc<dyn Clock>,
    config: ConsentConfig,
    listeners: Vec<Arc<dyn ConsentListener>>,
    state: Mutex<ConsentState>,
    // Serializes read-modify-write of the click buffer.
    clicks: Mutex<()>,
}

impl<S: DurableStorage> ConsentStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            store: JsonStore::new(storage),
            clock: Arc::new(SystemClock),
            config: ConsentConfig::default(),
            listeners: Vec::new(),
            state: Mutex::new(ConsentState::default()),
            clicks: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: ConsentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn ConsentListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn config(&self) -> &ConsentConfig {
        &self.config
    }

    /// Hydrate from storage. Only the first call reads; later calls return
    /// the in-memory state.
    pub fn initialize(&self) -> ConsentCategories {
        let mut state = self.state.lock();
        if state.initialized {
            return state.categories;
        }
        state.initialized = true;

        if !self.store.is_available() {
            debug!("consent storage unavailable, using defaults");
            return state.categories;
        }

        let restored = match self.load_record() {
            Ok(Some(record)) => {
                state.categories = record.categories;
                state.recorded_at = Some(record.timestamp);
                true
            }
            Ok(None) => false,
            Err(ConsentError::Expired(at)) => {
                debug!(recorded_at = %at, "stored consent expired, asking again");
                self.discard(CONSENT_KEY);
                false
            }
            Err(err) => {
                warn!(error = %err, "stored consent unreadable, using defaults");
                self.discard(CONSENT_KEY);
                false
            }
        };

        if state.categories.marketing {
            state.session = self.ensure_session();
        }

        let categories = state.categories;
        drop(state);

        if restored {
            self.notify(&categories);
        }
        categories
    }

    /// Record the user's choice. `necessary` is always kept on.
    pub fn save(&self, categories: ConsentCategories) -> ConsentRecord {
        let record = ConsentRecord::new(categories, self.clock.now(), &self.config.version);

        {
            let mut state = self.state.lock();
            state.initialized = true;

            if self.store.is_available() {
                if let Err(err) = self.store.set(CONSENT_KEY, &record) {
                    warn!(error = %err, "failed to persist consent");
                }
            }

            state.categories = record.categories;
            state.recorded_at = Some(record.timestamp);

            if record.categories.marketing {
                if state.session.is_none() {
                    state.session = self.ensure_session();
                }
            } else {
                state.session = None;
                self.discard(SESSION_KEY);
            }
        }

        debug!(
            analytics = record.categories.analytics,
            marketing = record.categories.marketing,
            preferences = record.categories.preferences,
            "consent saved"
        );
        self.notify(&record.categories);
        record
    }

    /// In-memory read; never touches storage.
    pub fn has_consent(&self, category: ConsentCategory) -> bool {
        self.state.lock().categories.is_granted(category)
    }

    pub fn categories(&self) -> ConsentCategories {
        self.state.lock().categories
    }

    /// When the current consent was given, if it was.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().recorded_at
    }

    pub fn session_id(&self) -> Option<TrackingSessionId> {
        self.state.lock().session.clone()
    }

    /// `Set-Cookie` value for the tracking session, when there is one.
    pub fn session_cookie(&self) -> Option<String> {
        self.session_id()
            .map(|id| id.to_cookie(SESSION_KEY, self.config.session_max_age_secs))
    }

    /// Forget the stored decision and go back to defaults.
    pub fn reset(&self) {
        {
            let mut state = self.state.lock();
            *state = ConsentState {
                initialized: true,
                ..ConsentState::default()
            };
            self.discard(CONSENT_KEY);
            self.discard(SESSION_KEY);
        }

        debug!("consent reset");
        self.notify(&ConsentCategories::default());
    }

    /// Append an event to the click buffer if marketing consent is given.
    pub fn track_event(&self, mut event: TrackedEvent) -> TrackOutcome {
        let (marketing, session) = {
            let state = self.state.lock();
            (state.categories.marketing, state.session.clone())
        };

        if !marketing {
            debug!(event = %event.event, "tracking suppressed, no marketing consent");
            return TrackOutcome::Suppressed;
        }
        if !self.store.is_available() {
            return TrackOutcome::NotPersisted;
        }

        if event.timestamp.is_none() {
            event.timestamp = Some(self.clock.now());
        }
        if event.session_id.is_none() {
            event.session_id = session;
        }

        let capacity = self.config.max_events;
        let _guard = self.clicks.lock();
        let mut buffer = self.load_clicks();
        buffer.push(event, capacity);

        match self.store.set(CLICKS_KEY, &buffer) {
            Ok(()) => TrackOutcome::Recorded {
                buffered: buffer.len(),
            },
            Err(err) => {
                warn!(error = %err, "failed to persist affiliate click");
                TrackOutcome::NotPersisted
            }
        }
    }

    /// Stored click events, oldest first.
    pub fn tracked_events(&self) -> Vec<TrackedEvent> {
        if !self.store.is_available() {
            return Vec::new();
        }
        let _guard = self.clicks.lock();
        self.load_clicks().iter().cloned().collect()
    }

    fn load_record(&self) -> ConsentResult<Option<ConsentRecord>> {
        let Some(record) = self.store.get::<ConsentRecord>(CONSENT_KEY)? else {
            return Ok(None);
        };
        if record.is_expired(self.clock.now(), self.config.max_age_months) {
            return Err(ConsentError::Expired(record.timestamp));
        }
        Ok(Some(record))
    }

    fn load_clicks(&self) -> EventBuffer {
        match self.store.get::<Vec<TrackedEvent>>(CLICKS_KEY) {
            Ok(Some(events)) => EventBuffer::from_events(events, self.config.max_events),
            Ok(None) => EventBuffer::new(),
            Err(err) => {
                warn!(error = %err, "click history unreadable, starting over");
                EventBuffer::new()
            }
        }
    }

    /// Reuse the stored tracking session or start a new one.
    fn ensure_session(&self) -> Option<TrackingSessionId> {
        if !self.store.is_available() {
            return None;
        }

        match self.store.get::<TrackingSessionId>(SESSION_KEY) {
            Ok(Some(id)) => return Some(id),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "tracking session unreadable, replacing it"),
        }

        let id = TrackingSessionId::generate();
        if let Err(err) = self.store.set(SESSION_KEY, &id) {
            warn!(error = %err, "failed to persist tracking session");
        }
        debug!(session = %id, "tracking session started");
        Some(id)
    }

    fn discard(&self, key: &str) {
        if !self.store.is_available() {
            return;
        }
        if let Err(err) = self.store.delete(key) {
            warn!(key, error = %err, "failed to clear stored consent data");
        }
    }

    fn notify(&self, categories: &ConsentCategories) {
        for listener in &self.listeners {
            listener.on_consent_changed(categories);
        }
    }
}
