//! Cookie consent for Comparo.
//!
//! A [`ConsentStore`] holds the visitor's per-category consent, persists it
//! under `cookie-consent` and gates affiliate tracking on the `marketing`
//! category. Stored decisions expire after six months.
//!
//! # Example
//!
//! ```rust
//! use comparo_cache::MemoryStorage;
//! use comparo_consent::{ConsentCategories, ConsentCategory, ConsentStore, TrackedEvent, TrackOutcome};
//!
//! let consent = ConsentStore::new(MemoryStorage::new());
//! consent.initialize();
//!
//! consent.save(ConsentCategories::new(true, false, false));
//! assert!(consent.has_consent(ConsentCategory::Necessary));
//! assert!(!consent.has_consent(ConsentCategory::Marketing));
//!
//! let outcome = consent.track_event(TrackedEvent::affiliate_click("iphone-15", "awin"));
//! assert_eq!(outcome, TrackOutcome::Suppressed);
//! ```

mod category;
mod error;
mod events;
mod record;
mod store;

pub use category::{ConsentCategories, ConsentCategory};
pub use error::{ConsentError, ConsentResult};
pub use events::{EventBuffer, TrackedEvent, CLICKS_KEY, SESSION_KEY};
pub use record::{ConsentConfig, ConsentRecord, CONSENT_KEY, CONSENT_VERSION};
pub use store::{ConsentListener, ConsentStore, TrackOutcome};

pub mod prelude {
    pub use crate::{
        ConsentCategories, ConsentCategory, ConsentConfig, ConsentListener, ConsentStore,
        TrackOutcome, TrackedEvent,
    };
}
