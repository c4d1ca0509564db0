//! Expiring cache and durable key-value storage for Comparo.
//!
//! Two kinds of state live here:
//!
//! - **In-process**: `ExpiringMap`, a map whose entries go stale after a
//!   fixed TTL and are evicted lazily on the next access
//! - **Durable**: the `DurableStorage` trait over client-side storage,
//!   with a `JsonStore` wrapper for automatic JSON serialization
//!
//! # Example
//!
//! ```rust
//! use comparo_cache::{JsonStore, MemoryStorage};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Prefs {
//!     compact: bool,
//! }
//!
//! let store = JsonStore::new(MemoryStorage::new());
//! store.set("prefs", &Prefs { compact: true }).unwrap();
//!
//! let prefs: Option<Prefs> = store.get("prefs").unwrap();
//! assert_eq!(prefs, Some(Prefs { compact: true }));
//! ```

mod clock;
mod error;
mod expiring;
mod session;
mod storage;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CacheError;
pub use expiring::{EntryInfo, ExpiringMap, Lookup};
pub use session::TrackingSessionId;
pub use storage::{DurableStorage, FileStorage, MemoryStorage, UnavailableStorage};
pub use store::JsonStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CacheError, Clock, DurableStorage, ExpiringMap, JsonStore, Lookup, ManualClock,
        MemoryStorage, SystemClock, TrackingSessionId, UnavailableStorage,
    };
}
