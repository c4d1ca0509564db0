//! In-process map with per-entry TTL and lazy expiry.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;

/// Result of looking a key up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    /// Entry present and younger than the TTL.
    Fresh(V),
    /// Entry was present but stale; it has been evicted and is handed back
    /// in case the caller wants to serve it anyway.
    Expired(V),
    /// No entry.
    Missing,
}

impl<V> Lookup<V> {
    /// The value if fresh.
    pub fn fresh(self) -> Option<V> {
        match self {
            Lookup::Fresh(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Lookup::Fresh(_))
    }
}

/// Observability snapshot of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo<K> {
    pub key: K,
    pub inserted_at: DateTime<Utc>,
    pub age: Duration,
    pub expired: bool,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

/// A map whose entries expire a fixed TTL after insertion.
///
/// There is no background sweep. An entry whose age has reached the TTL is
/// treated as absent and removed by the next `lookup`/`get` on its key.
/// Callers pass `now` in so the map itself never reads a clock.
#[derive(Debug, Clone)]
pub struct ExpiringMap<K, V> {
    entries: HashMap<K, Entry<V>>,
    ttl: Duration,
}

impl<K, V> ExpiringMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty map.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Time-to-live for every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert or overwrite an entry, stamped with `now`.
    pub fn insert(&mut self, key: K, value: V, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Look a key up, evicting it if stale.
    pub fn lookup(&mut self, key: &K, now: DateTime<Utc>) -> Lookup<V> {
        let expired = match self.entries.get(key) {
            None => return Lookup::Missing,
            Some(entry) => self.is_expired(entry, now),
        };

        if expired {
            match self.entries.remove(key) {
                Some(entry) => Lookup::Expired(entry.value),
                None => Lookup::Missing,
            }
        } else {
            match self.entries.get(key) {
                Some(entry) => Lookup::Fresh(entry.value.clone()),
                None => Lookup::Missing,
            }
        }
    }

    /// Fresh value for a key, if any.
    pub fn get(&mut self, key: &K, now: DateTime<Utc>) -> Option<V> {
        self.lookup(key, now).fresh()
    }

    /// Remove an entry regardless of age.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, stale ones included until they are touched.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate stored values without touching expiry.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values().map(|e| &e.value)
    }

    /// Snapshot of every stored entry's age.
    pub fn entries(&self, now: DateTime<Utc>) -> Vec<EntryInfo<K>> {
        self.entries
            .iter()
            .map(|(key, entry)| EntryInfo {
                key: key.clone(),
                inserted_at: entry.inserted_at,
                age: now - entry.inserted_at,
                expired: self.is_expired(entry, now),
            })
            .collect()
    }

    fn is_expired(&self, entry: &Entry<V>, now: DateTime<Utc>) -> bool {
        now - entry.inserted_at >= self.ttl
    }
}
