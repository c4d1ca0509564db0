//! Affiliate click events and their bounded buffer.

use chrono::{DateTime, Utc};
use comparo_cache::TrackingSessionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};

/// Storage key of the click buffer.
pub const CLICKS_KEY: &str = "affiliate_clicks";

/// Storage key of the tracking session id.
pub const SESSION_KEY: &str = "affiliate_session";

/// One tracking call, e.g. a click on an affiliate offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEvent {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
    /// Stamped by the store when left empty.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<TrackingSessionId>,
}

impl TrackedEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            offer_id: None,
            merchant: None,
            properties: BTreeMap::new(),
            timestamp: None,
            session_id: None,
        }
    }

    /// An outbound click on an affiliate offer.
    pub fn affiliate_click(offer_id: impl Into<String>, merchant: impl Into<String>) -> Self {
        Self::new("affiliate_click")
            .with_offer(offer_id)
            .with_merchant(merchant)
    }

    pub fn with_offer(mut self, offer_id: impl Into<String>) -> Self {
        self.offer_id = Some(offer_id.into());
        self
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }
}

/// Ring buffer of events; pushing past capacity drops the oldest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventBuffer {
    events: VecDeque<TrackedEvent>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Rebuild from stored events, keeping the newest `capacity`.
    pub fn from_events(events: Vec<TrackedEvent>, capacity: usize) -> Self {
        let mut buffer = Self {
            events: events.into(),
        };
        buffer.truncate(capacity);
        buffer
    }

    /// Append, then evict from the front down to `capacity`. A capacity of
    /// zero still keeps the newest event.
    pub fn push(&mut self, event: TrackedEvent, capacity: usize) {
        self.events.push_back(event);
        self.truncate(capacity);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedEvent> {
        self.events.iter()
    }

    fn truncate(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        while self.events.len() > capacity {
            self.events.pop_front();
        }
    }
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(n: usize) -> TrackedEvent {
        TrackedEvent::affiliate_click(format!("offer-{n}"), "awin")
    }

    #[test]
    fn test_buffer_evicts_oldest_first() {
        let mut buffer = EventBuffer::new();
        for n in 0..105 {
            buffer.push(click(n), 100);
        }

        assert_eq!(buffer.len(), 100);
        let first = buffer.iter().next().unwrap();
        assert_eq!(first.offer_id.as_deref(), Some("offer-5"));
        let last = buffer.iter().last().unwrap();
        assert_eq!(last.offer_id.as_deref(), Some("offer-104"));
    }

    #[test]
    fn test_zero_capacity_keeps_newest() {
        let mut buffer = EventBuffer::new();
        buffer.push(click(0), 0);
        buffer.push(click(1), 0);

        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.iter().next().unwrap().offer_id.as_deref(), Some("offer-1"));
    }

    #[test]
    fn test_from_events_trims_oversized_history() {
        let events = (0..10).map(click).collect();
        let buffer = EventBuffer::from_events(events, 3);
        let ids: Vec<_> = buffer.iter().filter_map(|e| e.offer_id.clone()).collect();
        assert_eq!(ids, vec!["offer-7", "offer-8", "offer-9"]);
    }

    #[test]
    fn test_event_serializes_as_compact_object() {
        let event = TrackedEvent::new("outbound")
            .with_property("position", 3)
            .with_timestamp(chrono::DateTime::from_timestamp_millis(1_000).unwrap());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event": "outbound",
                "properties": {"position": 3},
                "timestamp": 1000
            })
        );

        // The buffer is a plain JSON array on disk.
        let mut buffer = EventBuffer::new();
        buffer.push(event, 100);
        assert!(serde_json::to_value(&buffer).unwrap().is_array());
    }
}
