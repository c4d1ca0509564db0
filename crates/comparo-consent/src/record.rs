//! Persisted consent record and its settings.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::ConsentCategories;

/// Storage key of the consent record.
pub const CONSENT_KEY: &str = "cookie-consent";

/// Schema version written into new records.
pub const CONSENT_VERSION: &str = "1.0";

/// What gets written to storage when the user decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub categories: ConsentCategories,
    /// Milliseconds since the Unix epoch on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl ConsentRecord {
    pub fn new(categories: ConsentCategories, timestamp: DateTime<Utc>, version: &str) -> Self {
        Self {
            categories,
            timestamp,
            version: version.to_string(),
        }
    }

    /// Whether the record is older than `max_age_months` at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, max_age_months: u32) -> bool {
        match self.timestamp.checked_add_months(Months::new(max_age_months)) {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }
}

/// Settings for the consent store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentConfig {
    /// Records older than this are discarded on load.
    pub max_age_months: u32,
    /// Capacity of the affiliate click buffer; zero behaves as one.
    pub max_events: usize,
    pub version: String,
    /// Lifetime of the tracking session cookie.
    pub session_max_age_secs: u64,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            max_age_months: 6,
            max_events: 100,
            version: CONSENT_VERSION.to_string(),
            session_max_age_secs: 30 * 24 * 60 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_wire_format() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let record = ConsentRecord::new(ConsentCategories::new(true, false, false), at, "1.0");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["timestamp"], 1_700_000_000_123_i64);
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["categories"]["analytics"], true);

        let back: ConsentRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_six_month_expiry() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let record = ConsentRecord::new(ConsentCategories::default(), at, CONSENT_VERSION);

        let before = Utc.with_ymd_and_hms(2024, 7, 15, 11, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        assert!(!record.is_expired(before, 6));
        assert!(record.is_expired(after, 6));
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: ConsentConfig = serde_json::from_str(r#"{"max_events": 10}"#).unwrap();
        assert_eq!(config.max_events, 10);
        assert_eq!(config.max_age_months, 6);
        assert_eq!(config.version, "1.0");
    }
}
