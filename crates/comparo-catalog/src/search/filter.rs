//! Filter configuration and the filter engine.
//!
//! `FilterConfig` is what arrives from the page: permissive, possibly
//! half-filled, possibly nonsense. `FilterSet::from_config` turns it into
//! the list of active `Filter` predicates once, at the boundary; after that
//! filtering is a pure AND over those predicates.

use crate::catalog::{Dimension, Flag, Offer};
use crate::money::{Currency, Money};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Allow-list values that mean "no restriction".
const ALL_SENTINELS: &[&str] = &["all", "tous", "toutes", "*"];

/// Price bounds in euros.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PriceRange {
    #[serde(deserialize_with = "lenient_number")]
    pub min: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub max: Option<f64>,
}

/// Raw filter criteria as submitted by a listing page.
///
/// Every field is optional and every value is read leniently: numbers may
/// be strings, lists may be a single comma-separated string, and values
/// of the wrong type are dropped rather than rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(deserialize_with = "lenient_price_range")]
    pub price_range: Option<PriceRange>,
    #[serde(deserialize_with = "lenient_number")]
    pub max_price: Option<f64>,
    #[serde(deserialize_with = "lenient_list")]
    pub brands: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub operators: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub conditions: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub os: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub storages: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub wifi_standards: Vec<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub min_data_gb: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub min_speed_mbps: Option<f64>,
    #[serde(deserialize_with = "lenient_bool")]
    pub eco_friendly: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    pub forfait_included: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    pub tv_included: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    pub eu_roaming: Option<bool>,
}

impl FilterConfig {
    /// Read a configuration from an arbitrary JSON value.
    ///
    /// Anything that is not an object yields the inactive default.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            debug!(error = %e, "Unreadable filter configuration, ignoring");
            Self::default()
        })
    }
}

/// One active filter predicate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Price within inclusive bounds.
    PriceRange {
        min: Option<Money>,
        max: Option<Money>,
    },
    /// Attribute in a normalized (trimmed, lowercased) allow-list.
    OneOf {
        dimension: Dimension,
        values: Vec<String>,
    },
    /// Boolean attribute must be set.
    Flag(Flag),
    /// Data allowance of at least this many gigabytes.
    MinData(f64),
    /// Download speed of at least this many Mb/s.
    MinSpeed(f64),
}

impl Filter {
    /// Create a price range filter.
    pub fn price_range(min: Option<Money>, max: Option<Money>) -> Self {
        Filter::PriceRange { min, max }
    }

    /// Create an allow-list filter. Values are normalized here.
    pub fn one_of<I, S>(dimension: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Filter::OneOf {
            dimension,
            values: values.into_iter().map(|v| normalize(v.as_ref())).collect(),
        }
    }

    /// Create a flag filter.
    pub fn flag(flag: Flag) -> Self {
        Filter::Flag(flag)
    }

    /// Whether an item passes this predicate.
    pub fn matches<T: Offer + ?Sized>(&self, item: &T) -> bool {
        match self {
            Filter::PriceRange { min, max } => {
                let price = item.price().amount_cents;
                min.map_or(true, |m| price >= m.amount_cents)
                    && max.map_or(true, |m| price <= m.amount_cents)
            }
            Filter::OneOf { dimension, values } => item
                .attribute(*dimension)
                .map(|v| values.contains(&normalize(v)))
                .unwrap_or(false),
            Filter::Flag(flag) => item.flag(*flag),
            Filter::MinData(gb) => item.data_gb() >= *gb,
            Filter::MinSpeed(mbps) => item.speed_mbps() >= *mbps,
        }
    }
}

/// A validated set of active predicates, combined with logical AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    /// A set with no active predicates; matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Validate a raw configuration into its active predicates.
    ///
    /// Inactive or invalid criteria are dropped with a debug log: empty
    /// or "all" lists, negative or non-finite numbers, inverted ranges and
    /// flags that are absent or `false`.
    pub fn from_config(config: &FilterConfig) -> Self {
        let mut set = Self::new();

        if let Some(filter) = price_filter(config) {
            set.filters.push(filter);
        }

        let lists = [
            (Dimension::Brand, &config.brands),
            (Dimension::Operator, &config.operators),
            (Dimension::Technology, &config.technologies),
            (Dimension::Condition, &config.conditions),
            (Dimension::Os, &config.os),
            (Dimension::Storage, &config.storages),
            (Dimension::WifiStandard, &config.wifi_standards),
        ];
        for (dimension, values) in lists {
            if let Some(filter) = allow_list(dimension, values) {
                set.filters.push(filter);
            }
        }

        if let Some(gb) = positive(config.min_data_gb, "minDataGb") {
            set.filters.push(Filter::MinData(gb));
        }
        if let Some(mbps) = positive(config.min_speed_mbps, "minSpeedMbps") {
            set.filters.push(Filter::MinSpeed(mbps));
        }

        let flags = [
            (Flag::EcoFriendly, config.eco_friendly),
            (Flag::ForfaitIncluded, config.forfait_included),
            (Flag::TvIncluded, config.tv_included),
            (Flag::EuRoaming, config.eu_roaming),
        ];
        for (flag, value) in flags {
            if value == Some(true) {
                set.filters.push(Filter::Flag(flag));
            }
        }

        set
    }

    /// Whether an item passes every predicate.
    pub fn matches<T: Offer + ?Sized>(&self, item: &T) -> bool {
        self.filters.iter().all(|f| f.matches(item))
    }

    /// Whether no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Active predicates.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }
}

impl From<&FilterConfig> for FilterSet {
    fn from(config: &FilterConfig) -> Self {
        FilterSet::from_config(config)
    }
}

/// Keep the items that pass every active predicate, in input order.
pub fn filter_items<T: Offer + Clone>(items: &[T], filters: &FilterSet) -> Vec<T> {
    if filters.is_empty() {
        return items.to_vec();
    }
    items.iter().filter(|i| filters.matches(*i)).cloned().collect()
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn valid_bound(value: Option<f64>, name: &str) -> Option<f64> {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Some(v),
        Some(v) => {
            debug!(criterion = name, value = v, "Ignoring invalid price bound");
            None
        }
        None => None,
    }
}

fn price_filter(config: &FilterConfig) -> Option<Filter> {
    let range = config.price_range.clone().unwrap_or_default();
    let min = valid_bound(range.min, "priceRange.min");
    let max = [
        valid_bound(range.max, "priceRange.max"),
        valid_bound(config.max_price, "maxPrice"),
    ]
    .into_iter()
    .flatten()
    .reduce(f64::min);

    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            debug!(min = lo, max = hi, "Ignoring inverted price range");
            return None;
        }
    }
    // A zero floor excludes nothing.
    let min = min.filter(|m| *m > 0.0);
    if min.is_none() && max.is_none() {
        return None;
    }

    Some(Filter::PriceRange {
        min: min.map(|v| Money::from_decimal(v, Currency::EUR)),
        max: max.map(|v| Money::from_decimal(v, Currency::EUR)),
    })
}

fn allow_list(dimension: Dimension, values: &[String]) -> Option<Filter> {
    let values: Vec<String> = values
        .iter()
        .map(|v| normalize(v))
        .filter(|v| !v.is_empty())
        .collect();

    if values.is_empty() {
        return None;
    }
    if values.iter().any(|v| ALL_SENTINELS.contains(&v.as_str())) {
        debug!(dimension = dimension.as_str(), "Allow-list contains the all sentinel, ignoring");
        return None;
    }
    Some(Filter::OneOf { dimension, values })
}

fn positive(value: Option<f64>, name: &str) -> Option<f64> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Some(v),
        Some(v) => {
            debug!(criterion = name, value = v, "Ignoring non-positive threshold");
            None
        }
        None => None,
    }
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }))
}

fn lenient_price_range<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PriceRange>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "on" | "yes" | "oui" => Some(true),
            "false" | "0" | "off" | "no" | "non" => Some(false),
            _ => None,
        },
        _ => None,
    }))
}
