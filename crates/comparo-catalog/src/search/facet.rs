//! Facet counts for the filter sidebar.

use crate::catalog::{Dimension, Offer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A facet for filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facet {
    /// Facet name (e.g., "Brand").
    pub name: String,
    /// Field this facet filters on.
    pub field: Dimension,
    /// Facet values, most frequent first.
    pub values: Vec<FacetValue>,
}

/// A single facet value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetValue {
    /// The value as first seen in the listing.
    pub value: String,
    /// Number of items with this value.
    pub count: usize,
    /// Whether currently selected.
    pub selected: bool,
}

/// Count the values of one attribute across a listing.
///
/// Values are grouped case-insensitively; the spelling kept is the first
/// one seen. Ordering is count descending, then value ascending.
pub fn terms_facet<T: Offer>(
    name: impl Into<String>,
    dimension: Dimension,
    items: &[T],
    selected: &[String],
) -> Facet {
    let mut counts: BTreeMap<String, (String, usize)> = BTreeMap::new();
    for value in items.iter().filter_map(|i| i.attribute(dimension)) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        counts
            .entry(value.to_lowercase())
            .or_insert_with(|| (value.to_string(), 0))
            .1 += 1;
    }

    let mut values: Vec<FacetValue> = counts
        .into_iter()
        .map(|(key, (value, count))| FacetValue {
            selected: selected.iter().any(|s| s.trim().to_lowercase() == key),
            value,
            count,
        })
        .collect();
    values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

    Facet {
        name: name.into(),
        field: dimension,
        values,
    }
}

/// Brand facet (manufacturer or operator).
pub fn brand_facet<T: Offer>(items: &[T], selected: &[String]) -> Facet {
    terms_facet("Brand", Dimension::Brand, items, selected)
}
