//! Listing pages for the three product lines.

use comparo_catalog::catalog::{load_boxes, load_phones, load_plans, Dimension, Offer};
use comparo_catalog::catalog::{InternetBox, MobilePlan, Phone};
use comparo_catalog::search::{
    filter_items, paginate, terms_facet, Facet, FilterConfig, FilterSet, ListingPage, SortOption,
    Sorter,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::source::{CatalogSource, ProductLine};

/// Page size when the request gives none.
pub const DEFAULT_PER_PAGE: usize = 12;

/// What a listing page asks for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingRequest {
    #[serde(deserialize_with = "lenient_filter")]
    pub filter: FilterConfig,
    #[serde(deserialize_with = "lenient_sort")]
    pub sort: SortOption,
    #[serde(deserialize_with = "lenient_count")]
    pub page: Option<usize>,
    #[serde(deserialize_with = "lenient_count")]
    pub per_page: Option<usize>,
}

impl ListingRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a request from an arbitrary JSON value. An unusable field falls
    /// back to its default on its own; a non-object yields the default
    /// request.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            debug!(error = %e, "unusable listing request, using defaults");
            Self::default()
        })
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page: usize, per_page: usize) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }
}

/// Unknown sort keys fall back to relevance instead of failing the request.
fn lenient_sort<'de, D>(deserializer: D) -> Result<SortOption, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => SortOption::from_param(&s),
        _ => SortOption::default(),
    })
}

fn lenient_filter<'de, D>(deserializer: D) -> Result<FilterConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(FilterConfig::from_value(Value::deserialize(deserializer)?))
}

/// Page numbers and sizes as positive integers, possibly sent as strings.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(count.and_then(|n| usize::try_from(n).ok()))
}

/// Loads, filters, sorts and paginates catalog listings.
///
/// Listing calls never fail: a backend error is logged and the page comes
/// back empty.
pub struct CatalogService<S> {
    source: S,
    sorter: Sorter,
    default_per_page: usize,
}

impl<S: CatalogSource> CatalogService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            sorter: Sorter::default(),
            default_per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_sorter(mut self, sorter: Sorter) -> Self {
        self.sorter = sorter;
        self
    }

    pub fn with_default_per_page(mut self, per_page: usize) -> Self {
        self.default_per_page = per_page;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn list_phones(&self, request: &ListingRequest) -> ListingPage<Phone> {
        let records = self.records(ProductLine::Phones).await;
        let phones = load_phones(records).into_items();
        self.listing(
            phones,
            request,
            &[
                ("Marque", Dimension::Brand),
                ("État", Dimension::Condition),
                ("Système", Dimension::Os),
                ("Stockage", Dimension::Storage),
            ],
        )
    }

    pub async fn list_boxes(&self, request: &ListingRequest) -> ListingPage<InternetBox> {
        let records = self.records(ProductLine::Boxes).await;
        let boxes = load_boxes(records).into_items();
        self.listing(
            boxes,
            request,
            &[
                ("Opérateur", Dimension::Operator),
                ("Technologie", Dimension::Technology),
                ("Wi-Fi", Dimension::WifiStandard),
            ],
        )
    }

    pub async fn list_plans(&self, request: &ListingRequest) -> ListingPage<MobilePlan> {
        let records = self.records(ProductLine::Plans).await;
        let plans = load_plans(records).into_items();
        self.listing(
            plans,
            request,
            &[
                ("Opérateur", Dimension::Operator),
                ("Réseau", Dimension::Technology),
            ],
        )
    }

    async fn records(&self, line: ProductLine) -> Vec<Value> {
        match self.source.fetch_records(line).await {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    line = line.as_str(),
                    error = %err,
                    "catalog source failed, serving empty listing"
                );
                Vec::new()
            }
        }
    }

    fn listing<T: Offer + Clone>(
        &self,
        items: Vec<T>,
        request: &ListingRequest,
        facets: &[(&str, Dimension)],
    ) -> ListingPage<T> {
        let filters = FilterSet::from_config(&request.filter);
        let filtered = filter_items(&items, &filters);
        let sorted = self.sorter.sort(&filtered, request.sort);

        let facets: Vec<Facet> = facets
            .iter()
            .map(|(name, dimension)| {
                terms_facet(
                    *name,
                    *dimension,
                    &filtered,
                    selected_values(&request.filter, *dimension),
                )
            })
            .collect();

        debug!(
            total = items.len(),
            matching = filtered.len(),
            sort = request.sort.as_str(),
            "listing built"
        );

        paginate(
            &sorted,
            request.page.unwrap_or(1),
            request.per_page.unwrap_or(self.default_per_page),
        )
        .with_facets(facets)
    }
}

fn selected_values(filter: &FilterConfig, dimension: Dimension) -> &[String] {
    match dimension {
        Dimension::Brand => &filter.brands,
        Dimension::Operator => &filter.operators,
        Dimension::Technology => &filter.technologies,
        Dimension::Condition => &filter.conditions,
        Dimension::Os => &filter.os,
        Dimension::Storage => &filter.storages,
        Dimension::WifiStandard => &filter.wifi_standards,
    }
}
