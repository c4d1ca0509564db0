//! Listing behaviour through `CatalogService`, from raw backend records to
//! a rendered page.

use async_trait::async_trait;
use comparo_catalog::catalog::Offer;
use comparo_catalog::search::{FilterConfig, SortOption};
use comparo_site::prelude::*;
use comparo_site::SiteResult;
use serde_json::{json, Value};

fn phone_records() -> Vec<Value> {
    vec![
        json!({"id": "ip15", "name": "iPhone 15", "trademark": "Apple", "price": 969,
               "storage": "128 Go", "condition": "Neuf", "os": "iOS"}),
        json!({"id": "s24", "name": "Galaxy S24", "trademark": "Samsung", "price": "899,00 €",
               "storage": "256 Go", "condition": "Neuf", "os": "Android"}),
        json!({"id": "px8", "name": "Pixel 8", "brand": "Google", "prix": 699,
               "condition": "Reconditionné", "os": "Android"}),
        json!({"id": "fp5", "name": "Fairphone 5", "trademark": "Fairphone", "price": 549,
               "eco_friendly": true, "Programme_ID": "4421"}),
        // No brand: skipped by the loader.
        json!({"id": "broken", "name": "Mystery phone", "price": 10}),
    ]
}

fn box_records() -> Vec<Value> {
    vec![
        json!({"id": "pop", "name": "Freebox Pop", "operator": "Free", "price": 29.99,
               "download_speed": "5 Gb/s", "technology": "Fibre", "wifi": "Wi-Fi 7"}),
        json!({"id": "livebox", "name": "Livebox Max", "operator": "Orange", "price": 42.99,
               "download_speed": "2 Gb/s", "technology": "Fibre", "tv_included": true}),
        json!({"id": "sfr-adsl", "name": "SFR Box", "operator": "SFR", "price": 25.99,
               "download_speed": "15 Mb/s", "technology": "ADSL"}),
    ]
}

fn plan_records() -> Vec<Value> {
    vec![
        json!({"id": "free-5g", "name": "Forfait Free 5G", "operator": "Free", "price": 19.99,
               "data": "350 Go", "eu_roaming": true}),
        json!({"id": "sosh-20", "name": "Sosh 20 Go", "operator": "Sosh", "price": 9.99,
               "data": "20 Go"}),
        json!({"id": "bouygues-illimite", "name": "Sensation Illimité", "operator": "Bouygues Telecom",
               "price": 49.99, "data": "Illimité"}),
    ]
}

fn service() -> CatalogService<StaticCatalogSource> {
    let source = StaticCatalogSource::new()
        .with_records(ProductLine::Phones, phone_records())
        .with_records(ProductLine::Boxes, box_records())
        .with_records(ProductLine::Plans, plan_records());
    CatalogService::new(source)
}

fn filter(value: Value) -> FilterConfig {
    FilterConfig::from_value(value)
}

#[tokio::test]
async fn test_price_range_and_brand() {
    let request = ListingRequest::new()
        .with_filter(filter(json!({"priceRange": {"min": 0, "max": 2000}, "brands": ["Samsung"]})));

    let page = service().list_phones(&request).await;

    assert_eq!(page.len(), 1);
    assert_eq!(page.items[0].trademark, "Samsung");
    assert_eq!(page.pagination.total, 1);
}

#[tokio::test]
async fn test_inactive_filters_keep_everything_in_order() {
    let request = ListingRequest::new().with_filter(filter(json!({
        "brands": ["all"],
        "maxPrice": null,
        "conditions": [],
        "ecoFriendly": false,
        "minDataGb": "abc"
    })));

    let page = service().list_phones(&request).await;

    let ids: Vec<_> = page.items.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["ip15", "s24", "px8", "fp5"]);
}

#[tokio::test]
async fn test_sorted_and_paginated() {
    let request = ListingRequest::new()
        .with_sort(SortOption::PriceAsc)
        .with_page(2, 2);

    let page = service().list_phones(&request).await;

    let ids: Vec<_> = page.items.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["s24", "ip15"]);
    assert_eq!(page.pagination.total, 4);
    assert_eq!(page.pagination.total_pages, 2);
    assert!(page.pagination.has_prev);
    assert!(!page.pagination.has_next);
}

#[tokio::test]
async fn test_facets_cover_filtered_set() {
    let request = ListingRequest::from_value(json!({
        "filter": {"os": "Android", "brands": "Google"},
        "sort": "popularity"
    }));

    let page = service().list_phones(&request).await;
    assert_eq!(page.len(), 1);

    let brands = page.facets.iter().find(|f| f.name == "Marque").unwrap();
    assert_eq!(brands.values.len(), 1);
    assert_eq!(brands.values[0].value, "Google");
    assert!(brands.values[0].selected);

    let condition = page.facets.iter().find(|f| f.name == "État").unwrap();
    assert_eq!(condition.values[0].value, "Reconditionné");
    assert!(!condition.values[0].selected);
}

#[tokio::test]
async fn test_boxes_by_speed() {
    let request = ListingRequest::from_value(json!({
        "filter": {"minSpeedMbps": 1000},
        "sort": "speed-desc"
    }));

    let page = service().list_boxes(&request).await;

    let operators: Vec<_> = page.items.iter().map(|b| b.operator.as_str()).collect();
    assert_eq!(operators, vec!["Free", "Orange"]);
    assert_eq!(page.items[0].speed_mbps(), 5000.0);
}

#[tokio::test]
async fn test_plans_by_data() {
    let request = ListingRequest::from_value(json!({
        "filter": {"minDataGb": 50},
        "sort": "data_desc"
    }));

    let page = service().list_plans(&request).await;

    let ids: Vec<_> = page.items.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["bouygues-illimite", "free-5g"]);
}

#[tokio::test]
async fn test_everything_filtered_out_is_an_empty_page() {
    let request = ListingRequest::new().with_filter(filter(json!({"maxPrice": 1})));

    let page = service().list_plans(&request).await;

    assert!(page.is_empty());
    assert_eq!(page.pagination.total, 0);
    assert_eq!(page.pagination.page, 1);
}

struct DownBackend;

#[async_trait]
impl CatalogSource for DownBackend {
    async fn fetch_records(&self, _line: ProductLine) -> SiteResult<Vec<Value>> {
        Err(SiteError::Status {
            status: 503,
            url: "https://api.comparo.example/phones".to_string(),
        })
    }
}

#[tokio::test]
async fn test_backend_failure_is_an_empty_page() {
    let service = CatalogService::new(DownBackend);

    let page = service.list_phones(&ListingRequest::default()).await;

    assert!(page.is_empty());
    assert_eq!(page.facets.len(), 4);
    assert!(page.facets.iter().all(|f| f.values.is_empty()));
}
