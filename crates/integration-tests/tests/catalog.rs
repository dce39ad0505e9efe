//! Integration tests for the bundled product catalog.

#![allow(clippy::unwrap_used)]

use mini_catalog_core::catalog::find;
use mini_catalog_core::{ProductId, ProductQuery, SortOption};
use mini_catalog_integration_tests::bundled_catalog_path;
use mini_catalog_storefront::catalog::{CATALOG_UNAVAILABLE, load_products};

// =============================================================================
// Loading Tests
// =============================================================================

#[tokio::test]
async fn test_bundled_catalog_loads() {
    let products = load_products(bundled_catalog_path()).await.unwrap();
    assert_eq!(products.len(), 8);
    assert!(products.iter().all(|p| p.price.cents() > 0));
}

#[tokio::test]
async fn test_missing_catalog_reports_generic_message() {
    let err = load_products("definitely/not/here.json").await.unwrap_err();
    assert_eq!(err.user_message(), CATALOG_UNAVAILABLE);
}

// =============================================================================
// Query Tests
// =============================================================================

#[tokio::test]
async fn test_search_and_sort_bundled_catalog() {
    let products = load_products(bundled_catalog_path()).await.unwrap();

    let office = ProductQuery::new("OFFICE", SortOption::PriceDesc).apply(&products);
    let ids: Vec<&str> = office.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["chair"]);

    let all = ProductQuery::new("", SortOption::PriceAsc).apply(&products);
    assert_eq!(all.len(), products.len());
    assert_eq!(all.first().map(|p| p.id.as_str()), Some("tote"));
    assert_eq!(all.last().map(|p| p.id.as_str()), Some("chair"));
}

#[tokio::test]
async fn test_search_with_no_matches_is_empty() {
    let products = load_products(bundled_catalog_path()).await.unwrap();
    assert!(ProductQuery::new("zzz", SortOption::PriceAsc).apply(&products).is_empty());
}

#[tokio::test]
async fn test_find_by_id() {
    let products = load_products(bundled_catalog_path()).await.unwrap();
    let mug = find(&products, &ProductId::from("mug")).unwrap();
    assert_eq!(mug.price.display(), "$15.00");
    assert!(find(&products, &ProductId::from("nope")).is_none());
}
