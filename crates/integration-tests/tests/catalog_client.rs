//! Integration tests for the catalog API client against a stub upstream.

use std::time::Duration;

use shopmart_core::ProductId;
use shopmart_integration_tests::{StubCatalog, StubMode, product_json, sample_products};
use shopmart_storefront::catalog::{CatalogClient, CatalogError};
use shopmart_storefront::config::CatalogConfig;

fn client_for(stub: &StubCatalog, timeout: Duration) -> CatalogClient {
    let mut config = CatalogConfig::new(stub.url().clone());
    config.timeout = timeout;
    CatalogClient::new(&config).expect("client")
}

#[tokio::test]
async fn test_fetch_products() {
    let stub = StubCatalog::start(StubMode::Products(vec![
        product_json(1, "Phone X", 799.0, "smartphones"),
        product_json(2, "Lamp", 30.0, "home-decoration"),
    ]))
    .await;
    let client = client_for(&stub, Duration::from_secs(5));

    let products = client.fetch_products().await.expect("fetch");
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, ProductId::new(1));
    assert_eq!(products[0].title, "Phone X");
    assert!((products[1].price - 30.0).abs() < f64::EPSILON);
    assert_eq!(products[1].category, "home-decoration");
    assert!((products[0].discount_percentage - 5.0).abs() < f64::EPSILON);
    assert_eq!(stub.hits(), 1);
}

#[tokio::test]
async fn test_fetch_empty_catalog() {
    let stub = StubCatalog::start(StubMode::Products(Vec::new())).await;
    let products = client_for(&stub, Duration::from_secs(5))
        .fetch_products()
        .await
        .expect("fetch");
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_non_success_status() {
    let stub = StubCatalog::start(StubMode::Status(503)).await;
    let err = client_for(&stub, Duration::from_secs(5))
        .fetch_products()
        .await
        .expect_err("503 should fail");

    match err {
        CatalogError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unparseable_body() {
    let stub = StubCatalog::start(StubMode::Garbage).await;
    let err = client_for(&stub, Duration::from_secs(5))
        .fetch_products()
        .await
        .expect_err("garbage should fail");
    assert!(matches!(err, CatalogError::Parse(_)));
}

#[tokio::test]
async fn test_timeout() {
    let stub = StubCatalog::start(StubMode::Slow(Duration::from_secs(2), sample_products(3))).await;
    let err = client_for(&stub, Duration::from_millis(100))
        .fetch_products()
        .await
        .expect_err("should time out");
    assert!(matches!(err, CatalogError::Http(_)));
}
