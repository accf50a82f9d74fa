//! Integration tests for the rate client against a local fixture server.
//!
//! The fixture mimics the CDN layout: `/rates@{as_of}/v1/currencies/{base}.json`.

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use fx_client::{ClientError, RateClient};
use fx_types::{AsOf, CurrencyCode, RateSource};
use serde_json::json;

async fn fixture(uri: Uri) -> Response {
    match uri.path() {
        "/rates@latest/v1/currencies/usd.json" => Json(json!({
            "date": "2025-06-01",
            "usd": { "inr": 83.1234, "eur": 0.91, "gbp": 0.78 }
        }))
        .into_response(),
        "/rates@2025-01-01/v1/currencies/usd.json" => Json(json!({
            "date": "2025-01-01",
            "usd": { "inr": 85.5 }
        }))
        .into_response(),
        "/rates@latest/v1/currencies/eur.json" => (StatusCode::OK, "{ not json").into_response(),
        "/rates@latest/v1/currencies/gbp.json" => Json(json!({ "date": "2025-06-01" })).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Starts the fixture on an ephemeral port and returns the client base URL.
async fn spawn_fixture() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, Router::new().fallback(fixture))
            .await
            .unwrap();
    });
    format!("http://{}/rates", addr)
}

fn code(s: &str) -> CurrencyCode {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_fetch_latest_rates() {
    let client = RateClient::new(spawn_fixture().await);

    let table = client.fetch_rates(&code("usd"), AsOf::Latest).await;

    assert_eq!(table.len(), 3);
    assert_eq!(table.rate(&code("inr")), Some(83.1234));
    assert_eq!(table.as_of(), AsOf::Latest);
}

#[tokio::test]
async fn test_fetch_dated_rates() {
    let client = RateClient::new(spawn_fixture().await);
    let date = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let table = client.fetch_rates(&code("usd"), AsOf::Date(date)).await;

    assert_eq!(table.rate(&code("inr")), Some(85.5));
    assert_eq!(table.as_of(), AsOf::Date(date));
}

#[tokio::test]
async fn test_not_found_yields_empty_table() {
    let client = RateClient::new(spawn_fixture().await);

    let table = client.fetch_rates(&code("jpy"), AsOf::Latest).await;
    assert!(table.is_empty());
    assert_eq!(table.base(), &code("jpy"));

    let err = client
        .try_fetch_rates(&code("jpy"), AsOf::Latest)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 404 }));
}

#[tokio::test]
async fn test_malformed_json_yields_empty_table() {
    let client = RateClient::new(spawn_fixture().await);

    assert!(client.fetch_rates(&code("eur"), AsOf::Latest).await.is_empty());

    let err = client
        .try_fetch_rates(&code("eur"), AsOf::Latest)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Json(_)));
}

#[tokio::test]
async fn test_missing_base_field_yields_empty_table() {
    let client = RateClient::new(spawn_fixture().await);

    assert!(client.fetch_rates(&code("gbp"), AsOf::Latest).await.is_empty());
}

#[tokio::test]
async fn test_unreachable_server_yields_empty_table() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RateClient::new(format!("http://{}/rates", addr));
    let table = client.fetch_rates(&code("usd"), AsOf::Latest).await;

    assert!(table.is_empty());
}
