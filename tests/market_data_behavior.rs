//! Behavior-driven tests for catalog, futures, diesel, usage and demo access
//!
//! These tests verify what a caller sees from the endpoint families beyond
//! spot prices, and that plan-gated futures never spend a futures request.

mod support;

use oilprice_core::{
    ensure_futures_access, AccountSnapshot, CommodityCode, ContractCode, ErrorKind, HttpError,
    HttpResponse, PlanTier, StateCode, UserTier, DEMO_COMMODITIES,
};
use support::{demo_gateway_with, gateway_with, latest_body, tier_body, RecordingHttpClient};

fn brent_futures() -> ContractCode {
    ContractCode::parse("ice-brent").expect("valid contract")
}

// =============================================================================
// Market Journey: Commodity Catalog
// =============================================================================

#[tokio::test]
async fn user_lists_commodity_codes_with_readable_names() {
    // Given: A catalog where one entry has no name
    let (gateway, _client) = gateway_with(RecordingHttpClient::new().route(
        "/commodities",
        HttpResponse::ok_json(
            r#"{"data":{"commodities":[
                {"code":"BRENT_CRUDE_USD","name":"Brent Crude Oil","category":"oil"},
                {"code":"NATURAL_GAS_USD","category":"gas"}
            ]}}"#,
        ),
    ));

    // When
    let catalog = gateway.get_commodities().await.expect("catalog should load");

    // Then
    let names: Vec<&str> = catalog.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, vec!["Brent Crude Oil", "NATURAL GAS USD"]);
    assert_eq!(catalog[1].category.as_deref(), Some("gas"));
}

// =============================================================================
// Market Journey: Futures
// =============================================================================

#[tokio::test]
async fn futures_are_refused_below_reservoir_mastery_without_a_futures_request() {
    // Given: An exploration-plan account
    let (gateway, client) = gateway_with(
        RecordingHttpClient::new()
            .route("/users/me", tier_body("exploration"))
            .route("/futures/", HttpResponse::ok_json(r#"{"data":{"price":84.0}}"#)),
    );

    // When: The user asks for the futures curve
    let error = gateway
        .get_futures_curve(&brent_futures())
        .await
        .expect_err("exploration plan must be refused");

    // Then: They are told which plan unlocks futures
    assert_eq!(error.kind(), ErrorKind::UpgradeRequired);
    assert_eq!(error.user_message(), "Futures data requires Reservoir Mastery tier");
    assert_eq!(error.recommended_plan(), Some("reservoir_mastery"));

    // And: Only the tier lookup reached the API
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn entitled_account_receives_futures_curve_in_api_order() {
    // Given
    let (gateway, _client) = gateway_with(
        RecordingHttpClient::new()
            .route("/users/me", tier_body("reservoir_mastery"))
            .route(
                "/futures/ice-brent/curve",
                HttpResponse::ok_json(
                    r#"{"data":{"curve":[
                        {"month":"2025-11","price":84.0},
                        {"month":"2025-12","price":84.6},
                        {"month":"2026-01","price":85.1}
                    ]}}"#,
                ),
            ),
    );

    // When
    let curve = gateway
        .get_futures_curve(&brent_futures())
        .await
        .expect("curve should load");

    // Then
    let months: Vec<&str> = curve.points.iter().map(|point| point.month.as_str()).collect();
    assert_eq!(months, vec!["2025-11", "2025-12", "2026-01"]);
    assert!(curve.spread().is_some_and(|spread| spread > 0.0));
}

#[tokio::test]
async fn unknown_futures_contract_is_not_found() {
    let (gateway, _client) = gateway_with(
        RecordingHttpClient::new()
            .route("/users/me", tier_body("reservoir_mastery"))
            .route(
                "/futures/",
                HttpResponse::new(404, r#"{"error":"Contract not found"}"#),
            ),
    );

    let error = gateway
        .get_futures_price(&ContractCode::parse("ice-unobtainium").expect("valid contract"))
        .await
        .expect_err("must fail");

    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert!(error.user_message().contains("Contract not found"));
}

#[test]
fn futures_gate_follows_plan_table_and_admin_override() {
    let production = UserTier::from_account(AccountSnapshot::for_plan(PlanTier::Production));
    let admin = UserTier::from_account(AccountSnapshot {
        admin: true,
        ..AccountSnapshot::for_plan(PlanTier::Free)
    });

    assert_eq!(
        ensure_futures_access(&production).map_err(|error| error.kind()),
        Err(ErrorKind::UpgradeRequired)
    );
    assert!(ensure_futures_access(&admin).is_ok());
}

// =============================================================================
// Market Journey: Diesel and Usage
// =============================================================================

#[tokio::test]
async fn diesel_price_for_a_state_shares_error_classification() {
    // Given: The API throttles the diesel endpoint
    let (gateway, _client) = gateway_with(RecordingHttpClient::new().route(
        "/diesel-prices/states/TX",
        HttpResponse::new(429, "{}").with_header("Retry-After", "60"),
    ));

    // When
    let error = gateway
        .get_diesel_price(&StateCode::parse("tx").expect("valid state"))
        .await
        .expect_err("throttled");

    // Then
    assert_eq!(error.kind(), ErrorKind::RateLimit);
    assert_eq!(error.recovery_hint(), Some("Retry in 1 minute"));
}

#[tokio::test]
async fn usage_reports_remaining_requests() {
    let (gateway, client) = gateway_with(
        RecordingHttpClient::new().route("/usage", HttpResponse::ok_json(r#"{"used":250,"limit":1000}"#)),
    );

    let usage = gateway.get_usage().await.expect("usage should load");

    assert_eq!(usage.remaining(), 750);
    assert_eq!(
        client.recorded_requests()[0].header("authorization"),
        Some("Token test-key")
    );
}

// =============================================================================
// Market Journey: Keyless Demo
// =============================================================================

#[tokio::test]
async fn demo_prices_are_fetched_without_an_authorization_header() {
    // Given: A demo client
    let (demo, client) = demo_gateway_with(
        RecordingHttpClient::new().route("/demo/prices/WTI_USD", latest_body("WTI_USD", 81.2)),
    );

    // When
    let point = demo
        .get_price(&CommodityCode::parse("wti_usd").expect("valid code"))
        .await
        .expect("demo price should load");

    // Then
    assert_eq!(point.price, 81.2);
    let requests = client.recorded_requests();
    assert!(requests[0].url.ends_with("/demo/prices/WTI_USD"));
    assert_eq!(requests[0].header("authorization"), None);
}

#[tokio::test]
async fn codes_outside_the_demo_set_are_refused_locally() {
    let (demo, client) = demo_gateway_with(RecordingHttpClient::new());

    let error = demo
        .get_price(&CommodityCode::parse("SILVER_USD").expect("valid code"))
        .await
        .expect_err("not a demo code");

    assert_eq!(error.kind(), ErrorKind::Authentication);
    assert_eq!(error.http_status(), None);
    assert_eq!(client.request_count(), 0);
    assert!(!DEMO_COMMODITIES.contains(&"SILVER_USD"));
}

#[tokio::test]
async fn offline_demo_is_a_network_error() {
    let (demo, _client) = demo_gateway_with(
        RecordingHttpClient::new().fail("/demo/prices/", HttpError::new("connection refused")),
    );

    let error = demo
        .get_price(&CommodityCode::parse("BRENT_CRUDE_USD").expect("valid code"))
        .await
        .expect_err("offline");

    assert_eq!(error.kind(), ErrorKind::NetworkError);
}
