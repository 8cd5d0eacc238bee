//! Behavior-driven tests for plan-gated price history
//!
//! These tests verify that the entitlement check runs as its own step and
//! that refused plans never spend a history request.

mod support;

use oilprice_core::{
    ensure_historical_access, AccountSnapshot, CommodityCode, ErrorKind, HistoricalSeries,
    HttpResponse, PlanTier, UserTier,
};
use support::{gateway_with, tier_body, RecordingHttpClient};

fn brent() -> CommodityCode {
    CommodityCode::parse("BRENT_CRUDE_USD").expect("valid commodity code")
}

fn history_body() -> HttpResponse {
    HttpResponse::ok_json(
        r#"{"data":{"prices":[
            {"price":80.0,"date":"2025-09-01"},
            {"price":82.0,"date":"2025-09-02"},
            {"price":84.0,"date":"2025-09-03"}
        ]}}"#,
    )
}

// =============================================================================
// History Journey: Entitlement Gate
// =============================================================================

#[tokio::test]
async fn free_plan_is_refused_without_spending_a_history_request() {
    // Given: A free-plan account
    let (gateway, client) = gateway_with(
        RecordingHttpClient::new()
            .route("/users/me", tier_body("free"))
            .route("/prices/past_year", history_body()),
    );

    // When: The user asks for a year of history
    let error = gateway
        .get_past_year(&brent())
        .await
        .expect_err("free plan must be refused");

    // Then: They are told to upgrade
    assert_eq!(error.kind(), ErrorKind::UpgradeRequired);
    assert_eq!(
        error.user_message(),
        "Historical data requires Exploration tier or higher"
    );

    // And: Only the tier lookup reached the API
    let requests = client.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.ends_with("/users/me"));
}

#[tokio::test]
async fn exploration_plan_receives_history_for_the_requested_code() {
    // Given: An exploration-plan account
    let (gateway, client) = gateway_with(
        RecordingHttpClient::new()
            .route("/users/me", tier_body("exploration"))
            .route("/prices/past_month", history_body()),
    );

    // When
    let points = gateway
        .get_past_month(&brent())
        .await
        .expect("history should load");

    // Then: Every point carries the requested code and USD
    assert_eq!(points.len(), 3);
    assert!(points
        .iter()
        .all(|point| point.code == brent() && point.currency == "USD"));

    // And: The entitlement check came first
    let urls: Vec<String> = client
        .recorded_requests()
        .into_iter()
        .map(|request| request.url)
        .collect();
    assert!(urls[0].ends_with("/users/me"));
    assert!(urls[1].ends_with("/prices/past_month?by_code=BRENT_CRUDE_USD"));

    // And: The points summarize into a series
    let series = HistoricalSeries::from_points(brent(), &points).expect("valid series");
    assert_eq!(series.average_last(2), Some(83.0));
    assert_eq!(series.max(), Some(84.0));
}

#[tokio::test]
async fn history_without_prices_is_an_empty_series() {
    // Given: An entitled account and a history body with no `prices`
    let (gateway, _client) = gateway_with(
        RecordingHttpClient::new()
            .route("/users/me", tier_body("exploration"))
            .route("/prices/past_year", HttpResponse::ok_json(r#"{"data":{}}"#)),
    );

    // When
    let points = gateway
        .get_past_year(&brent())
        .await
        .expect("an empty history is not an error");

    // Then
    assert!(points.is_empty());
    let series = HistoricalSeries::from_points(brent(), &points).expect("valid series");
    assert_eq!(series.average_last(7), None);
}

#[tokio::test]
async fn stale_tier_is_still_caught_by_server_upgrade_flag() {
    // Given: The tier says yes but the server disagrees
    let (gateway, _client) = gateway_with(
        RecordingHttpClient::new()
            .route("/users/me", tier_body("production"))
            .route(
                "/prices/past_year",
                HttpResponse::new(
                    403,
                    r#"{"error":"Forbidden","upgrade_required":true,"recommended_plan":"reservoir_mastery"}"#,
                ),
            ),
    );

    // When
    let error = gateway
        .get_past_year(&brent())
        .await
        .expect_err("server refusal must surface");

    // Then
    assert_eq!(error.kind(), ErrorKind::UpgradeRequired);
    assert_eq!(error.recommended_plan(), Some("reservoir_mastery"));
    assert_eq!(error.http_status(), Some(403));
}

#[tokio::test]
async fn history_rate_limit_has_its_own_message() {
    let (gateway, _client) = gateway_with(
        RecordingHttpClient::new()
            .route("/users/me", tier_body("exploration"))
            .route(
                "/prices/past_year",
                HttpResponse::new(429, "{}").with_header("Retry-After", "3600"),
            ),
    );

    let error = gateway
        .get_past_year(&brent())
        .await
        .expect_err("throttled");

    assert_eq!(error.kind(), ErrorKind::RateLimit);
    assert!(error.user_message().contains("historical data"));
    assert_eq!(error.recovery_hint(), Some("Retry in 60 minutes"));
}

#[tokio::test]
async fn unreachable_tier_lookup_fails_as_network_error() {
    let (gateway, client) = gateway_with(RecordingHttpClient::new().route(
        "/users/me",
        HttpResponse::new(500, r#"{"error":"boom"}"#),
    ));

    let error = gateway
        .get_past_year(&brent())
        .await
        .expect_err("tier lookup failed");

    assert_eq!(error.kind(), ErrorKind::NetworkError);
    assert_eq!(client.request_count(), 1);
}

// =============================================================================
// History Journey: Gate as a Separate Step
// =============================================================================

#[test]
fn entitlement_gate_is_checkable_without_a_gateway() {
    let free = UserTier::from_account(AccountSnapshot::for_plan(PlanTier::Free));
    let admin = UserTier::from_account(AccountSnapshot {
        admin: true,
        ..AccountSnapshot::for_plan(PlanTier::Free)
    });

    assert_eq!(
        ensure_historical_access(&free).map_err(|error| error.kind()),
        Err(ErrorKind::UpgradeRequired)
    );
    assert!(ensure_historical_access(&admin).is_ok());
}
