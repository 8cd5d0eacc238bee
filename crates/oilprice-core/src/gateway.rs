use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::api_key::ApiKey;
use crate::classify::{classify_response, ApiEndpoint, ClassifiedError};
use crate::config::GatewayConfig;
use crate::domain::{
    AccountSnapshot, CommodityInfo, ContractCode, DataConnectorPrice, DieselPrice, FuturesCurve,
    FuturesCurvePoint, FuturesQuote, PlanTier, PricePoint, StateCode, UsageSnapshot, UserTier,
};
use crate::entitlement::{
    ensure_futures_access, ensure_historical_access, HistoryPeriod, HistoryStage,
};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::{CommodityCode, ValidationError};

/// Code fetched by [`PriceApiGateway::test_connection`].
pub const CONNECTION_CHECK_CODE: &str = "BRENT_CRUDE_USD";

/// Optional filters for the bunker fuel data-connector feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataConnectorFilter {
    pub fuel_type: Option<String>,
    pub port: Option<String>,
    pub region: Option<String>,
    /// ISO-8601 lower bound on record timestamps.
    pub since: Option<String>,
}

impl DataConnectorFilter {
    /// Query string including the leading `?`, or empty when no filter is set.
    pub fn query_string(&self) -> String {
        let pairs: Vec<String> = [
            ("fuel_type", &self.fuel_type),
            ("port", &self.port),
            ("region", &self.region),
            ("since", &self.since),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(|value| format!("{name}={}", urlencoding::encode(value)))
        })
        .collect();

        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

/// Authenticated client for the commodity price API.
///
/// Every failure leaves the gateway as a [`ClassifiedError`]; nothing is
/// retried internally.
#[derive(Clone)]
pub struct PriceApiGateway {
    api_key: ApiKey,
    config: GatewayConfig,
    http_client: Arc<dyn HttpClient>,
    clock: fn() -> OffsetDateTime,
}

impl fmt::Debug for PriceApiGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceApiGateway")
            .field("api_key", &self.api_key)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PriceApiGateway {
    pub fn new(api_key: &str) -> Result<Self, ValidationError> {
        Self::with_config(api_key, GatewayConfig::default())
    }

    pub fn with_config(api_key: &str, config: GatewayConfig) -> Result<Self, ValidationError> {
        let http_client = Arc::new(ReqwestHttpClient::new(&config.user_agent));
        Self::with_http_client(http_client, api_key, config)
    }

    pub fn with_http_client(
        http_client: Arc<dyn HttpClient>,
        api_key: &str,
        config: GatewayConfig,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            api_key: ApiKey::new(api_key)?,
            config,
            http_client,
            clock: OffsetDateTime::now_utc,
        })
    }

    /// Replaces the clock used to interpret `X-RateLimit-Reset`.
    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub async fn get_price(&self, code: &CommodityCode) -> Result<PricePoint, ClassifiedError> {
        let path = format!("/prices/latest?by_code={}", urlencoding::encode(code.as_str()));
        let response = self.send(&path, ApiEndpoint::LatestPrice).await?;
        decode_latest(&response, code)
    }

    /// Fetches every code concurrently and keeps the successes in input order.
    pub async fn get_multiple_prices(&self, codes: &[CommodityCode]) -> Vec<PricePoint> {
        let results = join_all(codes.iter().map(|code| self.get_price(code))).await;

        codes
            .iter()
            .zip(results)
            .filter_map(|(code, result)| match result {
                Ok(point) => Some(point),
                Err(error) => {
                    warn!(code = %code, kind = %error.kind(), "omitting commodity: {}", error.user_message());
                    None
                }
            })
            .collect()
    }

    pub async fn get_all_prices(&self) -> Result<Vec<PricePoint>, ClassifiedError> {
        let response = self.send("/prices/all", ApiEndpoint::AllPrices).await?;
        let envelope: Envelope<Vec<PriceRow>> = decode(&response)?;

        envelope
            .data
            .into_iter()
            .map(|row| {
                let code = row
                    .code
                    .as_deref()
                    .ok_or_else(|| String::from("price entry is missing `code`"))
                    .and_then(|raw| CommodityCode::parse(raw).map_err(|error| error.to_string()))?;
                row.into_point(code).map_err(|error| error.to_string())
            })
            .collect::<Result<Vec<_>, String>>()
            .map_err(|detail| ClassifiedError::malformed(response.status, detail))
    }

    /// `true` when the reference code can be fetched; every failure is `false`.
    pub async fn test_connection(&self) -> bool {
        let Ok(code) = CommodityCode::parse(CONNECTION_CHECK_CODE) else {
            return false;
        };

        match self.get_price(&code).await {
            Ok(_) => true,
            Err(error) => {
                debug!(kind = %error.kind(), "connection check failed");
                false
            }
        }
    }

    /// Resolves the account tier. Every failure is reported as a network error.
    pub async fn get_user_tier(&self) -> Result<UserTier, ClassifiedError> {
        let response = self
            .send("/users/me", ApiEndpoint::UserTier)
            .await
            .map_err(|error| ClassifiedError::tier_unavailable(&error))?;

        parse_account(&response.body)
            .map(UserTier::from_account)
            .map_err(|error| {
                ClassifiedError::tier_unavailable(&ClassifiedError::malformed(
                    response.status,
                    error,
                ))
            })
    }

    pub async fn get_past_year(
        &self,
        code: &CommodityCode,
    ) -> Result<Vec<PricePoint>, ClassifiedError> {
        self.get_history(code, HistoryPeriod::PastYear).await
    }

    pub async fn get_past_month(
        &self,
        code: &CommodityCode,
    ) -> Result<Vec<PricePoint>, ClassifiedError> {
        self.get_history(code, HistoryPeriod::PastMonth).await
    }

    /// Gated history fetch: the tier is checked before the history request
    /// is issued, so refused plans never spend a history call.
    pub async fn get_history(
        &self,
        code: &CommodityCode,
        period: HistoryPeriod,
    ) -> Result<Vec<PricePoint>, ClassifiedError> {
        let mut stage = HistoryStage::CheckingEntitlement;
        let mut points = Vec::new();

        loop {
            debug!(code = %code, period = period.as_str(), stage = stage.as_str(), "history stage");

            stage = match stage {
                HistoryStage::CheckingEntitlement => {
                    let tier = self.get_user_tier().await?;
                    if let Err(error) = ensure_historical_access(&tier) {
                        info!(code = %code, plan = %tier.plan, "history blocked by plan entitlement");
                        return Err(error);
                    }
                    HistoryStage::Fetching
                }
                HistoryStage::Fetching => {
                    points = self.fetch_history(code, period).await?;
                    HistoryStage::Done
                }
                HistoryStage::Done => return Ok(points),
            };
        }
    }

    async fn fetch_history(
        &self,
        code: &CommodityCode,
        period: HistoryPeriod,
    ) -> Result<Vec<PricePoint>, ClassifiedError> {
        let path = format!(
            "{}?by_code={}",
            period.path(),
            urlencoding::encode(code.as_str())
        );
        let response = self.send(&path, ApiEndpoint::History).await?;
        let envelope: Envelope<HistoryData> = decode(&response)?;

        envelope
            .data
            .into_rows()
            .into_iter()
            .map(|row| row.into_point(code.clone()))
            .collect::<Result<Vec<_>, String>>()
            .map_err(|detail| ClassifiedError::malformed(response.status, detail))
    }

    /// Marine fuel prices from the plan-gated data connector.
    pub async fn get_data_connector_prices(
        &self,
        filter: &DataConnectorFilter,
    ) -> Result<Vec<DataConnectorPrice>, ClassifiedError> {
        let path = format!("/prices/data-connector{}", filter.query_string());
        let response = self.send(&path, ApiEndpoint::DataConnector).await?;
        let envelope: DataConnectorEnvelope = decode(&response)?;

        envelope
            .data
            .prices
            .into_iter()
            .map(DataConnectorPrice::validate)
            .collect::<Result<Vec<_>, ValidationError>>()
            .map_err(|error| ClassifiedError::malformed(response.status, error))
    }

    /// Every commodity the API publishes, with display names.
    pub async fn get_commodities(&self) -> Result<Vec<CommodityInfo>, ClassifiedError> {
        let response = self.send("/commodities", ApiEndpoint::Catalog).await?;
        let envelope: CatalogEnvelope = decode(&response)?;

        envelope
            .data
            .map(CatalogData::into_rows)
            .unwrap_or_default()
            .into_iter()
            .map(|row| {
                let code = CommodityCode::parse(&row.code)?;
                Ok(CommodityInfo::new(code, row.name, row.category))
            })
            .collect::<Result<Vec<_>, ValidationError>>()
            .map_err(|error| ClassifiedError::malformed(response.status, error))
    }

    /// Latest futures settlement. Gated on the futures entitlement like history.
    pub async fn get_futures_price(
        &self,
        contract: &ContractCode,
    ) -> Result<FuturesQuote, ClassifiedError> {
        self.check_futures_entitlement(contract).await?;

        let path = format!("/futures/{}", urlencoding::encode(contract.as_str()));
        let response = self.send(&path, ApiEndpoint::Futures).await?;
        let envelope: Envelope<QuoteRow> = decode(&response)?;
        let row = envelope.data;

        FuturesQuote::new(
            contract.clone(),
            row.price,
            row.currency.as_deref(),
            row.created_at.or(row.timestamp),
        )
        .map_err(|error| ClassifiedError::malformed(response.status, error))
    }

    /// Forward curve for a contract; a missing `curve` is an empty curve.
    pub async fn get_futures_curve(
        &self,
        contract: &ContractCode,
    ) -> Result<FuturesCurve, ClassifiedError> {
        self.check_futures_entitlement(contract).await?;

        let path = format!("/futures/{}/curve", urlencoding::encode(contract.as_str()));
        let response = self.send(&path, ApiEndpoint::Futures).await?;
        let envelope: Envelope<CurveData> = decode(&response)?;

        FuturesCurve::new(contract.clone(), envelope.data.curve)
            .map_err(|error| ClassifiedError::malformed(response.status, error))
    }

    async fn check_futures_entitlement(
        &self,
        contract: &ContractCode,
    ) -> Result<(), ClassifiedError> {
        let tier = self.get_user_tier().await?;
        ensure_futures_access(&tier).inspect_err(|_| {
            info!(contract = %contract, plan = %tier.plan, "futures blocked by plan entitlement");
        })
    }

    pub async fn get_diesel_price(&self, state: &StateCode) -> Result<DieselPrice, ClassifiedError> {
        let path = format!("/diesel-prices/states/{}", urlencoding::encode(state.as_str()));
        let response = self.send(&path, ApiEndpoint::Diesel).await?;
        let envelope: Envelope<QuoteRow> = decode(&response)?;
        let row = envelope.data;

        DieselPrice::new(
            state.clone(),
            row.price,
            row.currency.as_deref(),
            row.created_at.or(row.timestamp),
        )
        .map_err(|error| ClassifiedError::malformed(response.status, error))
    }

    /// Requests used this month against the plan quota.
    pub async fn get_usage(&self) -> Result<UsageSnapshot, ClassifiedError> {
        let response = self.send("/usage", ApiEndpoint::Usage).await?;
        let payload: UsagePayload = serde_json::from_str::<Value>(&response.body)
            .map(unwrap_data)
            .and_then(serde_json::from_value::<UsagePayload>)
            .map_err(|error| ClassifiedError::malformed(response.status, error))?;

        Ok(UsageSnapshot {
            used: payload.used.unwrap_or(0),
            limit: payload
                .limit
                .filter(|limit| *limit > 0)
                .unwrap_or(UsageSnapshot::DEFAULT_LIMIT),
        })
    }

    async fn send(
        &self,
        path: &str,
        endpoint: ApiEndpoint,
    ) -> Result<HttpResponse, ClassifiedError> {
        let auth = HttpAuth::Token(self.api_key.clone());
        dispatch(
            self.http_client.as_ref(),
            &self.config,
            path,
            &auth,
            endpoint,
            self.clock,
        )
        .await
    }
}

/// Issues one GET and classifies any failure. `now` anchors rate-limit hints.
pub(crate) async fn dispatch(
    http_client: &dyn HttpClient,
    config: &GatewayConfig,
    path: &str,
    auth: &HttpAuth,
    endpoint: ApiEndpoint,
    now: fn() -> OffsetDateTime,
) -> Result<HttpResponse, ClassifiedError> {
    let request = HttpRequest::get(config.url(path))
        .with_auth(auth)
        .with_header("Content-Type", "application/json")
        .with_timeout_ms(config.timeout_ms);

    debug!(method = request.method.as_str(), path, "sending api request");

    let response = http_client.execute(request).await.map_err(|error| {
        debug!(path, timed_out = error.timed_out(), "transport failure");
        ClassifiedError::network(&error)
    })?;

    debug!(path, status = response.status, "api response received");

    if !response.is_success() {
        return Err(classify_response(&response, endpoint, now()));
    }

    Ok(response)
}

/// Decodes a `{data:{price, ..}}` body, stamping the point with `code`.
pub(crate) fn decode_latest(
    response: &HttpResponse,
    code: &CommodityCode,
) -> Result<PricePoint, ClassifiedError> {
    let envelope: Envelope<PriceRow> = decode(response)?;

    envelope
        .data
        .into_point(code.clone())
        .map_err(|error| ClassifiedError::malformed(response.status, error))
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ClassifiedError> {
    serde_json::from_str(&response.body)
        .map_err(|error| ClassifiedError::malformed(response.status, error))
}

/// Replaces `{"data": {..}}` with its inner object; other shapes pass through.
fn unwrap_data(mut value: Value) -> Value {
    if value.get("data").is_some_and(Value::is_object) {
        return value["data"].take();
    }
    value
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(default)]
    code: Option<String>,
    price: f64,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl PriceRow {
    fn into_point(self, code: CommodityCode) -> Result<PricePoint, String> {
        let timestamp = self
            .created_at
            .or(self.timestamp)
            .ok_or_else(|| String::from("price entry is missing a timestamp"))?;
        PricePoint::new(code, self.price, self.currency.as_deref(), timestamp)
            .map_err(|error| error.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistoryData {
    Rows(Vec<HistoryRow>),
    Wrapped {
        #[serde(default)]
        prices: Vec<HistoryRow>,
    },
}

impl HistoryData {
    fn into_rows(self) -> Vec<HistoryRow> {
        match self {
            Self::Rows(rows) | Self::Wrapped { prices: rows } => rows,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    price: f64,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl HistoryRow {
    fn into_point(self, code: CommodityCode) -> Result<PricePoint, String> {
        let timestamp = self
            .date
            .or(self.timestamp)
            .or(self.created_at)
            .ok_or_else(|| String::from("history entry is missing a date"))?;
        PricePoint::new(code, self.price, self.currency.as_deref(), timestamp)
            .map_err(|error| error.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
struct DataConnectorEnvelope {
    #[serde(default)]
    data: DataConnectorData,
}

#[derive(Debug, Default, Deserialize)]
struct DataConnectorData {
    #[serde(default)]
    prices: Vec<DataConnectorPrice>,
}

#[derive(Debug, Deserialize)]
struct QuoteRow {
    price: f64,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurveData {
    #[serde(default)]
    curve: Vec<FuturesCurvePoint>,
}

#[derive(Debug, Deserialize)]
struct CatalogEnvelope {
    #[serde(default)]
    data: Option<CatalogData>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogData {
    Rows(Vec<CatalogRow>),
    Wrapped {
        #[serde(default)]
        commodities: Vec<CatalogRow>,
    },
}

impl CatalogData {
    fn into_rows(self) -> Vec<CatalogRow> {
        match self {
            Self::Rows(rows) | Self::Wrapped { commodities: rows } => rows,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    code: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UsagePayload {
    used: Option<u64>,
    limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AccountPayload {
    plan: Option<String>,
    requests_this_month: Option<u64>,
    request_limit: Option<u64>,
    email_confirmed: Option<bool>,
    email_confirmed_at: Option<Value>,
    admin: Option<bool>,
    reservoir_mastery: Option<bool>,
    webhook_limit: Option<u32>,
    webhook_events_limit: Option<u32>,
}

/// Reads the account object, which may or may not be wrapped in `data`.
fn parse_account(body: &str) -> Result<AccountSnapshot, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    let payload: AccountPayload = serde_json::from_value(unwrap_data(value))?;

    let plan = payload
        .plan
        .as_deref()
        .and_then(|raw| raw.parse::<PlanTier>().ok())
        .unwrap_or(PlanTier::Free);

    Ok(AccountSnapshot {
        plan,
        requests_used: payload.requests_this_month.unwrap_or(0),
        requests_limit: payload.request_limit,
        email_confirmed: payload
            .email_confirmed
            .unwrap_or_else(|| payload.email_confirmed_at.is_some()),
        admin: payload.admin.unwrap_or(false),
        reservoir_mastery: payload.reservoir_mastery.unwrap_or(false),
        webhook_limit: payload.webhook_limit.unwrap_or(0),
        webhook_events_limit: payload.webhook_events_limit.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    use super::*;
    use crate::classify::ErrorKind;
    use crate::http_client::HttpError;

    #[derive(Debug, Default)]
    struct RecordingHttpClient {
        responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn scripted(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self
                .responses
                .lock()
                .expect("response queue should not be poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::new("no scripted response")));
            Box::pin(async move { response })
        }
    }

    fn gateway(client: Arc<RecordingHttpClient>) -> PriceApiGateway {
        PriceApiGateway::with_http_client(
            client,
            "test-key",
            GatewayConfig::default().with_base_url("https://api.test/v1"),
        )
        .expect("valid gateway")
    }

    fn code(raw: &str) -> CommodityCode {
        CommodityCode::parse(raw).expect("valid code")
    }

    #[tokio::test]
    async fn latest_price_request_carries_token_and_json_headers() {
        let client = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok_json(
            r#"{"data":{"code":"BRENT_CRUDE_USD","price":85.5,"currency":"USD","created_at":"2025-10-07T12:00:00Z"}}"#,
        ))]);
        let gateway = gateway(client.clone());

        let point = gateway
            .get_price(&code("BRENT_CRUDE_USD"))
            .await
            .expect("price should load");
        assert_eq!(point.price, 85.5);
        assert_eq!(point.timestamp, "2025-10-07T12:00:00Z");

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://api.test/v1/prices/latest?by_code=BRENT_CRUDE_USD"
        );
        assert_eq!(requests[0].header("authorization"), Some("Token test-key"));
        assert_eq!(requests[0].header("content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn undecodable_success_body_is_malformed() {
        let client =
            RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok_json(r#"{"data":{}}"#))]);
        let error = gateway(client)
            .get_price(&code("WTI_USD"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        let client = RecordingHttpClient::scripted(vec![Err(HttpError::timeout("timed out"))]);
        let error = gateway(client)
            .get_price(&code("WTI_USD"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), ErrorKind::NetworkError);
        assert_eq!(error.user_message(), "Network error: timed out");
    }

    #[tokio::test]
    async fn all_prices_accept_timestamp_or_created_at() {
        let client = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok_json(
            r#"{"data":[
                {"code":"BRENT_CRUDE_USD","price":85.5,"created_at":"2025-10-07T12:00:00Z"},
                {"code":"NATURAL_GAS_USD","price":3.4,"currency":"usd","timestamp":"2025-10-07T12:05:00Z"}
            ]}"#,
        ))]);

        let points = gateway(client)
            .get_all_prices()
            .await
            .expect("prices should load");
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].code.as_str(), "NATURAL_GAS_USD");
        assert_eq!(points[1].currency, "USD");
    }

    #[tokio::test]
    async fn tier_parses_wrapped_account_and_defaults() {
        let client = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok_json(
            r#"{"data":{"plan":"production","requests_this_month":420,"email_confirmed_at":"2025-01-01T00:00:00Z","webhook_limit":5}}"#,
        ))]);

        let tier = gateway(client)
            .get_user_tier()
            .await
            .expect("tier should load");
        assert_eq!(tier.plan, PlanTier::Production);
        assert_eq!(tier.requests_used, 420);
        assert_eq!(tier.requests_limit, 50_000);
        assert!(tier.email_confirmed);
        assert!(tier.can_use_webhooks);
        assert!(!tier.can_access_futures);
        assert_eq!(tier.webhook_limit, 5);
    }

    #[tokio::test]
    async fn unknown_plan_falls_back_to_free() {
        let client = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok_json(
            r#"{"plan":"platinum","request_limit":5}"#,
        ))]);

        let tier = gateway(client)
            .get_user_tier()
            .await
            .expect("tier should load");
        assert_eq!(tier.plan, PlanTier::Free);
        assert_eq!(tier.requests_limit, 5);
        assert!(!tier.can_access_historical);
    }

    #[tokio::test]
    async fn any_tier_failure_is_network_error() {
        let client = RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::new(401, r#"{"error":"Invalid API key"}"#)),
            Ok(HttpResponse::ok_json("not json")),
        ]);
        let gateway = gateway(client);

        for _ in 0..2 {
            let error = gateway.get_user_tier().await.expect_err("must fail");
            assert_eq!(error.kind(), ErrorKind::NetworkError);
        }
    }

    #[tokio::test]
    async fn history_accepts_both_body_shapes() {
        let tier = r#"{"plan":"exploration"}"#;
        let client = RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::ok_json(tier)),
            Ok(HttpResponse::ok_json(
                r#"{"data":[{"price":80.1,"date":"2025-01-01"},{"price":81.2,"date":"2025-01-02"}]}"#,
            )),
            Ok(HttpResponse::ok_json(tier)),
            Ok(HttpResponse::ok_json(
                r#"{"data":{"prices":[{"price":79.0,"timestamp":"2025-02-01T00:00:00Z"}]}}"#,
            )),
        ]);
        let gateway = gateway(client.clone());
        let brent = code("BRENT_CRUDE_USD");

        let year = gateway.get_past_year(&brent).await.expect("year history");
        assert_eq!(year.len(), 2);
        assert!(year.iter().all(|point| point.code == brent && point.currency == "USD"));

        let month = gateway.get_past_month(&brent).await.expect("month history");
        assert_eq!(month[0].timestamp, "2025-02-01T00:00:00Z");

        let urls: Vec<String> = client
            .recorded_requests()
            .into_iter()
            .map(|request| request.url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://api.test/v1/users/me",
                "https://api.test/v1/prices/past_year?by_code=BRENT_CRUDE_USD",
                "https://api.test/v1/users/me",
                "https://api.test/v1/prices/past_month?by_code=BRENT_CRUDE_USD",
            ]
        );
    }

    #[tokio::test]
    async fn data_connector_filters_are_url_encoded_and_prices_default_empty() {
        let client = RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::ok_json(
                r#"{"data":{"prices":[{"price":612.5,"fuel_type":"VLSFO","port":"Rotterdam"}]}}"#,
            )),
            Ok(HttpResponse::ok_json(r#"{"data":{}}"#)),
        ]);
        let gateway = gateway(client.clone());
        let filter = DataConnectorFilter {
            fuel_type: Some(String::from("VLSFO")),
            port: Some(String::from("Rotterdam & Antwerp")),
            ..DataConnectorFilter::default()
        };

        let prices = gateway
            .get_data_connector_prices(&filter)
            .await
            .expect("prices should load");
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].currency, "USD");

        let empty = gateway
            .get_data_connector_prices(&DataConnectorFilter::default())
            .await
            .expect("empty body should load");
        assert!(empty.is_empty());

        let requests = client.recorded_requests();
        assert_eq!(
            requests[0].url,
            "https://api.test/v1/prices/data-connector?fuel_type=VLSFO&port=Rotterdam%20%26%20Antwerp"
        );
        assert_eq!(requests[1].url, "https://api.test/v1/prices/data-connector");
    }

    #[tokio::test]
    async fn rate_limit_reset_uses_injected_clock() {
        fn fixed_now() -> OffsetDateTime {
            time::macros::datetime!(2025-10-07 12:00:00 UTC)
        }
        let reset_at = fixed_now().unix_timestamp() + 300;
        let client = RecordingHttpClient::scripted(vec![Ok(HttpResponse::new(429, "{}")
            .with_header("X-RateLimit-Reset", reset_at.to_string()))]);

        let error = gateway(client)
            .with_clock(fixed_now)
            .get_price(&code("WTI_USD"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), ErrorKind::RateLimit);
        assert_eq!(error.recovery_hint(), Some("Retry in 5 minutes"));
    }

    #[tokio::test]
    async fn history_with_empty_data_object_is_an_empty_series() {
        let client = RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::ok_json(r#"{"plan":"exploration"}"#)),
            Ok(HttpResponse::ok_json(r#"{"data":{}}"#)),
        ]);

        let points = gateway(client)
            .get_past_year(&code("BRENT_CRUDE_USD"))
            .await
            .expect("empty history should load");
        assert!(points.is_empty());
    }

    #[tokio::test]
    async fn catalog_accepts_wrapped_bare_and_missing_lists() {
        let client = RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::ok_json(
                r#"{"data":{"commodities":[
                    {"code":"BRENT_CRUDE_USD","name":"Brent Crude Oil","category":"oil"},
                    {"code":"HEATING_OIL_USD"}
                ]}}"#,
            )),
            Ok(HttpResponse::ok_json(r#"{"data":[{"code":"GOLD_USD","category":"metals"}]}"#)),
            Ok(HttpResponse::ok_json(r#"{"data":null}"#)),
        ]);
        let gateway = gateway(client.clone());

        let wrapped = gateway.get_commodities().await.expect("catalog should load");
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[0].name, "Brent Crude Oil");
        assert_eq!(wrapped[1].name, "HEATING OIL USD");
        assert_eq!(wrapped[1].category, None);

        let bare = gateway.get_commodities().await.expect("catalog should load");
        assert_eq!(bare[0].category.as_deref(), Some("metals"));

        let missing = gateway.get_commodities().await.expect("catalog should load");
        assert!(missing.is_empty());

        assert_eq!(client.recorded_requests()[0].url, "https://api.test/v1/commodities");
    }

    #[tokio::test]
    async fn futures_require_entitlement_before_any_futures_request() {
        let client = RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok_json(
            r#"{"plan":"production"}"#,
        ))]);
        let gateway = gateway(client.clone());
        let contract = ContractCode::parse("ice-brent").expect("valid contract");

        let error = gateway
            .get_futures_price(&contract)
            .await
            .expect_err("production plan must be refused");
        assert_eq!(error.kind(), ErrorKind::UpgradeRequired);
        assert_eq!(error.recommended_plan(), Some("reservoir_mastery"));

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("/users/me"));
    }

    #[tokio::test]
    async fn futures_price_and_curve_for_entitled_accounts() {
        let tier = r#"{"plan":"reservoir_mastery"}"#;
        let client = RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::ok_json(tier)),
            Ok(HttpResponse::ok_json(
                r#"{"data":{"price":84.12,"created_at":"2025-10-07T12:00:00Z"}}"#,
            )),
            Ok(HttpResponse::ok_json(tier)),
            Ok(HttpResponse::ok_json(
                r#"{"data":{"curve":[{"month":"2025-11","price":84.1},{"month":"2025-12","price":83.6}]}}"#,
            )),
            Ok(HttpResponse::ok_json(tier)),
            Ok(HttpResponse::ok_json(r#"{"data":{}}"#)),
        ]);
        let gateway = gateway(client.clone());
        let contract = ContractCode::parse("ice-brent").expect("valid contract");

        let quote = gateway
            .get_futures_price(&contract)
            .await
            .expect("quote should load");
        assert_eq!(quote.price, 84.12);
        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.timestamp.as_deref(), Some("2025-10-07T12:00:00Z"));

        let curve = gateway
            .get_futures_curve(&contract)
            .await
            .expect("curve should load");
        assert_eq!(curve.points.len(), 2);
        assert_eq!(curve.points[1].month, "2025-12");

        let empty = gateway
            .get_futures_curve(&contract)
            .await
            .expect("empty curve should load");
        assert!(empty.is_empty());

        let urls: Vec<String> = client
            .recorded_requests()
            .into_iter()
            .map(|request| request.url)
            .collect();
        assert_eq!(urls[1], "https://api.test/v1/futures/ice-brent");
        assert_eq!(urls[3], "https://api.test/v1/futures/ice-brent/curve");
    }

    #[tokio::test]
    async fn diesel_price_is_fetched_by_state() {
        let client = RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::ok_json(r#"{"data":{"price":5.89,"timestamp":"2025-10-06"}}"#)),
            Ok(HttpResponse::new(404, r#"{"error":"State not found"}"#)),
        ]);
        let gateway = gateway(client.clone());
        let california = StateCode::parse("ca").expect("valid state");

        let diesel = gateway
            .get_diesel_price(&california)
            .await
            .expect("diesel should load");
        assert_eq!(diesel.price, 5.89);
        assert_eq!(diesel.state.as_str(), "CA");
        assert_eq!(
            client.recorded_requests()[0].url,
            "https://api.test/v1/diesel-prices/states/CA"
        );

        let missing = gateway
            .get_diesel_price(&StateCode::parse("ZZ").expect("valid state"))
            .await
            .expect_err("must fail");
        assert_eq!(missing.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn usage_defaults_missing_fields() {
        let client = RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::ok_json(r#"{"used":420,"limit":10000}"#)),
            Ok(HttpResponse::ok_json(r#"{"data":{"used":7}}"#)),
            Ok(HttpResponse::ok_json("<html>maintenance</html>")),
        ]);
        let gateway = gateway(client);

        let usage = gateway.get_usage().await.expect("usage should load");
        assert_eq!(usage.remaining(), 9_580);

        let defaulted = gateway.get_usage().await.expect("usage should load");
        assert_eq!(defaulted.used, 7);
        assert_eq!(defaulted.limit, UsageSnapshot::DEFAULT_LIMIT);

        let error = gateway.get_usage().await.expect_err("must fail");
        assert_eq!(error.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn debug_output_redacts_key() {
        let gateway = gateway(RecordingHttpClient::scripted(Vec::new()));
        let debug = format!("{gateway:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test-key"));
    }
}
