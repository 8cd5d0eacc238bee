#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use oilprice_core::{
    DemoGateway, GatewayConfig, HttpClient, HttpError, HttpRequest, HttpResponse, PriceApiGateway,
};
use tokio::sync::Barrier;

pub const BASE_URL: &str = "https://api.test/v1";

/// Fake transport that answers by URL fragment and records every request.
#[derive(Debug, Default)]
pub struct RecordingHttpClient {
    routes: Vec<(String, Result<HttpResponse, HttpError>)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// First matching route wins.
    pub fn route(mut self, url_fragment: &str, response: HttpResponse) -> Self {
        self.routes.push((url_fragment.to_owned(), Ok(response)));
        self
    }

    pub fn fail(mut self, url_fragment: &str, error: HttpError) -> Self {
        self.routes.push((url_fragment.to_owned(), Err(error)));
        self
    }

    pub fn recorded_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.recorded_requests().len()
    }
}

impl HttpClient for RecordingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .routes
            .iter()
            .find(|(fragment, _)| request.url.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| Ok(HttpResponse::new(404, r#"{"error":"no route"}"#)));

        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);

        Box::pin(async move { response })
    }
}

/// Holds every response until `parties` requests are in flight at once, so a
/// caller that awaits requests one by one never finishes.
#[derive(Debug)]
pub struct RendezvousHttpClient {
    barrier: Barrier,
    inner: RecordingHttpClient,
}

impl RendezvousHttpClient {
    pub fn new(parties: usize, inner: RecordingHttpClient) -> Self {
        Self {
            barrier: Barrier::new(parties),
            inner,
        }
    }
}

impl HttpClient for RendezvousHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self.inner.execute(request);
        Box::pin(async move {
            self.barrier.wait().await;
            response.await
        })
    }
}

pub fn gateway_with(client: RecordingHttpClient) -> (PriceApiGateway, Arc<RecordingHttpClient>) {
    let client = Arc::new(client);
    let gateway = PriceApiGateway::with_http_client(
        client.clone(),
        "test-key",
        GatewayConfig::default().with_base_url(BASE_URL),
    )
    .expect("valid gateway");
    (gateway, client)
}

pub fn latest_body(code: &str, price: f64) -> HttpResponse {
    HttpResponse::ok_json(format!(
        r#"{{"data":{{"code":"{code}","price":{price},"currency":"USD","created_at":"2025-10-07T12:00:00Z"}}}}"#
    ))
}

pub fn tier_body(plan: &str) -> HttpResponse {
    HttpResponse::ok_json(format!(
        r#"{{"data":{{"plan":"{plan}","requests_this_month":12,"email_confirmed":true}}}}"#
    ))
}

pub fn demo_gateway_with(client: RecordingHttpClient) -> (DemoGateway, Arc<RecordingHttpClient>) {
    let client = Arc::new(client);
    let gateway =
        DemoGateway::with_http_client(client.clone(), GatewayConfig::default().with_base_url(BASE_URL));
    (gateway, client)
}
