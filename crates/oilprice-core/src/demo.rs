//! Keyless access to a small set of commodities.
//!
//! The demo endpoint serves latest prices for [`DEMO_COMMODITIES`] without
//! an API key, under a tight hourly limit. Codes outside the set are refused
//! locally.

use std::fmt;
use std::sync::Arc;

use time::OffsetDateTime;

use crate::classify::{ApiEndpoint, ClassifiedError};
use crate::config::GatewayConfig;
use crate::gateway::{decode_latest, dispatch};
use crate::http_client::{HttpAuth, HttpClient, ReqwestHttpClient};
use crate::{CommodityCode, PricePoint};

/// Codes the demo endpoint serves.
pub const DEMO_COMMODITIES: [&str; 9] = [
    "BRENT_CRUDE_USD",
    "WTI_USD",
    "NATURAL_GAS_USD",
    "GOLD_USD",
    "EUR_USD",
    "GBP_USD",
    "HEATING_OIL_USD",
    "GASOLINE_USD",
    "DIESEL_USD",
];

pub fn is_demo_commodity(code: &CommodityCode) -> bool {
    DEMO_COMMODITIES.contains(&code.as_str())
}

/// Unauthenticated client for `/demo/prices/<code>`.
#[derive(Clone)]
pub struct DemoGateway {
    config: GatewayConfig,
    http_client: Arc<dyn HttpClient>,
}

impl fmt::Debug for DemoGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemoGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for DemoGateway {
    fn default() -> Self {
        Self::with_config(GatewayConfig::default())
    }
}

impl DemoGateway {
    pub fn with_config(config: GatewayConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::new(&config.user_agent));
        Self::with_http_client(http_client, config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: GatewayConfig) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub async fn get_price(&self, code: &CommodityCode) -> Result<PricePoint, ClassifiedError> {
        if !is_demo_commodity(code) {
            return Err(ClassifiedError::demo_unavailable(code.as_str()));
        }

        let path = format!("/demo/prices/{}", urlencoding::encode(code.as_str()));
        let response = dispatch(
            self.http_client.as_ref(),
            &self.config,
            &path,
            &HttpAuth::None,
            ApiEndpoint::Demo,
            OffsetDateTime::now_utc,
        )
        .await?;

        decode_latest(&response, code)
    }
}
