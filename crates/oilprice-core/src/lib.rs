//! # OilPrice Core
//!
//! Commodity price API client and energy-unit conversion for the OilPrice
//! toolkit.
//!
//! ## Overview
//!
//! - **Unit conversion** between barrels, tonnes, Mcf, therms, MWh and MBtu
//! - **Price API gateway** with token auth and concurrent multi-code fetches
//! - **Error classification** mapping every API failure to an [`ErrorKind`]
//!   with a user message and recovery hint
//! - **Plan entitlements** that gate history and futures requests before
//!   they are sent
//! - **Market data** beyond spot prices: commodity catalog, futures quotes
//!   and curves, state diesel prices and quota usage
//! - **Keyless demo access** for nine common commodities
//! - **Response envelope** for machine-readable CLI output
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api_key`] | Redacted API key |
//! | [`classify`] | Error taxonomy and status classification |
//! | [`config`] | Gateway configuration and environment variables |
//! | [`conversion`] | Energy-unit price conversion |
//! | [`demo`] | Keyless demo price client |
//! | [`domain`] | Domain models (PricePoint, HistoricalSeries, UserTier) |
//! | [`entitlement`] | Plan gating for history and futures endpoints |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`gateway`] | Price API gateway |
//! | [`http_client`] | HTTP client abstraction |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use oilprice_core::{CommodityCode, PriceApiGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = PriceApiGateway::new(&std::env::var("OILPRICE_API_KEY")?)?;
//!     let brent = CommodityCode::parse("BRENT_CRUDE_USD")?;
//!
//!     let point = gateway.get_price(&brent).await?;
//!     println!("Brent: {}", point.formatted());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Gateway operations fail with a [`ClassifiedError`]; callers branch on its
//! kind to choose a recovery action:
//!
//! ```rust
//! use oilprice_core::{ClassifiedError, ErrorKind};
//!
//! fn handle_error(error: &ClassifiedError) {
//!     match error.kind() {
//!         ErrorKind::Authentication => {
//!             // Ask for a new API key
//!         }
//!         ErrorKind::UpgradeRequired => {
//!             // Point at the pricing page
//!         }
//!         ErrorKind::RateLimit => {
//!             // Show error.recovery_hint()
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - The API key is redacted in `Debug` and `Display` output
//! - Request logging records method and path only

pub mod api_key;
pub mod classify;
pub mod config;
pub mod conversion;
pub mod demo;
pub mod domain;
pub mod entitlement;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod http_client;

// API key
pub use api_key::ApiKey;

// Error classification
pub use classify::{classify_response, ApiEndpoint, ClassifiedError, ErrorKind};

// Configuration
pub use config::GatewayConfig;

// Unit conversion
pub use conversion::{
    convert, from_mbtu, heat_content_for, to_mbtu, CommodityType, ConversionRequest, Unit,
};

// Demo access
pub use demo::{is_demo_commodity, DemoGateway, DEMO_COMMODITIES};

// Domain models
pub use domain::{
    AccountSnapshot, CommodityCode, CommodityInfo, ContractCode, DataConnectorPrice, DieselPrice,
    FuturesCurve, FuturesCurvePoint, FuturesQuote, HistoricalEntry, HistoricalSeries,
    PlanFeatures, PlanTier, PricePoint, StateCode, UsageSnapshot, UserTier,
};

// Entitlements
pub use entitlement::{
    ensure_futures_access, ensure_historical_access, HistoryPeriod, HistoryStage,
};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

// Error types
pub use error::{CoreError, ValidationError};

// Gateway
pub use gateway::{DataConnectorFilter, PriceApiGateway};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
