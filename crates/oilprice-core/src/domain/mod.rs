//! # Domain Models
//!
//! Canonical, validated types for commodity prices, price history and
//! account tiers.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CommodityCode`] | Validated API commodity identifier |
//! | [`PricePoint`] | Latest or historical price record |
//! | [`HistoricalSeries`] | Dated price history with summary statistics |
//! | [`PlanTier`] | Subscription plan and its capability row |
//! | [`UserTier`] | Account usage and derived feature access |
//! | [`DataConnectorPrice`] | Marine fuel price from the data connector |
//! | [`CommodityInfo`] | Commodity catalog entry |
//! | [`FuturesQuote`], [`FuturesCurve`] | Futures settlement and forward curve |
//! | [`DieselPrice`] | Retail diesel price for a US state |
//! | [`UsageSnapshot`] | Monthly request quota consumption |

mod commodity;
mod market;
mod models;

pub use commodity::CommodityCode;
pub use market::{
    CommodityInfo, ContractCode, DieselPrice, FuturesCurve, FuturesCurvePoint, FuturesQuote,
    StateCode, UsageSnapshot,
};
pub use models::{
    parse_date, validate_currency_code, AccountSnapshot, DataConnectorPrice, HistoricalEntry,
    HistoricalSeries, PlanFeatures, PlanTier, PricePoint, UserTier, DEFAULT_CURRENCY,
};
