use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::Date;

use crate::{CommodityCode, ValidationError};

/// Currency assumed when the API omits one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Latest or historical price for one commodity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub code: CommodityCode,
    pub price: f64,
    pub currency: String,
    /// ISO-8601 timestamp exactly as returned by the API.
    pub timestamp: String,
}

impl PricePoint {
    pub fn new(
        code: CommodityCode,
        price: f64,
        currency: Option<&str>,
        timestamp: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;

        Ok(Self {
            code,
            price,
            currency: validate_currency_code(currency.unwrap_or(DEFAULT_CURRENCY))?,
            timestamp: timestamp.into(),
        })
    }

    /// Display form such as `USD 85.50`.
    pub fn formatted(&self) -> String {
        format!("{} {:.2}", self.currency, self.price)
    }
}

/// One dated entry of a [`HistoricalSeries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEntry {
    pub date: String,
    pub price: f64,
}

/// Chronological price history for one commodity, in API order.
///
/// Duplicated dates are kept as returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub code: CommodityCode,
    pub entries: Vec<HistoricalEntry>,
}

impl HistoricalSeries {
    /// Builds a series from history points, dating each entry by the first
    /// ten characters of its timestamp.
    pub fn from_points(
        code: CommodityCode,
        points: &[PricePoint],
    ) -> Result<Self, ValidationError> {
        let entries = points
            .iter()
            .map(|point| {
                let date = point.timestamp.get(..10).unwrap_or(point.timestamp.as_str());
                Ok(HistoricalEntry {
                    date: parse_date(date)?,
                    price: point.price,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(Self { code, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries dated within `start..=end`. Both bounds must be `YYYY-MM-DD`.
    pub fn within(&self, start: &str, end: &str) -> Result<Self, ValidationError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;

        // Validated ISO calendar dates order lexicographically.
        let entries = self
            .entries
            .iter()
            .filter(|entry| entry.date >= start && entry.date <= end)
            .cloned()
            .collect();

        Ok(Self {
            code: self.code.clone(),
            entries,
        })
    }

    /// Mean of the trailing `days` entries, or of all entries when fewer exist.
    pub fn average_last(&self, days: usize) -> Option<f64> {
        if days == 0 || self.entries.is_empty() {
            return None;
        }

        let skip = self.entries.len().saturating_sub(days);
        let recent = &self.entries[skip..];
        let sum: f64 = recent.iter().map(|entry| entry.price).sum();
        Some(sum / recent.len() as f64)
    }

    pub fn min(&self) -> Option<f64> {
        self.entries.iter().map(|entry| entry.price).reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.entries.iter().map(|entry| entry.price).reduce(f64::max)
    }
}

/// Subscription plan, in ascending order of capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Free,
    Exploration,
    Production,
    ReservoirMastery,
}

/// Static capability row for a [`PlanTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanFeatures {
    pub request_limit: u64,
    pub historical: bool,
    pub futures: bool,
    pub webhooks: bool,
    pub drilling_intelligence: bool,
    pub monthly_price_usd: u32,
}

impl PlanTier {
    pub const ALL: [PlanTier; 4] = [
        PlanTier::Free,
        PlanTier::Exploration,
        PlanTier::Production,
        PlanTier::ReservoirMastery,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Exploration => "exploration",
            Self::Production => "production",
            Self::ReservoirMastery => "reservoir_mastery",
        }
    }

    pub const fn features(self) -> PlanFeatures {
        match self {
            Self::Free => PlanFeatures {
                request_limit: 1_000,
                historical: false,
                futures: false,
                webhooks: false,
                drilling_intelligence: false,
                monthly_price_usd: 0,
            },
            Self::Exploration => PlanFeatures {
                request_limit: 10_000,
                historical: true,
                futures: false,
                webhooks: false,
                drilling_intelligence: false,
                monthly_price_usd: 15,
            },
            Self::Production => PlanFeatures {
                request_limit: 50_000,
                historical: true,
                futures: false,
                webhooks: true,
                drilling_intelligence: false,
                monthly_price_usd: 45,
            },
            Self::ReservoirMastery => PlanFeatures {
                request_limit: 250_000,
                historical: true,
                futures: true,
                webhooks: true,
                drilling_intelligence: true,
                monthly_price_usd: 129,
            },
        }
    }
}

impl Display for PlanTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|plan| plan.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownPlan {
                value: value.to_owned(),
            })
    }
}

/// Raw account fields reported by the API, before capability derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub plan: PlanTier,
    pub requests_used: u64,
    pub requests_limit: Option<u64>,
    pub email_confirmed: bool,
    pub admin: bool,
    pub reservoir_mastery: bool,
    pub webhook_limit: u32,
    pub webhook_events_limit: u32,
}

impl AccountSnapshot {
    pub fn for_plan(plan: PlanTier) -> Self {
        Self {
            plan,
            requests_used: 0,
            requests_limit: None,
            email_confirmed: false,
            admin: false,
            reservoir_mastery: false,
            webhook_limit: 0,
            webhook_events_limit: 0,
        }
    }
}

/// Account tier with feature access derived from the plan table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserTier {
    pub plan: PlanTier,
    pub requests_used: u64,
    pub requests_limit: u64,
    pub email_confirmed: bool,
    pub can_access_historical: bool,
    pub can_access_futures: bool,
    pub can_use_webhooks: bool,
    pub can_access_drilling_intelligence: bool,
    pub reservoir_mastery: bool,
    pub webhook_limit: u32,
    pub webhook_events_limit: u32,
}

impl UserTier {
    /// Admin accounts get every gated feature regardless of plan.
    pub fn from_account(account: AccountSnapshot) -> Self {
        let features = account.plan.features();

        Self {
            plan: account.plan,
            requests_used: account.requests_used,
            requests_limit: account.requests_limit.unwrap_or(features.request_limit),
            email_confirmed: account.email_confirmed,
            can_access_historical: features.historical || account.admin,
            can_access_futures: features.futures || account.admin,
            can_use_webhooks: features.webhooks || account.admin,
            can_access_drilling_intelligence: features.drilling_intelligence || account.admin,
            reservoir_mastery: account.reservoir_mastery
                || account.plan == PlanTier::ReservoirMastery,
            webhook_limit: account.webhook_limit,
            webhook_events_limit: account.webhook_events_limit,
        }
    }
}

/// Marine fuel (bunker) price from the data-connector feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConnectorPrice {
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl DataConnectorPrice {
    pub fn validate(self) -> Result<Self, ValidationError> {
        validate_non_negative("price", self.price)?;
        let currency = validate_currency_code(&self.currency)?;
        Ok(Self { currency, ..self })
    }
}

fn default_currency() -> String {
    String::from(DEFAULT_CURRENCY)
}

/// Validate and normalize currency to uppercase 3-letter code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}

/// Validate a `YYYY-MM-DD` calendar date and return it unchanged.
pub fn parse_date(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    Date::parse(trimmed, format_description!("[year]-[month]-[day]")).map_err(|_| {
        ValidationError::InvalidDate {
            value: input.to_owned(),
        }
    })?;
    Ok(trimmed.to_owned())
}

pub(crate) fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
