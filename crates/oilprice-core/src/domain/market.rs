use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::models::{validate_currency_code, validate_non_negative, DEFAULT_CURRENCY};
use crate::{CommodityCode, ValidationError};

const MAX_CONTRACT_LEN: usize = 40;

/// Futures contract slug as used in `/futures/<contract>` (e.g. `ice-brent`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractCode(String);

impl ContractCode {
    /// Parse and normalize a contract slug to lowercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::EmptyContractCode);
        }

        let len = normalized.chars().count();
        if len > MAX_CONTRACT_LEN {
            return Err(ValidationError::ContractCodeTooLong {
                len,
                max: MAX_CONTRACT_LEN,
            });
        }

        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
            if !valid {
                return Err(ValidationError::ContractCodeInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContractCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ContractCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContractCode> for String {
    fn from(value: ContractCode) -> Self {
        value.0
    }
}

/// Two-letter US state code (e.g. `CA`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode(String);

impl StateCode {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        let is_valid = normalized.len() == 2 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());
        if !is_valid {
            return Err(ValidationError::InvalidStateCode {
                value: input.to_owned(),
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StateCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for StateCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StateCode> for String {
    fn from(value: StateCode) -> Self {
        value.0
    }
}

/// One entry of the commodity catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommodityInfo {
    pub code: CommodityCode,
    pub name: String,
    pub category: Option<String>,
}

impl CommodityInfo {
    /// A missing or blank name becomes the code with underscores as spaces.
    pub fn new(code: CommodityCode, name: Option<String>, category: Option<String>) -> Self {
        let name = name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| code.as_str().replace('_', " "));
        let category = category
            .map(|category| category.trim().to_owned())
            .filter(|category| !category.is_empty());

        Self {
            code,
            name,
            category,
        }
    }
}

/// Latest settlement for a futures contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuturesQuote {
    pub contract: ContractCode,
    pub price: f64,
    pub currency: String,
    pub timestamp: Option<String>,
}

impl FuturesQuote {
    pub fn new(
        contract: ContractCode,
        price: f64,
        currency: Option<&str>,
        timestamp: Option<String>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;

        Ok(Self {
            contract,
            price,
            currency: validate_currency_code(currency.unwrap_or(DEFAULT_CURRENCY))?,
            timestamp,
        })
    }
}

/// One delivery month on a futures curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuturesCurvePoint {
    pub month: String,
    pub price: f64,
}

/// Forward curve for a contract, in API order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuturesCurve {
    pub contract: ContractCode,
    pub points: Vec<FuturesCurvePoint>,
}

impl FuturesCurve {
    pub fn new(
        contract: ContractCode,
        points: Vec<FuturesCurvePoint>,
    ) -> Result<Self, ValidationError> {
        for point in &points {
            validate_non_negative("price", point.price)?;
        }
        Ok(Self { contract, points })
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last month's price minus the front month's. Positive means contango.
    pub fn spread(&self) -> Option<f64> {
        let front = self.points.first()?;
        let back = self.points.last()?;
        Some(back.price - front.price)
    }
}

/// Retail diesel price for one US state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DieselPrice {
    pub state: StateCode,
    pub price: f64,
    pub currency: String,
    pub timestamp: Option<String>,
}

impl DieselPrice {
    pub fn new(
        state: StateCode,
        price: f64,
        currency: Option<&str>,
        timestamp: Option<String>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;

        Ok(Self {
            state,
            price,
            currency: validate_currency_code(currency.unwrap_or(DEFAULT_CURRENCY))?,
            timestamp,
        })
    }
}

/// Request quota consumption for the current billing month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageSnapshot {
    pub used: u64,
    pub limit: u64,
}

impl UsageSnapshot {
    /// Quota assumed when the API omits `limit`.
    pub const DEFAULT_LIMIT: u64 = 1_000;

    pub const fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }
}
