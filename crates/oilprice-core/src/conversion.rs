//! Energy unit price conversion.
//!
//! Prices are normalized to a price per MBtu (million British thermal units).
//! Volume and mass units (`barrel`, `tonne`) depend on the commodity's heat
//! content, which the caller supplies. Standardized energy units (`Mcf`,
//! `therm`, `MWh`, `MBtu`) have fixed physical factors and ignore it.
//!
//! [`from_mbtu`] always multiplies by the caller's heat content, including
//! for fixed-factor units, so `to_mbtu` followed by `from_mbtu` only
//! round-trips for those units when the caller passes the unit's own factor.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Physical unit a commodity price is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "barrel")]
    Barrel,
    #[serde(rename = "Mcf")]
    Mcf,
    #[serde(rename = "tonne")]
    Tonne,
    #[serde(rename = "MBtu")]
    MBtu,
    #[serde(rename = "therm")]
    Therm,
    #[serde(rename = "MWh")]
    MWh,
}

impl Unit {
    pub const ALL: [Unit; 6] = [
        Unit::Barrel,
        Unit::Mcf,
        Unit::Tonne,
        Unit::MBtu,
        Unit::Therm,
        Unit::MWh,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Barrel => "barrel",
            Self::Mcf => "Mcf",
            Self::Tonne => "tonne",
            Self::MBtu => "MBtu",
            Self::Therm => "therm",
            Self::MWh => "MWh",
        }
    }

    /// MMBtu per unit for units with a universal factor; `None` when the
    /// factor depends on the commodity.
    pub const fn fixed_factor(self) -> Option<f64> {
        match self {
            Self::Barrel | Self::Tonne => None,
            Self::Mcf => Some(1.037),
            Self::Therm => Some(0.1),
            Self::MWh => Some(3.412),
            Self::MBtu => Some(1.0),
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownUnit {
                value: value.to_owned(),
            })
    }
}

/// Commodities with a standard heat content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommodityType {
    BrentCrudeOil,
    WtiCrudeOil,
    NaturalGas,
    CoalBituminous,
    CoalSubBituminous,
    Lng,
    Diesel,
    Gasoline,
}

impl CommodityType {
    pub const ALL: [CommodityType; 8] = [
        CommodityType::BrentCrudeOil,
        CommodityType::WtiCrudeOil,
        CommodityType::NaturalGas,
        CommodityType::CoalBituminous,
        CommodityType::CoalSubBituminous,
        CommodityType::Lng,
        CommodityType::Diesel,
        CommodityType::Gasoline,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BrentCrudeOil => "BRENT_CRUDE_OIL",
            Self::WtiCrudeOil => "WTI_CRUDE_OIL",
            Self::NaturalGas => "NATURAL_GAS",
            Self::CoalBituminous => "COAL_BITUMINOUS",
            Self::CoalSubBituminous => "COAL_SUB_BITUMINOUS",
            Self::Lng => "LNG",
            Self::Diesel => "DIESEL",
            Self::Gasoline => "GASOLINE",
        }
    }

    /// MMBtu per barrel (oils), per Mcf (gas) or per tonne (coal, LNG).
    pub const fn heat_content(self) -> f64 {
        match self {
            Self::BrentCrudeOil | Self::WtiCrudeOil => 5.8,
            Self::NaturalGas => 1.037,
            Self::CoalBituminous => 24.0,
            Self::CoalSubBituminous => 17.0,
            Self::Lng => 51.6,
            Self::Diesel => 5.77,
            Self::Gasoline => 5.05,
        }
    }
}

impl Display for CommodityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommodityType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|commodity| commodity.as_str() == value)
            .ok_or_else(|| ValidationError::UnknownCommodity {
                value: value.to_owned(),
            })
    }
}

/// Standard heat content (MMBtu per unit) for a commodity type name.
pub fn heat_content_for(commodity: &str) -> Result<f64, ValidationError> {
    commodity.parse::<CommodityType>().map(CommodityType::heat_content)
}

/// Price per `unit` to price per MBtu.
pub fn to_mbtu(price: f64, unit: Unit, heat_content: f64) -> Result<f64, ValidationError> {
    if price.is_nan() || price < 0.0 {
        return Err(ValidationError::InvalidArgument("Price must be non-negative"));
    }

    let factor = unit.fixed_factor().unwrap_or(heat_content);
    if factor.is_nan() || factor <= 0.0 {
        return Err(ValidationError::InvalidArgument(
            "Conversion factor must be positive",
        ));
    }

    Ok(price / factor)
}

/// Price per MBtu to price per `target_unit`, always scaled by `heat_content`.
pub fn from_mbtu(
    price_in_mbtu: f64,
    _target_unit: Unit,
    heat_content: f64,
) -> Result<f64, ValidationError> {
    if price_in_mbtu.is_nan() || price_in_mbtu < 0.0 {
        return Err(ValidationError::InvalidArgument("Price must be non-negative"));
    }

    if heat_content.is_nan() || heat_content <= 0.0 {
        return Err(ValidationError::InvalidArgument("Heat content must be positive"));
    }

    Ok(price_in_mbtu * heat_content)
}

/// Converts between two units through MBtu using one heat content for both legs.
pub fn convert(price: f64, from: Unit, to: Unit, heat_content: f64) -> Result<f64, ValidationError> {
    if to == Unit::MBtu {
        to_mbtu(price, from, heat_content)
    } else if from == Unit::MBtu {
        from_mbtu(price, to, heat_content)
    } else {
        let in_mbtu = to_mbtu(price, from, heat_content)?;
        from_mbtu(in_mbtu, to, heat_content)
    }
}

/// Validated input for a single forward conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionRequest {
    pub price: f64,
    pub source_unit: Unit,
    pub heat_content: f64,
}

impl ConversionRequest {
    pub fn new(price: f64, source_unit: Unit, heat_content: f64) -> Result<Self, ValidationError> {
        if price.is_nan() || price < 0.0 {
            return Err(ValidationError::InvalidArgument("Price must be non-negative"));
        }
        if heat_content.is_nan() || heat_content <= 0.0 {
            return Err(ValidationError::InvalidArgument("Heat content must be positive"));
        }

        Ok(Self {
            price,
            source_unit,
            heat_content,
        })
    }

    pub fn to_mbtu(&self) -> Result<f64, ValidationError> {
        to_mbtu(self.price, self.source_unit, self.heat_content)
    }
}
