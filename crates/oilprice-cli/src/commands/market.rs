use oilprice_core::{
    CommodityInfo, ContractCode, DieselPrice, FuturesCurve, PriceApiGateway, StateCode,
    UsageSnapshot,
};
use serde::Serialize;
use serde_json::json;

use crate::cli::{DieselArgs, FuturesArgs};
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CodesResponseData {
    count: usize,
    commodities: Vec<CommodityInfo>,
}

#[derive(Debug, Serialize)]
struct CurveResponseData {
    curve: FuturesCurve,
    spread: Option<f64>,
}

#[derive(Debug, Serialize)]
struct UsageResponseData {
    usage: UsageSnapshot,
    remaining: u64,
}

pub async fn codes(gateway: &PriceApiGateway) -> Result<CommandResult, CliError> {
    let commodities = match gateway.get_commodities().await {
        Ok(commodities) => commodities,
        Err(error) => return Ok(CommandResult::api_error(&error)),
    };

    let mut warnings = Vec::new();
    if commodities.is_empty() {
        warnings.push(String::from("the commodity catalog is empty"));
    }

    let data = serde_json::to_value(CodesResponseData {
        count: commodities.len(),
        commodities,
    })?;
    Ok(CommandResult::ok(data).with_warnings(warnings))
}

pub async fn futures(args: &FuturesArgs, gateway: &PriceApiGateway) -> Result<CommandResult, CliError> {
    let contract = ContractCode::parse(&args.contract)?;

    if !args.curve {
        return match gateway.get_futures_price(&contract).await {
            Ok(quote) => Ok(CommandResult::ok(json!({ "quote": quote }))),
            Err(error) => Ok(CommandResult::api_error(&error)),
        };
    }

    let curve = match gateway.get_futures_curve(&contract).await {
        Ok(curve) => curve,
        Err(error) => return Ok(CommandResult::api_error(&error)),
    };

    let mut warnings = Vec::new();
    if curve.is_empty() {
        warnings.push(format!("no curve data for {contract}"));
    }

    let data = serde_json::to_value(CurveResponseData {
        spread: curve.spread(),
        curve,
    })?;
    Ok(CommandResult::ok(data).with_warnings(warnings))
}

pub async fn diesel(args: &DieselArgs, gateway: &PriceApiGateway) -> Result<CommandResult, CliError> {
    let state = StateCode::parse(&args.state)?;

    match gateway.get_diesel_price(&state).await {
        Ok(price) => Ok(CommandResult::ok(diesel_data(&price))),
        Err(error) => Ok(CommandResult::api_error(&error)),
    }
}

pub async fn usage(gateway: &PriceApiGateway) -> Result<CommandResult, CliError> {
    match gateway.get_usage().await {
        Ok(usage) => {
            let data = serde_json::to_value(UsageResponseData {
                remaining: usage.remaining(),
                usage,
            })?;
            Ok(CommandResult::ok(data))
        }
        Err(error) => Ok(CommandResult::api_error(&error)),
    }
}

fn diesel_data(price: &DieselPrice) -> serde_json::Value {
    json!({
        "diesel": price,
        "formatted": format!("{} {:.3}", price.currency, price.price),
    })
}
