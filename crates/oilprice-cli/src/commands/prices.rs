use oilprice_core::{CommodityCode, PriceApiGateway, PricePoint};
use serde::Serialize;

use crate::cli::{LatestArgs, PricesArgs};
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct LatestResponseData<'a> {
    price: &'a PricePoint,
    formatted: String,
}

#[derive(Debug, Serialize)]
struct PricesResponseData {
    prices: Vec<PricePoint>,
    omitted: Vec<String>,
}

pub async fn latest(args: &LatestArgs, gateway: &PriceApiGateway) -> Result<CommandResult, CliError> {
    let code = CommodityCode::parse(&args.code)?;

    match gateway.get_price(&code).await {
        Ok(point) => {
            let data = serde_json::to_value(LatestResponseData {
                price: &point,
                formatted: point.formatted(),
            })?;
            Ok(CommandResult::ok(data))
        }
        Err(error) => Ok(CommandResult::api_error(&error)),
    }
}

pub async fn many(args: &PricesArgs, gateway: &PriceApiGateway) -> Result<CommandResult, CliError> {
    let codes = args
        .codes
        .iter()
        .map(|raw| CommodityCode::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let prices = gateway.get_multiple_prices(&codes).await;
    let omitted = omitted_codes(&codes, &prices);
    let warnings = omitted
        .iter()
        .map(|code| format!("no price returned for {code}; it was omitted"))
        .collect();

    let data = serde_json::to_value(PricesResponseData { prices, omitted })?;
    Ok(CommandResult::ok(data).with_warnings(warnings))
}

pub async fn all(gateway: &PriceApiGateway) -> Result<CommandResult, CliError> {
    match gateway.get_all_prices().await {
        Ok(prices) => {
            let data = serde_json::to_value(PricesResponseData {
                prices,
                omitted: Vec::new(),
            })?;
            Ok(CommandResult::ok(data))
        }
        Err(error) => Ok(CommandResult::api_error(&error)),
    }
}

fn omitted_codes(requested: &[CommodityCode], returned: &[PricePoint]) -> Vec<String> {
    requested
        .iter()
        .filter(|code| !returned.iter().any(|point| &point.code == *code))
        .map(|code| code.to_string())
        .collect()
}
