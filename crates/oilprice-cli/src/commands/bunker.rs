use oilprice_core::{DataConnectorFilter, DataConnectorPrice, PriceApiGateway};
use serde::Serialize;

use crate::cli::BunkerArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct BunkerResponseData {
    prices: Vec<DataConnectorPrice>,
}

pub async fn run(args: &BunkerArgs, gateway: &PriceApiGateway) -> Result<CommandResult, CliError> {
    let filter = DataConnectorFilter {
        fuel_type: args.fuel_type.clone(),
        port: args.port.clone(),
        region: args.region.clone(),
        since: args.since.clone(),
    };

    match gateway.get_data_connector_prices(&filter).await {
        Ok(prices) => {
            let mut warnings = Vec::new();
            if prices.is_empty() {
                warnings.push(String::from("no bunker prices matched the filters"));
            }
            let data = serde_json::to_value(BunkerResponseData { prices })?;
            Ok(CommandResult::ok(data).with_warnings(warnings))
        }
        Err(error) => Ok(CommandResult::api_error(&error)),
    }
}
