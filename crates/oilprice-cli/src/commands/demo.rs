use oilprice_core::{is_demo_commodity, CommodityCode, DemoGateway, DEMO_COMMODITIES};
use serde_json::json;

use crate::cli::{DemoArgs, LatestArgs};
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &DemoArgs, demo: &DemoGateway) -> Result<CommandResult, CliError> {
    let Some(raw) = &args.code else {
        return Ok(CommandResult::ok(json!({ "demo_commodities": DEMO_COMMODITIES })));
    };

    let code = CommodityCode::parse(raw)?;
    fetch(&code, demo).await
}

/// `latest` with no API key: served by the demo endpoint when the code allows it.
pub async fn latest_without_key(
    args: &LatestArgs,
    demo: &DemoGateway,
) -> Result<CommandResult, CliError> {
    let code = CommodityCode::parse(&args.code)?;
    if !is_demo_commodity(&code) {
        return Err(CliError::MissingApiKey);
    }

    let result = fetch(&code, demo).await?;
    Ok(result.with_warnings(vec![String::from(
        "no API key set; price served by the keyless demo endpoint",
    )]))
}

async fn fetch(code: &CommodityCode, demo: &DemoGateway) -> Result<CommandResult, CliError> {
    match demo.get_price(code).await {
        Ok(point) => Ok(CommandResult::ok(json!({
            "formatted": point.formatted(),
            "price": point,
        }))),
        Err(error) => Ok(CommandResult::api_error(&error)),
    }
}
