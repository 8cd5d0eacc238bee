use oilprice_core::{convert, heat_content_for, Unit};
use serde::Serialize;

use crate::cli::ConvertArgs;
use crate::error::CliError;

use super::CommandResult;

/// Heat content used when neither `--commodity` nor `--heat-content` is given.
const DEFAULT_HEAT_CONTENT: f64 = 5.8;

#[derive(Debug, Serialize)]
struct ConvertResponseData {
    price: f64,
    from: Unit,
    to: Unit,
    heat_content: f64,
    converted: f64,
}

pub fn run(args: &ConvertArgs) -> Result<CommandResult, CliError> {
    let from: Unit = args.from_unit.parse()?;
    let to: Unit = args.to_unit.parse()?;
    let heat_content = match (&args.commodity, args.heat_content) {
        (Some(commodity), _) => heat_content_for(&commodity.trim().to_ascii_uppercase())?,
        (None, Some(heat_content)) => heat_content,
        (None, None) => DEFAULT_HEAT_CONTENT,
    };

    let converted = convert(args.price, from, to, heat_content)?;

    let data = serde_json::to_value(ConvertResponseData {
        price: args.price,
        from,
        to,
        heat_content,
        converted,
    })?;
    Ok(CommandResult::ok(data))
}
